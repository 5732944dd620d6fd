/*
 * Responsibility
 * - Shared context handed to every handler (AppState)
 * - Built once at startup; Clone is cheap (Arc only)
 */
use std::sync::Arc;

use crate::identity::{PrincipalResolver, RoleChecker};
use crate::services::{BusinessService, SecurityService};

#[derive(Clone)]
pub struct AppState {
    pub security: Arc<SecurityService>,
    pub business: Arc<BusinessService>,
    /// The security service again, seen only through its capabilities.
    pub resolver: Arc<dyn PrincipalResolver>,
    pub role_checker: Arc<dyn RoleChecker>,
}

impl AppState {
    pub fn new(security: Arc<SecurityService>, business: Arc<BusinessService>) -> Self {
        Self {
            resolver: security.clone(),
            role_checker: security.clone(),
            security,
            business,
        }
    }
}
