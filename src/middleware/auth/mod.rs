//! Identity pipeline: credential → authenticate → authorize → handler.
//!
//! Each stage is an axum `from_fn` middleware. Stages talk to each other only
//! through typed request extensions (`Credential`, then `Principal`), and
//! each one short-circuits with an `AppError` response on failure.
//!
//! ```ignore
//! let user_routes = Router::new().route("/user", get(user_area));
//! let user_routes = middleware::auth::protect(user_routes, resolver, user_guard);
//! ```

pub mod authenticate;
pub mod authorize;
pub mod credential;

use std::sync::Arc;

use axum::{Router, middleware};
use tower::ServiceBuilder;

use crate::identity::PrincipalResolver;

pub use authorize::{GuardConfigError, RoleGuard};

/// Put every route currently in `router` behind the full pipeline.
///
/// Routes added to `router` after this call are not covered.
pub fn protect<S>(
    router: Router<S>,
    resolver: Arc<dyn PrincipalResolver>,
    guard: RoleGuard,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // ServiceBuilder runs layers top to bottom.
    router.route_layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(credential::extract_credential))
            .layer(middleware::from_fn_with_state(
                resolver,
                authenticate::authenticate,
            ))
            .layer(middleware::from_fn_with_state(guard, authorize::authorize)),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::api::extractors::Authenticated;
    use crate::identity::{Principal, RawCredential, Role, RoleChecker};
    use crate::services::security::SecurityError;

    /// Knows two tokens; counts how often it is asked.
    #[derive(Default)]
    struct StubResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrincipalResolver for StubResolver {
        async fn resolve(&self, credential: &RawCredential) -> Result<Principal, SecurityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match credential.as_str() {
                "user-token" => Ok(Principal::new(1, [Role::User])),
                "admin-token" => Ok(Principal::new(2, [Role::Admin])),
                _ => Err(SecurityError::InvalidToken),
            }
        }
    }

    struct SetIntersection;

    impl RoleChecker for SetIntersection {
        fn has_any_role(&self, principal: &Principal, roles: &[Role]) -> bool {
            roles.iter().any(|r| principal.has_role(*r))
        }
    }

    async fn whoami(Authenticated(principal): Authenticated) -> String {
        principal.id().to_string()
    }

    fn app(resolver: Arc<StubResolver>, roles: &[Role]) -> Router {
        let guard = RoleGuard::any_of(Arc::new(SetIntersection), roles.iter().copied()).unwrap();
        protect(Router::new().route("/whoami", get(whoami)), resolver, guard)
    }

    async fn call(app: Router, token: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri("/whoami");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn missing_credential_is_unauthenticated_whatever_the_roles() {
        for roles in [&[Role::User][..], &[Role::Admin], &[Role::User, Role::Admin]] {
            let resolver = Arc::new(StubResolver::default());
            let status = call(app(resolver.clone(), roles), None).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn unresolvable_credential_is_unauthenticated() {
        let resolver = Arc::new(StubResolver::default());
        let status = call(app(resolver.clone(), &[Role::User]), Some("forged")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden() {
        let resolver = Arc::new(StubResolver::default());
        let status = call(app(resolver, &[Role::Admin]), Some("user-token")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn matching_role_reaches_the_handler() {
        let resolver = Arc::new(StubResolver::default());
        let status = call(app(resolver, &[Role::Admin, Role::User]), Some("user-token")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unprotected_handler_cannot_see_a_principal() {
        let app = Router::new().route("/whoami", get(whoami));
        assert_eq!(call(app, Some("user-token")).await, StatusCode::UNAUTHORIZED);
    }
}
