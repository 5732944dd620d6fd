/*
 * Responsibility
 * - auth: identity pipeline applied per route group
 * - http: transport-level layers applied once at the router root
 */
pub mod auth;
pub mod http;
