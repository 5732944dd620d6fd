/*
 * Responsibility
 * - HTTP surface: URL layout, handlers, form DTOs, extractors
 * - routes() is the only thing app.rs needs
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
