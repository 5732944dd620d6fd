pub mod business;
pub mod security;

pub use business::BusinessService;
pub use security::SecurityService;
