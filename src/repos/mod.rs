/*
 * Responsibility
 * - Storage collaborators for the security and business services
 * - Each store is a trait + a Postgres implementation (+ an in-memory one)
 */
pub mod error;
pub mod memory;
pub mod payment_repo;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
pub use memory::{MemoryPaymentRepo, MemoryUserRepo};
pub use payment_repo::{PaymentStore, PgPaymentRepo};
pub use user_repo::{PgUserRepo, UserRecord, UserStore};
