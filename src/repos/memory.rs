//! In-process stores.
//!
//! Same contracts as the Postgres repos, kept in a `Mutex<Vec<_>>`. The test
//! suites run the whole service on top of these; each store counts the calls
//! it receives so a test can prove a request never reached storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::identity::{Role, UserId};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::payment_repo::PaymentStore;
use crate::repos::user_repo::{UserRecord, UserStore};
use crate::services::business::Payment;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<UserRecord>>,
    round_trips: AtomicUsize,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    pub fn user_count(&self) -> usize {
        lock(&self.users).len()
    }

    fn touch(&self) {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserRepo {
    async fn create(
        &self,
        login: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> RepoResult<UserRecord> {
        self.touch();
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.login == login) {
            return Err(RepoError::Conflict);
        }

        let record = UserRecord {
            id: users.len() as UserId + 1,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            roles: roles.to_vec(),
        };
        users.push(record.clone());

        Ok(record)
    }

    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserRecord>> {
        self.touch();
        Ok(lock(&self.users).iter().find(|u| u.login == login).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        self.touch();
        Ok(lock(&self.users).iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPaymentRepo {
    payments: Mutex<Vec<Payment>>,
    round_trips: AtomicUsize,
}

impl MemoryPaymentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Number of stored payments.
    pub fn len(&self) -> usize {
        lock(&self.payments).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn touch(&self) {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentRepo {
    async fn insert(&self, payment: &Payment) -> RepoResult<()> {
        self.touch();
        let mut payments = lock(&self.payments);
        if payments.iter().any(|p| p.id == payment.id) {
            return Err(RepoError::Conflict);
        }
        payments.push(payment.clone());
        Ok(())
    }

    async fn list_by_sender(&self, sender_id: UserId) -> RepoResult<Vec<Payment>> {
        self.touch();
        Ok(lock(&self.payments)
            .iter()
            .filter(|p| p.sender_id == sender_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> RepoResult<Vec<Payment>> {
        self.touch();
        Ok(lock(&self.payments).clone())
    }
}
