use std::sync::Arc;

use thiserror::Error;

use crate::identity::UserId;
use crate::repos::{PaymentStore, RepoError};
use crate::services::business::{Payment, PaymentId};

#[derive(Debug, Error)]
pub enum BusinessError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("storage failure")]
    Storage(#[from] RepoError),
}

/// Payment creation and listing.
///
/// Stateless apart from the store handle; each call is one storage round trip.
#[derive(Clone)]
pub struct BusinessService {
    payments: Arc<dyn PaymentStore>,
}

impl BusinessService {
    pub fn new(payments: Arc<dyn PaymentStore>) -> Self {
        Self { payments }
    }

    pub async fn create_payment(
        &self,
        sender_id: UserId,
        amount: i64,
    ) -> Result<PaymentId, BusinessError> {
        if amount <= 0 {
            return Err(BusinessError::InvalidAmount(amount));
        }

        let payment = Payment {
            id: PaymentId::generate(),
            sender_id,
            amount,
        };
        self.payments.insert(&payment).await?;

        tracing::info!(payment_id = %payment.id, sender_id, amount, "payment created");
        Ok(payment.id)
    }

    pub async fn get_user_payments(&self, user_id: UserId) -> Result<Vec<Payment>, BusinessError> {
        Ok(self.payments.list_by_sender(user_id).await?)
    }

    pub async fn get_all_payments(&self) -> Result<Vec<Payment>, BusinessError> {
        Ok(self.payments.list_all().await?)
    }
}
