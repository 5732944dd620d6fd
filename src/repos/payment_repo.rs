/*
 * Responsibility
 * - payments table (id, sender_id, amount)
 * - Rows are insert-only: no update, no delete
 * - Every call is a single statement; the pool hands the connection back on drop
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::identity::UserId;
use crate::repos::error::{RepoError, RepoResult};
use crate::services::business::{Payment, PaymentId};

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, payment: &Payment) -> RepoResult<()>;

    async fn list_by_sender(&self, sender_id: UserId) -> RepoResult<Vec<Payment>>;

    async fn list_all(&self) -> RepoResult<Vec<Payment>>;
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: Uuid,
    sender_id: i64,
    amount: i64,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: PaymentId::from(row.id),
            sender_id: row.sender_id,
            amount: row.amount,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgPaymentRepo {
    pool: PgPool,
}

impl PgPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentRepo {
    async fn insert(&self, payment: &Payment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, sender_id, amount)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(*payment.id.as_uuid())
        .bind(payment.sender_id)
        .bind(payment.amount)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn list_by_sender(&self, sender_id: UserId) -> RepoResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, sender_id, amount
            FROM payments
            WHERE sender_id = $1
            "#,
        )
        .bind(sender_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn list_all(&self) -> RepoResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, sender_id, amount
            FROM payments
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }
}
