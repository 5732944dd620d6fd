use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::services::business::{Payment, PaymentId};

#[derive(Deserialize)]
pub struct CreatePaymentForm {
    pub amount: Option<String>,
}

impl CreatePaymentForm {
    /// Amount in minor units; must parse as a positive integer.
    pub fn validate(&self) -> Result<i64, &'static str> {
        let raw = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("amount is required")?;

        match raw.parse::<i64>() {
            Ok(amount) if amount > 0 => Ok(amount),
            Ok(_) => Err("amount must be positive"),
            Err(_) => Err("amount must be an integer"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub sender_id: UserId,
    pub amount: i64,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            sender_id: p.sender_id,
            amount: p.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: Option<&str>) -> Result<i64, &'static str> {
        CreatePaymentForm {
            amount: raw.map(String::from),
        }
        .validate()
    }

    #[test]
    fn positive_integers_are_accepted() {
        assert_eq!(amount(Some("100")), Ok(100));
        assert_eq!(amount(Some(" 7 ")), Ok(7));
    }

    #[test]
    fn absent_non_numeric_and_non_positive_are_rejected() {
        assert_eq!(amount(None), Err("amount is required"));
        assert_eq!(amount(Some("")), Err("amount is required"));
        assert_eq!(amount(Some("ten")), Err("amount must be an integer"));
        assert_eq!(amount(Some("1.5")), Err("amount must be an integer"));
        assert_eq!(amount(Some("0")), Err("amount must be positive"));
        assert_eq!(amount(Some("-3")), Err("amount must be positive"));
    }

    #[test]
    fn response_uses_camel_case() {
        let body = serde_json::to_value(PaymentResponse {
            id: PaymentId::generate(),
            sender_id: 42,
            amount: 100,
        })
        .unwrap();

        assert_eq!(body["senderId"], 42);
        assert_eq!(body["amount"], 100);
        assert!(body["id"].is_string());
    }
}
