mod payment;
mod service;

pub use payment::{Payment, PaymentId};
pub use service::{BusinessError, BusinessService};
