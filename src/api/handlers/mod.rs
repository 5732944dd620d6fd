pub mod areas;
pub mod health;
pub mod payments;
pub mod users;
