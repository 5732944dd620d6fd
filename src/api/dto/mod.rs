pub mod payments;
pub mod users;
