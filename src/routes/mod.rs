pub mod booking;
pub mod draft;
pub mod health;
pub mod payment;
