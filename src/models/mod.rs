pub mod booking;
pub mod coupon;
pub mod draft;
