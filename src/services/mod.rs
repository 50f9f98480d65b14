pub mod booking_service;
pub mod coupon_service;
pub mod email_service;
pub mod payment;
pub mod pricing_service;
pub mod razorpay;
