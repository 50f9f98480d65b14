use serde::{Deserialize, Serialize};

/// Which side of the catalogue a coupon applies to. Inferred from the
/// categories present in a draft: any vehicle-rental line makes the whole
/// order a rental order, otherwise it is treated as an adventure order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponServiceType {
    Rental,
    Adventure,
}

#[derive(Debug, Serialize)]
pub struct CouponValidationRequest<'a> {
    pub code: &'a str,
    pub service_type: CouponServiceType,
    pub order_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CouponValidationResponse {
    pub coupon: String,
    pub discount: f64,
}

/// An externally-validated deduction applied to the pre-discount total.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: f64,
}
