use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::models::coupon::{
    AppliedCoupon, CouponServiceType, CouponValidationRequest, CouponValidationResponse,
};

const VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("coupon service is not configured")]
    Unconfigured,
    #[error("coupon service unreachable: {0}")]
    Request(String),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Deserialize)]
struct RejectionBody {
    message: String,
}

/// Client for the external coupon validation collaborator. Coupon failures
/// are non-fatal for the booking flow; callers surface the message and
/// proceed without a discount.
#[derive(Clone)]
pub struct CouponService {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl CouponService {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("COUPON_SERVICE_URL").ok();
        if base_url.is_none() {
            log::warn!("COUPON_SERVICE_URL not set; coupons will not be applied");
        }
        Self::new(base_url)
    }

    pub async fn validate(
        &self,
        code: &str,
        service_type: CouponServiceType,
        order_value: f64,
        phone_number: Option<&str>,
    ) -> Result<AppliedCoupon, CouponError> {
        let base_url = self.base_url.as_ref().ok_or(CouponError::Unconfigured)?;

        let request = CouponValidationRequest {
            code,
            service_type,
            order_value,
            phone_number,
        };

        let response = self
            .http
            .post(format!("{}/validate", base_url))
            .timeout(VALIDATION_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| CouponError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let message = match response.json::<RejectionBody>().await {
                Ok(body) => body.message,
                Err(_) => "coupon was rejected".to_string(),
            };
            return Err(CouponError::Rejected(message));
        }

        let body: CouponValidationResponse = response
            .json()
            .await
            .map_err(|e| CouponError::Request(e.to_string()))?;

        Ok(AppliedCoupon {
            code: body.coupon,
            discount: body.discount,
        })
    }
}
