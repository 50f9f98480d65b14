use std::time::Duration;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::services::payment::interface::{
    CallbackIdentifiers, GatewayError, GatewayOperations, GatewayOrder,
};

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type HmacSha256 = Hmac<Sha256>;

/// Razorpay Orders API client. Orders are created server-side; the returned
/// order id is the client's checkout handle. Callback signatures are
/// HMAC-SHA256 over `"{order_id}|{payment_id}"` with the key secret.
#[derive(Clone)]
pub struct RazorpayProvider {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    receipt: String,
}

impl RazorpayProvider {
    pub fn new(key_id: String, key_secret: String) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            http,
            key_id,
            key_secret,
        })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        let key_id = std::env::var("RAZORPAY_KEY_ID").map_err(|_| GatewayError::Unconfigured)?;
        let key_secret =
            std::env::var("RAZORPAY_KEY_SECRET").map_err(|_| GatewayError::Unconfigured)?;
        Self::new(key_id, key_secret)
    }

    /// Publishable key id, exposed to the client alongside the order.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl GatewayOperations for RazorpayProvider {
    async fn create_order(
        &self,
        amount_paise: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let body = CreateOrderBody {
            amount: amount_paise,
            currency: "INR",
            receipt,
            payment_capture: 1,
        };

        let response = self
            .http
            .post(ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Response(format!("{}: {}", status, detail)));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Response(e.to_string()))?;

        Ok(GatewayOrder {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
        })
    }

    fn verify_callback(&self, callback: &CallbackIdentifiers<'_>) -> bool {
        let mut mac = match HmacSha256::new_from_slice(self.key_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(callback.order_id.as_bytes());
        mac.update(b"|");
        mac.update(callback.payment_id.as_bytes());

        let signature = match hex::decode(callback.signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        // verify_slice is constant-time
        mac.verify_slice(&signature).is_ok()
    }
}
