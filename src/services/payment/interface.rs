use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway is not configured")]
    Unconfigured,
    #[error("gateway request failed: {0}")]
    Request(String),
    #[error("gateway rejected the request: {0}")]
    Response(String),
}

/// A created gateway order, handed to the client as its checkout handle.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrder {
    pub order_id: String,
    /// Amount in the gateway's minor unit (paise).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Identifiers delivered by the gateway's success callback.
#[derive(Debug, Clone, Copy)]
pub struct CallbackIdentifiers<'a> {
    pub order_id: &'a str,
    pub payment_id: &'a str,
    pub signature: &'a str,
}

pub trait GatewayOperations {
    async fn create_order(&self, amount_paise: i64, receipt: &str)
        -> Result<GatewayOrder, GatewayError>;

    /// Authenticity check for a success callback. Must be safe against
    /// timing attacks and must never panic on malformed input.
    fn verify_callback(&self, callback: &CallbackIdentifiers<'_>) -> bool;
}
