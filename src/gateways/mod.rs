use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod mpgs;

#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub amount: Decimal,
    pub currency: String,
    pub card_token: String,
    pub merchant_reference: String,
    pub metadata: serde_json::Value,
}

/// Normalized outcome of one gateway call. Declines, timeouts and other
/// business failures come back as `success == false`; an `Err` from the port
/// means the adapter itself blew up and the current operation cannot continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub raw_response: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStatusView {
    pub transaction_id: String,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn authorize(&self, request: &AuthorizeRequest) -> Result<GatewayResponse>;

    async fn capture(&self, transaction_id: &str, amount: Decimal) -> Result<GatewayResponse>;

    async fn refund(&self, transaction_id: &str, amount: Decimal) -> Result<GatewayResponse>;

    /// Reconciliation-only lookup; the processing workflow itself never calls
    /// this.
    async fn get_status(&self, transaction_id: &str) -> Result<GatewayStatusView>;
}
