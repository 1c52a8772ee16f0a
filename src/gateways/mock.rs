use crate::gateways::{AuthorizeRequest, GatewayResponse, GatewayStatusView, PaymentGateway};
use anyhow::Result;
use rust_decimal::Decimal;
use serde_json::json;

/// Behavior-driven stand-in for a real processor. The behavior string decides
/// which step declines, so flows can be exercised end to end without network.
pub struct MockGateway {
    pub behavior: String,
}

impl MockGateway {
    fn success(&self, transaction_id: String, step: &str) -> GatewayResponse {
        GatewayResponse {
            success: true,
            transaction_id: Some(transaction_id.clone()),
            error_code: None,
            error_message: None,
            raw_response: json!({
                "gateway": "mock",
                "transactionId": transaction_id,
                "step": step,
            }),
        }
    }

    fn decline(&self, step: &str) -> GatewayResponse {
        GatewayResponse {
            success: false,
            transaction_id: None,
            error_code: Some("MOCK_DECLINED".to_string()),
            error_message: Some(format!("mock decline at {step}")),
            raw_response: json!({
                "gateway": "mock",
                "step": step,
                "declined": true,
            }),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn authorize(&self, request: &AuthorizeRequest) -> Result<GatewayResponse> {
        tracing::info!(merchant_reference = %request.merchant_reference, "mock authorize");
        if self.behavior == "ALWAYS_FAILURE" {
            return Ok(self.decline("authorize"));
        }
        Ok(self.success(format!("mock_auth_{}", uuid::Uuid::new_v4()), "authorize"))
    }

    async fn capture(&self, transaction_id: &str, _amount: Decimal) -> Result<GatewayResponse> {
        tracing::info!(%transaction_id, "mock capture");
        if self.behavior == "FAIL_CAPTURE" {
            return Ok(self.decline("capture"));
        }
        Ok(self.success(format!("mock_cap_{}", uuid::Uuid::new_v4()), "capture"))
    }

    async fn refund(&self, transaction_id: &str, _amount: Decimal) -> Result<GatewayResponse> {
        tracing::info!(%transaction_id, "mock refund");
        if self.behavior == "FAIL_REFUND" {
            return Ok(self.decline("refund"));
        }
        Ok(self.success(format!("mock_ref_{}", uuid::Uuid::new_v4()), "refund"))
    }

    async fn get_status(&self, transaction_id: &str) -> Result<GatewayStatusView> {
        Ok(GatewayStatusView {
            transaction_id: transaction_id.to_string(),
            status: "CAPTURED".to_string(),
            amount: Decimal::ZERO,
            currency: "USD".to_string(),
        })
    }
}
