use crate::gateways::{AuthorizeRequest, GatewayResponse, GatewayStatusView, PaymentGateway};
use anyhow::Result;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

/// Mastercard Payment Gateway Services adapter. All transport-level problems
/// are normalized into failed responses; the orchestrator never sees reqwest
/// errors for a declined or timed-out call.
pub struct MpgsGateway {
    pub base_url: String,
    pub merchant_id: String,
    pub api_password: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl MpgsGateway {
    async fn post_operation(&self, path: String, body: serde_json::Value) -> GatewayResponse {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(format!("merchant.{}", self.merchant_id), Some(&self.api_password))
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let v: serde_json::Value = r.json().await.unwrap_or_default();
                let transaction_id = v
                    .get("transaction")
                    .and_then(|t| t.get("id"))
                    .and_then(|id| id.as_str())
                    .map(ToString::to_string);
                GatewayResponse {
                    success: true,
                    transaction_id,
                    error_code: None,
                    error_message: None,
                    raw_response: v,
                }
            }
            Ok(r) => {
                let status = r.status();
                let body_text = r.text().await.unwrap_or_default();
                let raw = serde_json::from_str(&body_text)
                    .unwrap_or_else(|_| json!({ "body": body_text.chars().take(500).collect::<String>() }));
                GatewayResponse {
                    success: false,
                    transaction_id: None,
                    error_code: Some(if status == StatusCode::REQUEST_TIMEOUT {
                        "TIMEOUT".to_string()
                    } else {
                        format!("HTTP_{}", status.as_u16())
                    }),
                    error_message: Some(body_text.chars().take(200).collect()),
                    raw_response: raw,
                }
            }
            Err(e) if e.is_timeout() => GatewayResponse {
                success: false,
                transaction_id: None,
                error_code: Some("TIMEOUT".to_string()),
                error_message: Some("gateway timeout".to_string()),
                raw_response: json!({ "error": "timeout" }),
            },
            Err(e) => GatewayResponse {
                success: false,
                transaction_id: None,
                error_code: Some("NETWORK_ERROR".to_string()),
                error_message: Some(e.to_string()),
                raw_response: json!({ "error": e.to_string() }),
            },
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MpgsGateway {
    fn name(&self) -> &'static str {
        "mpgs"
    }

    async fn authorize(&self, request: &AuthorizeRequest) -> Result<GatewayResponse> {
        tracing::info!(merchant_reference = %request.merchant_reference, "mpgs authorize");
        let body = json!({
            "apiOperation": "AUTHORIZE",
            "order": {
                "amount": request.amount,
                "currency": request.currency,
                "reference": request.merchant_reference,
            },
            "sourceOfFunds": {
                "type": "SCHEME_TOKEN",
                "token": request.card_token,
            },
        });
        Ok(self
            .post_operation(format!("/order/{}/transaction", request.merchant_reference), body)
            .await)
    }

    async fn capture(&self, transaction_id: &str, amount: Decimal) -> Result<GatewayResponse> {
        tracing::info!(%transaction_id, "mpgs capture");
        let body = json!({
            "apiOperation": "CAPTURE",
            "transaction": { "reference": transaction_id, "amount": amount },
        });
        Ok(self
            .post_operation(format!("/transaction/{transaction_id}/capture"), body)
            .await)
    }

    async fn refund(&self, transaction_id: &str, amount: Decimal) -> Result<GatewayResponse> {
        tracing::info!(%transaction_id, "mpgs refund");
        let body = json!({
            "apiOperation": "REFUND",
            "transaction": { "reference": transaction_id, "amount": amount },
        });
        Ok(self
            .post_operation(format!("/transaction/{transaction_id}/refund"), body)
            .await)
    }

    async fn get_status(&self, transaction_id: &str) -> Result<GatewayStatusView> {
        let resp = self
            .client
            .get(format!("{}/transaction/{}", self.base_url, transaction_id))
            .basic_auth(format!("merchant.{}", self.merchant_id), Some(&self.api_password))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?
            .error_for_status()?;

        let v: serde_json::Value = resp.json().await?;
        Ok(GatewayStatusView {
            transaction_id: transaction_id.to_string(),
            status: v
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
            amount: v
                .get("order")
                .and_then(|o| o.get("amount"))
                .and_then(|a| a.as_str())
                .and_then(|a| a.parse().ok())
                .unwrap_or(Decimal::ZERO),
            currency: v
                .get("order")
                .and_then(|o| o.get("currency"))
                .and_then(|c| c.as_str())
                .unwrap_or("")
                .to_string(),
        })
    }
}
