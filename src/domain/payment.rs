use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_AMOUNT: Decimal = dec!(0.01);
pub const MAX_AMOUNT: Decimal = dec!(999999.99);
pub const MIN_CARD_TOKEN_LENGTH: usize = 10;
pub const MAX_CARD_TOKEN_LENGTH: usize = 100;
pub const MIN_MERCHANT_REFERENCE_LENGTH: usize = 3;
pub const MAX_MERCHANT_REFERENCE_LENGTH: usize = 100;
pub const CURRENCY_CODE_LENGTH: usize = 3;

pub const VALID_SORT_FIELDS: &[&str] = &["created_at", "updated_at", "amount", "merchant_reference"];

/// The closed set of payment lifecycle states the workflow moves through.
/// The catalog stores one row per state; ids are resolved by name at the
/// persistence boundary, immediately before each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Pending,
    Processing,
    Authorized,
    Captured,
    Failed,
    Refunded,
    PartiallyRefunded,
}

impl PaymentState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Authorized => "AUTHORIZED",
            Self::Captured => "CAPTURED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
            Self::PartiallyRefunded => "PARTIALLY_REFUNDED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PENDING" => Some(Self::Pending),
            "PROCESSING" => Some(Self::Processing),
            "AUTHORIZED" => Some(Self::Authorized),
            "CAPTURED" => Some(Self::Captured),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            "PARTIALLY_REFUNDED" => Some(Self::PartiallyRefunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub card_token: String,
    pub merchant_reference: String,
    pub customer_id: Uuid,
    pub payment_status_id: Uuid,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields required to insert a new payment row.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Decimal,
    pub currency: String,
    pub card_token: String,
    pub merchant_reference: String,
    pub customer_id: Uuid,
    pub payment_status_id: Uuid,
    pub metadata: serde_json::Value,
}

/// Filters accepted by the payment list endpoint.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilters {
    pub customer_id: Option<Uuid>,
    pub payment_status_id: Option<Uuid>,
    pub merchant_reference: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub currency: Option<String>,
}
