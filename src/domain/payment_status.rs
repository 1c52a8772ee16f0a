use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

pub const VALID_SORT_FIELDS: &[&str] = &["created_at", "updated_at", "name"];

/// A row in the payment status catalog. The orchestrator reads these by name;
/// the catalog itself is managed through its own CRUD endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatus {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentStatus {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentStatusPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}
