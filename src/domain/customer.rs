use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_EMAIL_LENGTH: usize = 255;

pub const VALID_SORT_FIELDS: &[&str] = &["created_at", "updated_at", "name", "email"];

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}
