use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized pagination parameters. `page` is 1-based; out-of-range values
/// are clamped rather than rejected.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort_order: SortOrder,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>, sort_order: Option<SortOrder>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            sort_order: sort_order.unwrap_or(SortOrder::Desc),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Picks the sort column, falling back to `created_at` for anything outside
/// the entity's whitelist. Sort fields end up interpolated into SQL, so only
/// whitelisted names ever pass through.
pub fn sanitize_sort_field<'a>(requested: Option<&'a str>, valid: &[&'a str]) -> &'a str {
    match requested {
        Some(field) if valid.contains(&field) => field,
        _ => "created_at",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
