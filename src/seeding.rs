use anyhow::Result;
use sqlx::PgPool;

/// Catalog rows the processing workflow depends on. Seeding is idempotent:
/// rows that already exist are left alone.
pub const PAYMENT_STATUSES: &[(&str, &str)] = &[
    ("PENDING", "Payment is pending processing"),
    ("PROCESSING", "Payment is being processed"),
    ("AUTHORIZED", "Payment has been authorized"),
    ("CAPTURED", "Payment has been captured"),
    ("FAILED", "Payment processing failed"),
    ("REFUNDED", "Payment has been fully refunded"),
    ("PARTIALLY_REFUNDED", "Payment has been partially refunded"),
];

pub async fn seed_payment_statuses(pool: &PgPool) -> Result<u64> {
    let mut inserted = 0;
    for (name, description) in PAYMENT_STATUSES.iter().copied() {
        let result = sqlx::query(
            r#"
            INSERT INTO payment_statuses (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    if inserted > 0 {
        tracing::info!(inserted, "seeded payment statuses");
    } else {
        tracing::info!("all payment statuses already exist");
    }
    Ok(inserted)
}
