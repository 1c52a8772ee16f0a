use crate::domain::pagination::{PageRequest, Paged};
use crate::domain::payment::{NewPayment, Payment, PaymentFilters};
use crate::domain::ports::PaymentStore;
use anyhow::Result;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn map_payment(r: &PgRow) -> Payment {
    Payment {
        id: r.get("id"),
        amount: r.get("amount"),
        currency: r.get("currency"),
        card_token: r.get("card_token"),
        merchant_reference: r.get("merchant_reference"),
        customer_id: r.get("customer_id"),
        payment_status_id: r.get("payment_status_id"),
        metadata: r
            .get::<Option<Value>, _>("metadata")
            .unwrap_or_else(|| Value::Object(Default::default())),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        deleted_at: r.get("deleted_at"),
    }
}

const PAYMENT_COLUMNS: &str = "id, amount, currency, card_token, merchant_reference, customer_id, \
     payment_status_id, metadata, created_at, updated_at, deleted_at";

#[async_trait::async_trait]
impl PaymentStore for PaymentsRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    async fn create(&self, data: NewPayment) -> Result<Payment> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO payments (amount, currency, card_token, merchant_reference, customer_id, payment_status_id, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(data.amount)
        .bind(data.currency)
        .bind(data.card_token)
        .bind(data.merchant_reference)
        .bind(data.customer_id)
        .bind(data.payment_status_id)
        .bind(data.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_payment(&row))
    }

    async fn update_status(&self, id: Uuid, payment_status_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE payments SET payment_status_id = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(payment_status_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from_status_id: Uuid,
        to_status_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET payment_status_id = $3, updated_at = now()
            WHERE id = $1 AND payment_status_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(from_status_id)
        .bind(to_status_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn merge_metadata(&self, id: Uuid, patch: &Value) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET metadata = COALESCE(metadata, '{}'::jsonb) || $2::jsonb, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(patch)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE payments SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_with_pagination(
        &self,
        page: PageRequest,
        sort_by: &str,
        filters: &PaymentFilters,
    ) -> Result<Paged<Payment>> {
        let where_clause = r#"
            deleted_at IS NULL
            AND ($1::uuid IS NULL OR customer_id = $1)
            AND ($2::uuid IS NULL OR payment_status_id = $2)
            AND ($3::text IS NULL OR merchant_reference ILIKE '%' || $3 || '%')
            AND ($4::numeric IS NULL OR amount >= $4)
            AND ($5::numeric IS NULL OR amount <= $5)
            AND ($6::text IS NULL OR currency = $6)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM payments WHERE {where_clause}"))
            .bind(filters.customer_id)
            .bind(filters.payment_status_id)
            .bind(filters.merchant_reference.as_deref())
            .bind(filters.min_amount)
            .bind(filters.max_amount)
            .bind(filters.currency.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE {where_clause} \
             ORDER BY {sort_by} {order} LIMIT $7 OFFSET $8",
            order = page.sort_order.as_sql(),
        ))
        .bind(filters.customer_id)
        .bind(filters.payment_status_id)
        .bind(filters.merchant_reference.as_deref())
        .bind(filters.min_amount)
        .bind(filters.max_amount)
        .bind(filters.currency.as_deref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_payment).collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}
