use crate::domain::pagination::{PageRequest, Paged};
use crate::domain::payment_status::{NewPaymentStatus, PaymentStatus, PaymentStatusPatch};
use crate::domain::ports::PaymentStatusStore;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentStatusesRepo {
    pub pool: PgPool,
}

fn map_status(r: &PgRow) -> PaymentStatus {
    PaymentStatus {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        deleted_at: r.get("deleted_at"),
    }
}

const STATUS_COLUMNS: &str = "id, name, description, created_at, updated_at, deleted_at";

#[async_trait::async_trait]
impl PaymentStatusStore for PaymentStatusesRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentStatus>> {
        let row = sqlx::query(&format!(
            "SELECT {STATUS_COLUMNS} FROM payment_statuses WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_status(&r)))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentStatus>> {
        let row = sqlx::query(&format!(
            "SELECT {STATUS_COLUMNS} FROM payment_statuses WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_status(&r)))
    }

    async fn create(&self, data: NewPaymentStatus) -> Result<PaymentStatus> {
        let row = sqlx::query(&format!(
            "INSERT INTO payment_statuses (name, description) VALUES ($1, $2) RETURNING {STATUS_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_status(&row))
    }

    async fn update(&self, id: Uuid, patch: PaymentStatusPatch) -> Result<Option<PaymentStatus>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE payment_statuses
            SET name = COALESCE($2, name), description = COALESCE($3, description), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {STATUS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_status(&r)))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE payment_statuses SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_with_pagination(
        &self,
        page: PageRequest,
        sort_by: &str,
        name: Option<&str>,
    ) -> Result<Paged<PaymentStatus>> {
        let where_clause = r#"
            deleted_at IS NULL
            AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM payment_statuses WHERE {where_clause}"))
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(&format!(
            "SELECT {STATUS_COLUMNS} FROM payment_statuses WHERE {where_clause} \
             ORDER BY {sort_by} {order} LIMIT $2 OFFSET $3",
            order = page.sort_order.as_sql(),
        ))
        .bind(name)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_status).collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}
