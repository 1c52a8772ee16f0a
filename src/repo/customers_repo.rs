use crate::domain::customer::{Customer, CustomerPatch, NewCustomer};
use crate::domain::pagination::{PageRequest, Paged};
use crate::domain::ports::CustomerStore;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomersRepo {
    pub pool: PgPool,
}

fn map_customer(r: &PgRow) -> Customer {
    Customer {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        deleted_at: r.get("deleted_at"),
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, email, created_at, updated_at, deleted_at";

#[async_trait::async_trait]
impl CustomerStore for CustomersRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_customer(&r)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_customer(&r)))
    }

    async fn create(&self, data: NewCustomer) -> Result<Customer> {
        let row = sqlx::query(&format!(
            "INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_customer(&row))
    }

    async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE customers
            SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_customer(&r)))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE customers SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
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
        email: Option<&str>,
    ) -> Result<Paged<Customer>> {
        let where_clause = r#"
            deleted_at IS NULL
            AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%')
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers WHERE {where_clause}"))
                .bind(name)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE {where_clause} \
             ORDER BY {sort_by} {order} LIMIT $3 OFFSET $4",
            order = page.sort_order.as_sql(),
        ))
        .bind(name)
        .bind(email)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.iter().map(map_customer).collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}
