use crate::domain::ports::TransactionStore;
use crate::domain::transaction::{NewTransaction, Transaction, TransactionStatus, TransactionType};
use anyhow::{anyhow, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Insert-only access to the transactions ledger. There is deliberately no
/// update or delete here; the audit trail is immutable.
#[derive(Clone)]
pub struct TransactionsRepo {
    pub pool: PgPool,
}

fn map_transaction(r: &PgRow) -> Result<Transaction> {
    let type_str: String = r.get("type");
    let status_str: String = r.get("status");
    Ok(Transaction {
        id: r.get("id"),
        payment_id: r.get("payment_id"),
        tx_type: TransactionType::from_str(&type_str)
            .ok_or_else(|| anyhow!("unknown transaction type: {type_str}"))?,
        amount: r.get("amount"),
        status: TransactionStatus::from_str(&status_str)
            .ok_or_else(|| anyhow!("unknown transaction status: {status_str}"))?,
        gateway_response: r.get("gateway_response"),
        gateway_transaction_id: r.get("gateway_transaction_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

const TRANSACTION_COLUMNS: &str = "id, payment_id, type::text AS type, amount, status::text AS status, \
     gateway_response, gateway_transaction_id, created_at, updated_at";

#[async_trait::async_trait]
impl TransactionStore for TransactionsRepo {
    async fn create(&self, data: NewTransaction) -> Result<Transaction> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO transactions (payment_id, type, amount, status, gateway_response, gateway_transaction_id)
            VALUES ($1, $2::transaction_type, $3, $4::transaction_status, $5, $6)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(data.payment_id)
        .bind(data.tx_type.as_str())
        .bind(data.amount)
        .bind(data.status.as_str())
        .bind(data.gateway_response)
        .bind(data.gateway_transaction_id)
        .fetch_one(&self.pool)
        .await?;

        map_transaction(&row)
    }

    async fn find_by_payment_id(&self, payment_id: Uuid) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE payment_id = $1 ORDER BY created_at ASC"
        ))
        .bind(payment_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_transaction).collect()
    }
}
