use crate::domain::customer::{Customer, CustomerPatch, NewCustomer};
use crate::domain::pagination::{PageRequest, Paged};
use crate::domain::payment::{NewPayment, Payment, PaymentFilters};
use crate::domain::payment_status::{NewPaymentStatus, PaymentStatus, PaymentStatusPatch};
use crate::domain::transaction::{NewTransaction, Transaction};
use anyhow::Result;
use serde_json::Value;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;
    async fn create(&self, data: NewCustomer) -> Result<Customer>;
    async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Option<Customer>>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool>;
    async fn find_with_pagination(
        &self,
        page: PageRequest,
        sort_by: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Paged<Customer>>;
}

#[async_trait::async_trait]
pub trait PaymentStatusStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentStatus>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentStatus>>;
    async fn create(&self, data: NewPaymentStatus) -> Result<PaymentStatus>;
    async fn update(&self, id: Uuid, patch: PaymentStatusPatch) -> Result<Option<PaymentStatus>>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool>;
    async fn find_with_pagination(
        &self,
        page: PageRequest,
        sort_by: &str,
        name: Option<&str>,
    ) -> Result<Paged<PaymentStatus>>;
}

#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn create(&self, data: NewPayment) -> Result<Payment>;
    async fn update_status(&self, id: Uuid, payment_status_id: Uuid) -> Result<()>;
    /// Conditional status transition: updates only if the row is still in
    /// `from_status_id`. Returns false when another writer got there first.
    async fn transition_status(&self, id: Uuid, from_status_id: Uuid, to_status_id: Uuid)
        -> Result<bool>;
    /// Shallow-merges `patch` into the payment's metadata object; existing
    /// keys not present in the patch survive.
    async fn merge_metadata(&self, id: Uuid, patch: &Value) -> Result<()>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool>;
    async fn find_with_pagination(
        &self,
        page: PageRequest,
        sort_by: &str,
        filters: &PaymentFilters,
    ) -> Result<Paged<Payment>>;
}

/// Append-only ledger of gateway interactions. No update or delete: a row,
/// once written, is a historical fact.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, data: NewTransaction) -> Result<Transaction>;
    async fn find_by_payment_id(&self, payment_id: Uuid) -> Result<Vec<Transaction>>;
}
