#![allow(dead_code)]

use anyhow::Result;
use chrono::Utc;
use payments_api::domain::customer::{Customer, CustomerPatch, NewCustomer};
use payments_api::domain::pagination::{PageRequest, Paged, SortOrder};
use payments_api::domain::payment::{NewPayment, Payment, PaymentFilters};
use payments_api::domain::payment_status::{NewPaymentStatus, PaymentStatus, PaymentStatusPatch};
use payments_api::domain::ports::{CustomerStore, PaymentStatusStore, PaymentStore, TransactionStore};
use payments_api::domain::transaction::{NewTransaction, Transaction};
use payments_api::gateways::{AuthorizeRequest, GatewayResponse, GatewayStatusView, PaymentGateway};
use payments_api::seeding::PAYMENT_STATUSES;
use payments_api::service::customer_service::CustomerService;
use payments_api::service::payment_service::PaymentService;
use payments_api::service::payment_status_service::PaymentStatusService;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Default, Clone)]
pub struct InMemoryCustomers {
    rows: Arc<RwLock<HashMap<Uuid, Customer>>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CustomerStore for InMemoryCustomers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|c| c.deleted_at.is_none()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|c| c.email == email && c.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, data: NewCustomer) -> Result<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.rows.write().await.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Option<Customer>> {
        let mut rows = self.rows.write().await;
        let Some(customer) = rows.get_mut(&id).filter(|c| c.deleted_at.is_none()) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            customer.name = name;
        }
        if let Some(email) = patch.email {
            customer.email = email;
        }
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|c| c.deleted_at.is_none()) {
            Some(customer) => {
                customer.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_with_pagination(
        &self,
        page: PageRequest,
        _sort_by: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Paged<Customer>> {
        let rows = self.rows.read().await;
        let mut items: Vec<Customer> = rows
            .values()
            .filter(|c| c.deleted_at.is_none())
            .filter(|c| name.map_or(true, |n| c.name.to_lowercase().contains(&n.to_lowercase())))
            .filter(|c| email.map_or(true, |e| c.email.contains(&e.to_lowercase())))
            .cloned()
            .collect();
        items.sort_by_key(|c| c.created_at);
        if page.sort_order == SortOrder::Desc {
            items.reverse();
        }
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Paged {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}

#[derive(Default, Clone)]
pub struct InMemoryStatuses {
    rows: Arc<RwLock<HashMap<Uuid, PaymentStatus>>>,
}

impl InMemoryStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a catalog row outright, simulating a misconfigured deployment.
    pub async fn drop_by_name(&self, name: &str) {
        let mut rows = self.rows.write().await;
        rows.retain(|_, s| s.name != name);
    }
}

#[async_trait::async_trait]
impl PaymentStatusStore for InMemoryStatuses {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentStatus>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|s| s.deleted_at.is_none()).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentStatus>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|s| s.name == name && s.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, data: NewPaymentStatus) -> Result<PaymentStatus> {
        let now = Utc::now();
        let status = PaymentStatus {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.rows.write().await.insert(status.id, status.clone());
        Ok(status)
    }

    async fn update(&self, id: Uuid, patch: PaymentStatusPatch) -> Result<Option<PaymentStatus>> {
        let mut rows = self.rows.write().await;
        let Some(status) = rows.get_mut(&id).filter(|s| s.deleted_at.is_none()) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            status.name = name;
        }
        if let Some(description) = patch.description {
            status.description = Some(description);
        }
        status.updated_at = Utc::now();
        Ok(Some(status.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|s| s.deleted_at.is_none()) {
            Some(status) => {
                status.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_with_pagination(
        &self,
        page: PageRequest,
        _sort_by: &str,
        name: Option<&str>,
    ) -> Result<Paged<PaymentStatus>> {
        let rows = self.rows.read().await;
        let mut items: Vec<PaymentStatus> = rows
            .values()
            .filter(|s| s.deleted_at.is_none())
            .filter(|s| name.map_or(true, |n| s.name.to_lowercase().contains(&n.to_lowercase())))
            .cloned()
            .collect();
        items.sort_by_key(|s| s.created_at);
        if page.sort_order == SortOrder::Desc {
            items.reverse();
        }
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Paged {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPayments {
    rows: Arc<RwLock<HashMap<Uuid, Payment>>>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryPayments {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|p| p.deleted_at.is_none()).cloned())
    }

    async fn create(&self, data: NewPayment) -> Result<Payment> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            amount: data.amount,
            currency: data.currency,
            card_token: data.card_token,
            merchant_reference: data.merchant_reference,
            customer_id: data.customer_id,
            payment_status_id: data.payment_status_id,
            metadata: data.metadata,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.rows.write().await.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update_status(&self, id: Uuid, payment_status_id: Uuid) -> Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(payment) = rows.get_mut(&id).filter(|p| p.deleted_at.is_none()) {
            payment.payment_status_id = payment_status_id;
            payment.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from_status_id: Uuid,
        to_status_id: Uuid,
    ) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows
            .get_mut(&id)
            .filter(|p| p.deleted_at.is_none() && p.payment_status_id == from_status_id)
        {
            Some(payment) => {
                payment.payment_status_id = to_status_id;
                payment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn merge_metadata(&self, id: Uuid, patch: &Value) -> Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(payment) = rows.get_mut(&id).filter(|p| p.deleted_at.is_none()) {
            let mut merged = match payment.metadata.clone() {
                Value::Object(map) => map,
                _ => Default::default(),
            };
            if let Value::Object(patch) = patch {
                for (k, v) in patch {
                    merged.insert(k.clone(), v.clone());
                }
            }
            payment.metadata = Value::Object(merged);
            payment.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|p| p.deleted_at.is_none()) {
            Some(payment) => {
                payment.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_with_pagination(
        &self,
        page: PageRequest,
        _sort_by: &str,
        filters: &PaymentFilters,
    ) -> Result<Paged<Payment>> {
        let rows = self.rows.read().await;
        let mut items: Vec<Payment> = rows
            .values()
            .filter(|p| p.deleted_at.is_none())
            .filter(|p| filters.customer_id.map_or(true, |id| p.customer_id == id))
            .filter(|p| {
                filters
                    .payment_status_id
                    .map_or(true, |id| p.payment_status_id == id)
            })
            .filter(|p| {
                filters.merchant_reference.as_deref().map_or(true, |m| {
                    p.merchant_reference
                        .to_lowercase()
                        .contains(&m.to_lowercase())
                })
            })
            .filter(|p| filters.min_amount.map_or(true, |min| p.amount >= min))
            .filter(|p| filters.max_amount.map_or(true, |max| p.amount <= max))
            .filter(|p| filters.currency.as_deref().map_or(true, |c| p.currency == c))
            .cloned()
            .collect();
        items.sort_by_key(|p| p.created_at);
        if page.sort_order == SortOrder::Desc {
            items.reverse();
        }
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Paged {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}

/// Append-only in-memory ledger; insertion order doubles as creation order.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    rows: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Transaction> {
        self.rows.read().await.clone()
    }
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryLedger {
    async fn create(&self, data: NewTransaction) -> Result<Transaction> {
        let now = Utc::now();
        let entry = Transaction {
            id: Uuid::new_v4(),
            payment_id: data.payment_id,
            tx_type: data.tx_type,
            amount: data.amount,
            status: data.status,
            gateway_response: data.gateway_response,
            gateway_transaction_id: data.gateway_transaction_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_payment_id(&self, payment_id: Uuid) -> Result<Vec<Transaction>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|t| t.payment_id == payment_id)
            .cloned()
            .collect())
    }
}

/// What one scripted gateway step should do.
#[derive(Debug, Clone)]
pub enum Step {
    Success(&'static str),
    Decline(&'static str, &'static str),
    Blowup,
}

impl Step {
    fn respond(&self) -> Result<GatewayResponse> {
        match self {
            Step::Success(id) => Ok(GatewayResponse {
                success: true,
                transaction_id: Some(id.to_string()),
                error_code: None,
                error_message: None,
                raw_response: json!({ "gateway": "scripted", "transactionId": id }),
            }),
            Step::Decline(code, message) => Ok(GatewayResponse {
                success: false,
                transaction_id: None,
                error_code: Some(code.to_string()),
                error_message: Some(message.to_string()),
                raw_response: json!({ "gateway": "scripted", "errorCode": code }),
            }),
            Step::Blowup => Err(anyhow::anyhow!("connection reset by peer")),
        }
    }
}

/// Gateway double that plays back configured outcomes and records every call
/// it receives, so tests can assert that preconditions short-circuit before
/// any network interaction.
pub struct ScriptedGateway {
    pub authorize: Step,
    pub capture: Step,
    pub refund: Step,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(authorize: Step, capture: Step, refund: Step) -> Self {
        Self {
            authorize,
            capture,
            refund,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn happy() -> Self {
        Self::new(Step::Success("auth-1"), Step::Success("cap-1"), Step::Success("ref-1"))
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn authorize(&self, _request: &AuthorizeRequest) -> Result<GatewayResponse> {
        self.calls.lock().await.push("authorize".to_string());
        self.authorize.respond()
    }

    async fn capture(&self, _transaction_id: &str, _amount: Decimal) -> Result<GatewayResponse> {
        self.calls.lock().await.push("capture".to_string());
        self.capture.respond()
    }

    async fn refund(&self, _transaction_id: &str, _amount: Decimal) -> Result<GatewayResponse> {
        self.calls.lock().await.push("refund".to_string());
        self.refund.respond()
    }

    async fn get_status(&self, transaction_id: &str) -> Result<GatewayStatusView> {
        self.calls.lock().await.push("get_status".to_string());
        Ok(GatewayStatusView {
            transaction_id: transaction_id.to_string(),
            status: "CAPTURED".to_string(),
            amount: Decimal::ZERO,
            currency: "USD".to_string(),
        })
    }
}

/// A fully wired service over in-memory stores, with handles kept for
/// inspection.
pub struct TestApp {
    pub payment_service: PaymentService,
    pub customer_service: CustomerService,
    pub payment_status_service: PaymentStatusService,
    pub payments: InMemoryPayments,
    pub ledger: InMemoryLedger,
    pub customers: InMemoryCustomers,
    pub statuses: InMemoryStatuses,
    pub gateway: Arc<ScriptedGateway>,
    pub status_ids: HashMap<String, Uuid>,
}

impl TestApp {
    pub async fn with_gateway(gateway: ScriptedGateway) -> Self {
        let customers = InMemoryCustomers::new();
        let statuses = InMemoryStatuses::new();
        let payments = InMemoryPayments::new();
        let ledger = InMemoryLedger::new();
        let gateway = Arc::new(gateway);

        let mut status_ids = HashMap::new();
        for (name, description) in PAYMENT_STATUSES {
            let row = statuses
                .create(NewPaymentStatus {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                })
                .await
                .unwrap();
            status_ids.insert(name.to_string(), row.id);
        }

        let payment_service = PaymentService {
            payments: Arc::new(payments.clone()),
            transactions: Arc::new(ledger.clone()),
            customers: Arc::new(customers.clone()),
            statuses: Arc::new(statuses.clone()),
            gateway: gateway.clone(),
        };
        let customer_service = CustomerService {
            customers: Arc::new(customers.clone()),
        };
        let payment_status_service = PaymentStatusService {
            statuses: Arc::new(statuses.clone()),
        };

        Self {
            payment_service,
            customer_service,
            payment_status_service,
            payments,
            ledger,
            customers,
            statuses,
            gateway,
            status_ids,
        }
    }

    pub async fn happy() -> Self {
        Self::with_gateway(ScriptedGateway::happy()).await
    }

    pub fn status_id(&self, name: &str) -> Uuid {
        self.status_ids[name]
    }

    pub async fn seed_customer(&self) -> Customer {
        self.customers
            .create(NewCustomer {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
            })
            .await
            .unwrap()
    }

    /// A PENDING payment of 100.00 USD with token `tok_1234567890` and
    /// reference `ORD-12345`.
    pub async fn seed_pending_payment(&self, customer_id: Uuid) -> Payment {
        self.payments
            .create(NewPayment {
                amount: Decimal::new(10000, 2),
                currency: "USD".to_string(),
                card_token: "tok_1234567890".to_string(),
                merchant_reference: "ORD-12345".to_string(),
                customer_id,
                payment_status_id: self.status_id("PENDING"),
                metadata: json!({}),
            })
            .await
            .unwrap()
    }

    /// Forces a payment into a catalog state directly, bypassing the
    /// orchestrator.
    pub async fn force_status(&self, payment_id: Uuid, name: &str) {
        self.payments
            .update_status(payment_id, self.status_id(name))
            .await
            .unwrap();
    }

    pub async fn current_status_name(&self, payment_id: Uuid) -> String {
        let payment = self.payments.find_by_id(payment_id).await.unwrap().unwrap();
        self.statuses
            .find_by_id(payment.payment_status_id)
            .await
            .unwrap()
            .unwrap()
            .name
    }
}
