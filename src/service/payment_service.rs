use crate::domain::pagination::{sanitize_sort_field, PageRequest, Paged};
use crate::domain::payment::{
    NewPayment, Payment, PaymentFilters, PaymentState, CURRENCY_CODE_LENGTH, MAX_AMOUNT,
    MAX_CARD_TOKEN_LENGTH, MAX_MERCHANT_REFERENCE_LENGTH, MIN_AMOUNT, MIN_CARD_TOKEN_LENGTH,
    MIN_MERCHANT_REFERENCE_LENGTH, VALID_SORT_FIELDS,
};
use crate::domain::ports::{CustomerStore, PaymentStatusStore, PaymentStore, TransactionStore};
use crate::domain::transaction::{NewTransaction, Transaction, TransactionStatus, TransactionType};
use crate::error::ServiceError;
use crate::gateways::{AuthorizeRequest, GatewayResponse, PaymentGateway};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePaymentData {
    pub amount: Decimal,
    pub currency: String,
    pub card_token: String,
    pub merchant_reference: String,
    pub customer_id: Uuid,
    pub payment_status_id: Uuid,
    pub metadata: Option<serde_json::Value>,
}

/// Drives a payment through authorize and capture (and later refund) against
/// the gateway port, appending one ledger entry per gateway attempt and
/// keeping the payment's catalog status in step with each outcome.
#[derive(Clone)]
pub struct PaymentService {
    pub payments: Arc<dyn PaymentStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub statuses: Arc<dyn PaymentStatusStore>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub async fn create_payment(&self, data: CreatePaymentData) -> Result<Payment, ServiceError> {
        tracing::info!(merchant_reference = %data.merchant_reference, "creating payment");

        validate_payment_data(
            data.amount,
            &data.currency,
            &data.card_token,
            &data.merchant_reference,
        )?;

        if self.customers.find_by_id(data.customer_id).await?.is_none() {
            return Err(ServiceError::not_found("Customer", data.customer_id));
        }
        if self
            .statuses
            .find_by_id(data.payment_status_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("PaymentStatus", data.payment_status_id));
        }

        let payment = self
            .payments
            .create(NewPayment {
                amount: data.amount,
                currency: data.currency.trim().to_uppercase(),
                card_token: data.card_token.trim().to_string(),
                merchant_reference: data.merchant_reference.trim().to_string(),
                customer_id: data.customer_id,
                payment_status_id: data.payment_status_id,
                metadata: data.metadata.unwrap_or_else(|| json!({})),
            })
            .await?;

        tracing::info!(payment_id = %payment.id, "payment created");
        Ok(payment)
    }

    /// Authorize + capture. Preconditions aside, every error past the
    /// PROCESSING transition drives the payment to FAILED before surfacing,
    /// and every gateway attempt lands in the ledger before its success flag
    /// decides anything.
    pub async fn process_payment(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        tracing::info!(%payment_id, "processing payment");

        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))?;

        let pending_id = self.resolve_state(PaymentState::Pending).await?;
        if payment.payment_status_id != pending_id {
            tracing::warn!(%payment_id, "payment is not in PENDING");
            return Err(ServiceError::validation(
                "payment can only be processed when status is PENDING",
            ));
        }

        let processing_id = self.resolve_state(PaymentState::Processing).await?;
        let moved = self
            .payments
            .transition_status(payment.id, pending_id, processing_id)
            .await?;
        if !moved {
            // Another call won the race between our precondition read and the
            // conditional write.
            return Err(ServiceError::validation("payment is already being processed"));
        }

        match self.run_charge_sequence(&payment).await {
            Ok(()) => {
                tracing::info!(%payment_id, "payment processed");
                self.reload(payment.id).await
            }
            Err(err) => {
                self.mark_failed(payment.id).await;
                Err(match err {
                    ServiceError::Payment { .. } => err,
                    other => {
                        tracing::error!(%payment_id, "unexpected error processing payment: {other:#}");
                        ServiceError::Payment {
                            message: "payment processing failed".to_string(),
                            gateway_code: None,
                            gateway_message: Some(other.to_string()),
                        }
                    }
                })
            }
        }
    }

    async fn run_charge_sequence(&self, payment: &Payment) -> Result<(), ServiceError> {
        let authorize = self
            .gateway
            .authorize(&AuthorizeRequest {
                amount: payment.amount,
                currency: payment.currency.clone(),
                card_token: payment.card_token.clone(),
                merchant_reference: payment.merchant_reference.clone(),
                metadata: payment.metadata.clone(),
            })
            .await?;
        self.record_attempt(payment.id, TransactionType::Authorization, payment.amount, &authorize)
            .await?;
        if !authorize.success {
            return Err(payment_error("payment authorization failed", &authorize));
        }

        let authorized_id = self.resolve_state(PaymentState::Authorized).await?;
        self.payments.update_status(payment.id, authorized_id).await?;

        let auth_transaction_id = authorize.transaction_id.clone().ok_or_else(|| {
            ServiceError::Payment {
                message: "gateway returned no authorization transaction id".to_string(),
                gateway_code: None,
                gateway_message: None,
            }
        })?;

        let capture = self
            .gateway
            .capture(&auth_transaction_id, payment.amount)
            .await?;
        self.record_attempt(payment.id, TransactionType::Capture, payment.amount, &capture)
            .await?;
        if !capture.success {
            return Err(payment_error("payment capture failed", &capture));
        }

        let captured_id = self.resolve_state(PaymentState::Captured).await?;
        self.payments.update_status(payment.id, captured_id).await?;
        self.payments
            .merge_metadata(
                payment.id,
                &json!({
                    "authorizationTransactionId": auth_transaction_id,
                    "captureTransactionId": capture.transaction_id,
                }),
            )
            .await?;

        Ok(())
    }

    /// Refund against the successful capture. A failed or errored refund
    /// leaves the payment's status untouched; only the ledger records the
    /// attempt.
    pub async fn refund_payment(
        &self,
        payment_id: Uuid,
        amount: Option<Decimal>,
    ) -> Result<Payment, ServiceError> {
        tracing::info!(%payment_id, ?amount, "refunding payment");

        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))?;

        let state = self.current_state(&payment).await?;
        if !matches!(
            state,
            Some(PaymentState::Captured) | Some(PaymentState::PartiallyRefunded)
        ) {
            tracing::warn!(%payment_id, ?state, "payment is not refundable");
            return Err(ServiceError::validation(
                "payment can only be refunded when status is CAPTURED or PARTIALLY_REFUNDED",
            ));
        }

        let ledger = self.transactions.find_by_payment_id(payment.id).await?;
        let capture_transaction_id = find_capture_transaction(&ledger)
            .ok_or_else(|| {
                ServiceError::validation("cannot find capture transaction for this payment")
            })?
            .to_string();

        let already_refunded = refunded_total(&ledger);
        let remaining = payment.amount - already_refunded;
        let refund_amount = amount.unwrap_or(remaining);
        if refund_amount <= Decimal::ZERO || refund_amount > remaining {
            return Err(ServiceError::validation(format!(
                "refund amount must be between 0 and {remaining}"
            )));
        }

        let refund = self
            .gateway
            .refund(&capture_transaction_id, refund_amount)
            .await?;
        self.record_attempt(payment.id, TransactionType::Refund, refund_amount, &refund)
            .await?;
        if !refund.success {
            return Err(payment_error("payment refund failed", &refund));
        }

        let new_state = if already_refunded + refund_amount == payment.amount {
            PaymentState::Refunded
        } else {
            PaymentState::PartiallyRefunded
        };
        let new_status_id = self.resolve_state(new_state).await?;
        self.payments.update_status(payment.id, new_status_id).await?;
        self.payments
            .merge_metadata(
                payment.id,
                &json!({
                    "refundTransactionId": refund.transaction_id,
                    "refundAmount": refund_amount,
                }),
            )
            .await?;

        tracing::info!(%payment_id, %refund_amount, "payment refunded");
        self.reload(payment.id).await
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))
    }

    /// Ledger entries for a payment, oldest first.
    pub async fn get_payment_transactions(
        &self,
        payment_id: Uuid,
    ) -> Result<Vec<Transaction>, ServiceError> {
        // 404 for unknown payments rather than an empty ledger.
        self.get_payment(payment_id).await?;
        Ok(self.transactions.find_by_payment_id(payment_id).await?)
    }

    pub async fn list_payments(
        &self,
        page: PageRequest,
        sort_by: Option<&str>,
        filters: &PaymentFilters,
    ) -> Result<Paged<Payment>, ServiceError> {
        let sort_by = sanitize_sort_field(sort_by, VALID_SORT_FIELDS);
        Ok(self
            .payments
            .find_with_pagination(page, sort_by, filters)
            .await?)
    }

    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), ServiceError> {
        if !self.payments.soft_delete(payment_id).await? {
            return Err(ServiceError::not_found("Payment", payment_id));
        }
        tracing::info!(%payment_id, "payment deleted");
        Ok(())
    }

    /// Resolves a workflow state to its catalog row id, one lookup per
    /// transition. A missing row means the deployment's catalog is broken,
    /// which is a not-found condition rather than bad input.
    async fn resolve_state(&self, state: PaymentState) -> Result<Uuid, ServiceError> {
        self.statuses
            .find_by_name(state.name())
            .await?
            .map(|s| s.id)
            .ok_or_else(|| ServiceError::not_found("PaymentStatus", state.name()))
    }

    async fn current_state(&self, payment: &Payment) -> Result<Option<PaymentState>, ServiceError> {
        let status = self
            .statuses
            .find_by_id(payment.payment_status_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("PaymentStatus", payment.payment_status_id))?;
        Ok(PaymentState::from_name(&status.name))
    }

    async fn record_attempt(
        &self,
        payment_id: Uuid,
        tx_type: TransactionType,
        amount: Decimal,
        response: &GatewayResponse,
    ) -> Result<Transaction, ServiceError> {
        let entry = self
            .transactions
            .create(NewTransaction {
                payment_id,
                tx_type,
                amount,
                status: if response.success {
                    TransactionStatus::Success
                } else {
                    TransactionStatus::Failed
                },
                gateway_response: response.raw_response.clone(),
                gateway_transaction_id: response.transaction_id.clone(),
            })
            .await?;
        Ok(entry)
    }

    async fn mark_failed(&self, payment_id: Uuid) {
        let result = async {
            let failed_id = self.resolve_state(PaymentState::Failed).await?;
            self.payments.update_status(payment_id, failed_id).await?;
            Ok::<_, ServiceError>(())
        }
        .await;
        if let Err(err) = result {
            tracing::warn!(%payment_id, "could not mark payment FAILED: {err}");
        }
    }

    async fn reload(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))
    }
}

fn payment_error(message: &str, response: &GatewayResponse) -> ServiceError {
    ServiceError::Payment {
        message: response
            .error_message
            .clone()
            .unwrap_or_else(|| message.to_string()),
        gateway_code: response.error_code.clone(),
        gateway_message: response.error_message.clone(),
    }
}

pub fn validate_payment_data(
    amount: Decimal,
    currency: &str,
    card_token: &str,
    merchant_reference: &str,
) -> Result<(), ServiceError> {
    if amount < MIN_AMOUNT || amount > MAX_AMOUNT {
        return Err(ServiceError::validation(format!(
            "amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}"
        )));
    }

    let currency = currency.trim().to_uppercase();
    if currency.len() != CURRENCY_CODE_LENGTH || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ServiceError::validation(
            "currency must be a valid 3-letter ISO code (e.g. USD, EUR)",
        ));
    }

    let card_token = card_token.trim();
    if card_token.len() < MIN_CARD_TOKEN_LENGTH {
        return Err(ServiceError::validation(format!(
            "card token must be at least {MIN_CARD_TOKEN_LENGTH} characters"
        )));
    }
    if card_token.len() > MAX_CARD_TOKEN_LENGTH {
        return Err(ServiceError::validation(format!(
            "card token must not exceed {MAX_CARD_TOKEN_LENGTH} characters"
        )));
    }

    let merchant_reference = merchant_reference.trim();
    if merchant_reference.len() < MIN_MERCHANT_REFERENCE_LENGTH {
        return Err(ServiceError::validation(format!(
            "merchant reference must be at least {MIN_MERCHANT_REFERENCE_LENGTH} characters"
        )));
    }
    if merchant_reference.len() > MAX_MERCHANT_REFERENCE_LENGTH {
        return Err(ServiceError::validation(format!(
            "merchant reference must not exceed {MAX_MERCHANT_REFERENCE_LENGTH} characters"
        )));
    }

    Ok(())
}

/// The gateway transaction id of the successful capture, if any. Refunds are
/// issued against this id.
pub fn find_capture_transaction(ledger: &[Transaction]) -> Option<&str> {
    ledger
        .iter()
        .find(|t| {
            t.tx_type == TransactionType::Capture
                && t.status == TransactionStatus::Success
                && t.gateway_transaction_id.is_some()
        })
        .and_then(|t| t.gateway_transaction_id.as_deref())
}

/// Sum of successfully refunded amounts so far. Failed refund attempts do not
/// reduce the refundable balance.
pub fn refunded_total(ledger: &[Transaction]) -> Decimal {
    ledger
        .iter()
        .filter(|t| t.tx_type == TransactionType::Refund && t.status == TransactionStatus::Success)
        .map(|t| t.amount)
        .sum()
}
