use crate::domain::pagination::{PageRequest, SortOrder};
use crate::domain::payment::PaymentFilters;
use crate::service::payment_service::CreatePaymentData;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    pub card_token: String,
    pub merchant_reference: String,
    pub customer_id: Uuid,
    pub payment_status_id: Uuid,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RefundPaymentRequest {
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub customer_id: Option<Uuid>,
    pub payment_status_id: Option<Uuid>,
    pub merchant_reference: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub currency: Option<String>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let data = CreatePaymentData {
        amount: req.amount,
        currency: req.currency,
        card_token: req.card_token,
        merchant_reference: req.merchant_reference,
        customer_id: req.customer_id,
        payment_status_id: req.payment_status_id,
        metadata: req.metadata,
    };
    match state.payment_service.create_payment(data).await {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.get_payment(payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    let page = PageRequest::new(query.page, query.limit, query.sort_order);
    let filters = PaymentFilters {
        customer_id: query.customer_id,
        payment_status_id: query.payment_status_id,
        merchant_reference: query.merchant_reference,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        currency: query.currency,
    };
    match state
        .payment_service
        .list_payments(page, query.sort_by.as_deref(), &filters)
        .await
    {
        Ok(paged) => (StatusCode::OK, Json(paged)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn process_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.process_payment(payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn refund_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    body: Option<Json<RefundPaymentRequest>>,
) -> impl IntoResponse {
    let amount = body.and_then(|Json(req)| req.amount);
    match state.payment_service.refund_payment(payment_id, amount).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.delete_payment(payment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_payment_transactions(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .payment_service
        .get_payment_transactions(payment_id)
        .await
    {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(err) => err.into_response(),
    }
}
