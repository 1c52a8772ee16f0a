use crate::domain::pagination::{PageRequest, SortOrder};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentStatusRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentStatusesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub name: Option<String>,
}

pub async fn create_payment_status(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentStatusRequest>,
) -> impl IntoResponse {
    match state
        .payment_status_service
        .create_payment_status(&req.name, req.description.as_deref())
        .await
    {
        Ok(status) => (StatusCode::CREATED, Json(status)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_payment_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .payment_status_service
        .get_payment_status(status_id)
        .await
    {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_payment_statuses(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentStatusesQuery>,
) -> impl IntoResponse {
    let page = PageRequest::new(query.page, query.limit, query.sort_order);
    match state
        .payment_status_service
        .list_payment_statuses(page, query.sort_by.as_deref(), query.name.as_deref())
        .await
    {
        Ok(paged) => (StatusCode::OK, Json(paged)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> impl IntoResponse {
    match state
        .payment_status_service
        .update_payment_status(status_id, req.name.as_deref(), req.description.as_deref())
        .await
    {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_payment_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .payment_status_service
        .delete_payment_status(status_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
