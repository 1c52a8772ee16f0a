use crate::domain::pagination::{PageRequest, SortOrder};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> impl IntoResponse {
    match state
        .customer_service
        .create_customer(&req.name, &req.email)
        .await
    {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.customer_service.get_customer(customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> impl IntoResponse {
    let page = PageRequest::new(query.page, query.limit, query.sort_order);
    match state
        .customer_service
        .list_customers(
            page,
            query.sort_by.as_deref(),
            query.name.as_deref(),
            query.email.as_deref(),
        )
        .await
    {
        Ok(paged) => (StatusCode::OK, Json(paged)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> impl IntoResponse {
    match state
        .customer_service
        .update_customer(customer_id, req.name.as_deref(), req.email.as_deref())
        .await
    {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.customer_service.delete_customer(customer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
