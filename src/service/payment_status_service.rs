use crate::domain::pagination::{sanitize_sort_field, PageRequest, Paged};
use crate::domain::payment_status::{
    NewPaymentStatus, PaymentStatus, PaymentStatusPatch, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
    MIN_NAME_LENGTH, VALID_SORT_FIELDS,
};
use crate::domain::ports::PaymentStatusStore;
use crate::error::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentStatusService {
    pub statuses: Arc<dyn PaymentStatusStore>,
}

impl PaymentStatusService {
    pub async fn create_payment_status(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<PaymentStatus, ServiceError> {
        tracing::info!(name, "creating payment status");

        let name = validate_name(name)?;
        let description = validate_description(description)?;

        if self.statuses.find_by_name(&name).await?.is_some() {
            return Err(ServiceError::validation(format!(
                "payment status with name '{name}' already exists"
            )));
        }

        let status = self
            .statuses
            .create(NewPaymentStatus { name, description })
            .await?;
        tracing::info!(status_id = %status.id, "payment status created");
        Ok(status)
    }

    pub async fn get_payment_status(&self, id: Uuid) -> Result<PaymentStatus, ServiceError> {
        self.statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("PaymentStatus", id))
    }

    pub async fn update_payment_status(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<PaymentStatus, ServiceError> {
        tracing::info!(status_id = %id, "updating payment status");

        self.get_payment_status(id).await?;

        let mut patch = PaymentStatusPatch::default();
        if let Some(name) = name {
            let name = validate_name(name)?;
            if let Some(existing) = self.statuses.find_by_name(&name).await? {
                if existing.id != id {
                    return Err(ServiceError::validation(format!(
                        "payment status with name '{name}' already exists"
                    )));
                }
            }
            patch.name = Some(name);
        }
        if let Some(description) = description {
            patch.description = validate_description(Some(description))?;
        }

        self.statuses
            .update(id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("PaymentStatus", id))
    }

    pub async fn delete_payment_status(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.statuses.soft_delete(id).await? {
            return Err(ServiceError::not_found("PaymentStatus", id));
        }
        tracing::info!(status_id = %id, "payment status deleted");
        Ok(())
    }

    pub async fn list_payment_statuses(
        &self,
        page: PageRequest,
        sort_by: Option<&str>,
        name: Option<&str>,
    ) -> Result<Paged<PaymentStatus>, ServiceError> {
        let sort_by = sanitize_sort_field(sort_by, VALID_SORT_FIELDS);
        Ok(self
            .statuses
            .find_with_pagination(page, sort_by, name)
            .await?)
    }
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.len() < MIN_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "payment status name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "payment status name must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: Option<&str>) -> Result<Option<String>, ServiceError> {
    match description {
        None => Ok(None),
        Some(description) => {
            let description = description.trim();
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(ServiceError::validation(format!(
                    "description must not exceed {MAX_DESCRIPTION_LENGTH} characters"
                )));
            }
            Ok(Some(description.to_string()))
        }
    }
}
