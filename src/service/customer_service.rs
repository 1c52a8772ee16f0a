use crate::domain::customer::{
    Customer, CustomerPatch, NewCustomer, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_NAME_LENGTH,
    VALID_SORT_FIELDS,
};
use crate::domain::pagination::{sanitize_sort_field, PageRequest, Paged};
use crate::domain::ports::CustomerStore;
use crate::error::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomerService {
    pub customers: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub async fn create_customer(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Customer, ServiceError> {
        tracing::info!(email, "creating customer");

        let name = validate_name(name)?;
        let email = validate_email(email)?;

        if self.customers.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::validation(format!(
                "customer with email '{email}' already exists"
            )));
        }

        let customer = self.customers.create(NewCustomer { name, email }).await?;
        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, ServiceError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Customer, ServiceError> {
        tracing::info!(customer_id = %id, "updating customer");

        self.get_customer(id).await?;

        let mut patch = CustomerPatch::default();
        if let Some(name) = name {
            patch.name = Some(validate_name(name)?);
        }
        if let Some(email) = email {
            let email = validate_email(email)?;
            if let Some(existing) = self.customers.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(ServiceError::validation(format!(
                        "customer with email '{email}' already exists"
                    )));
                }
            }
            patch.email = Some(email);
        }

        self.customers
            .update(id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.customers.soft_delete(id).await? {
            return Err(ServiceError::not_found("Customer", id));
        }
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }

    pub async fn list_customers(
        &self,
        page: PageRequest,
        sort_by: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Paged<Customer>, ServiceError> {
        let sort_by = sanitize_sort_field(sort_by, VALID_SORT_FIELDS);
        Ok(self
            .customers
            .find_with_pagination(page, sort_by, name, email)
            .await?)
    }
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.len() < MIN_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "customer name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "customer name must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ServiceError::validation(format!(
            "email must not be empty or exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    // local@domain.tld, no whitespace, exactly one '@'.
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ServiceError::validation("invalid email format")),
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(ServiceError::validation("invalid email format"));
    }

    Ok(email)
}
