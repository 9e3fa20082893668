//! Customer read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CustomerQuery, CustomerRepository, CustomerRepositoryError};
use crate::domain::{CustomerOption, CustomerSummary, Error};

/// Customer query service implementing [`CustomerQuery`].
#[derive(Clone)]
pub struct CustomerQueryService<R> {
    repository: Arc<R>,
}

impl<R> CustomerQueryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_customer_repository_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> CustomerQuery for CustomerQueryService<R>
where
    R: CustomerRepository,
{
    async fn customer_options(&self) -> Result<Vec<CustomerOption>, Error> {
        self.repository
            .list_options()
            .await
            .map_err(map_customer_repository_error)
    }

    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummary>, Error> {
        self.repository
            .list_filtered(query.trim())
            .await
            .map_err(map_customer_repository_error)
    }
}
