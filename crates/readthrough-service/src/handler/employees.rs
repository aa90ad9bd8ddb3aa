//! Employee directory handler.

use super::{Handler, InvocationEvent};
use crate::fetcher::ReadThroughFetcher;
use async_trait::async_trait;
use readthrough_config::CacheFailurePolicy;
use readthrough_core::{EmployeeList, ReadThroughResult, EMPLOYEES_KEY};
use tracing::{debug, info, warn};

/// Serves the employee directory through the read-through cache.
pub struct EmployeesHandler {
    fetcher: ReadThroughFetcher<EmployeeList>,
    failure_policy: CacheFailurePolicy,
}

impl EmployeesHandler {
    /// Creates a handler. With [`CacheFailurePolicy::Bypass`] an unreachable
    /// cache store is skipped rather than failing the invocation.
    pub fn new(fetcher: ReadThroughFetcher<EmployeeList>, failure_policy: CacheFailurePolicy) -> Self {
        Self {
            fetcher,
            failure_policy,
        }
    }
}

#[async_trait]
impl Handler for EmployeesHandler {
    type Output = EmployeeList;

    async fn handle(&self, event: InvocationEvent) -> ReadThroughResult<EmployeeList> {
        debug!("Employees handler invoked with event {}", event);

        let employees = match self.fetcher.fetch(EMPLOYEES_KEY).await {
            Err(e) if e.is_cache_failure() && self.failure_policy == CacheFailurePolicy::Bypass => {
                warn!(error = %e, "Cache unavailable, serving employees straight from origin");
                self.fetcher.fetch_uncached().await?
            }
            other => other?,
        };

        info!("Serving {} employees", employees.len());
        Ok(employees)
    }
}
