//! Invocation handlers.
//!
//! A handler is invoked once per request event and returns a serializable
//! result. The process bootstrap picks one and drives it.

mod employees;

pub use employees::EmployeesHandler;
pub use self_test::{SelfTestHandler, SelfTestOutput, SELF_TEST_KEY, SELF_TEST_VALUE};

use async_trait::async_trait;
use readthrough_core::ReadThroughResult;
use serde::Serialize;

/// The event a handler is invoked with. Handlers here ignore its contents.
pub type InvocationEvent = serde_json::Value;

/// A single-operation request handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// What a successful invocation returns.
    type Output: Serialize + Send;

    /// Handles one invocation.
    async fn handle(&self, event: InvocationEvent) -> ReadThroughResult<Self::Output>;
}
