use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::executions::{ExecuteRequest, ExecuteResponse};

#[automock]
#[async_trait]
pub trait CodeExecutionClient {
    async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse>;
}
