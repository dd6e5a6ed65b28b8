use anyhow::{Context, Result};
use std::{path::Path, sync::Arc};
use tracing::{error, info};

use crate::domain::{
    repositories::{code_execution::CodeExecutionClient, sinks::StatusSink},
    value_objects::executions::ExecuteRequest,
};

/// Runs editor contents on the server. The client enforces no size limit or
/// sandboxing; that is the server's job.
pub struct CodeExecutionUseCase<C, S>
where
    C: CodeExecutionClient + Send + Sync + 'static,
    S: StatusSink + Send + Sync + 'static,
{
    client: Arc<C>,
    output_sink: Arc<S>,
}

impl<C, S> CodeExecutionUseCase<C, S>
where
    C: CodeExecutionClient + Send + Sync + 'static,
    S: StatusSink + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>, output_sink: Arc<S>) -> Self {
        Self {
            client,
            output_sink,
        }
    }

    pub async fn run(&self, code_text: &str) -> Result<String> {
        info!(code_bytes = code_text.len(), "code_execution: submitting code");

        let response = self
            .client
            .execute(ExecuteRequest {
                code: code_text.to_string(),
            })
            .await
            .map_err(|err| {
                error!(error = ?err, "code_execution: request failed");
                err
            })?;

        self.output_sink.write(&response.output);
        Ok(response.output)
    }

    pub async fn run_file(&self, path: &Path) -> Result<String> {
        let code_text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read source file {}", path.display()))?;

        self.run(&code_text).await
    }
}
