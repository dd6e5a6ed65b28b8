use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait ViewerTokenSource {
    async fn fetch_token(&self) -> Result<String>;
}
