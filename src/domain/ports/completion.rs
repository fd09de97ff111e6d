use anyhow::Result;
use async_trait::async_trait;

/// Port for the text-generation capability.
///
/// Implementations must signal an error on missing credentials, transport
/// failure, non-success responses, or empty content; they must never
/// silently return an empty string. The caller decides how to recover.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a system/user prompt pair and return the raw response text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
