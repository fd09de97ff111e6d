//! OpenAI-compatible chat completions client.
//!
//! Explicitly constructed and dependency-injected; there is no global
//! client. Transient failures are retried with exponential backoff,
//! permanent failures (credentials, bad requests) fail fast.

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{ChatClientConfig, ChatCompletionsClient};
pub use error::CompletionApiError;
pub use retry::RetryPolicy;
