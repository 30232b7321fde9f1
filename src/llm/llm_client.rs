//! LLM Client Trait
//!
//! Narrow capability interface over an LLM provider: prompt text in,
//! response text out. The orchestrator depends only on this trait.

use anyhow::Result;
use async_trait::async_trait;

/// Unified LLM client interface
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Call the LLM with system + user prompts, return raw text response
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
