//! LLM integration
//!
//! The orchestrator talks to the model through the narrow [`LlmClient`]
//! trait so the pipeline can be tested with canned responses. The only
//! production implementation is [`GroqClient`].

pub mod groq_client;
pub mod llm_client;

pub use groq_client::GroqClient;
pub use llm_client::LlmClient;
