//! db-chat: natural-language chat with a PostgreSQL database
//!
//! An HTTP service that translates questions into SQL through an LLM,
//! executes the SQL against a caller-supplied PostgreSQL database, and
//! returns the result set together with a natural-language summary.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod sql;

pub use config::AppConfig;
pub use db::{ConnectionParams, SqlResult, NO_ROWS_STATUS};
pub use error::ChatError;
pub use llm::{GroqClient, LlmClient};
pub use orchestrator::{ChatOrchestrator, ChatResult};
pub use sql::{extract_sql_query, is_valid_sql};
