//! Query Orchestrator
//!
//! Drives one chat request end to end: connect, generate SQL through the
//! LLM, extract + validate (with a single bounded retry), execute, and
//! summarize. Everything here is request-scoped.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::db::{self, ConnectionParams, SqlResult};
use crate::error::ChatError;
use crate::llm::LlmClient;
use crate::sql::{extract_sql_query, is_valid_sql};

/// The sole externally visible output of a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub user_query: String,
    pub sql_query: String,
    pub sql_result: SqlResult,
    pub summary: Option<String>,
}

const GENERATION_SYSTEM_PROMPT: &str = "For the question you are given, generate a valid SQL query to answer it. \
     The query must run on PostgreSQL. \
     Start with a SQL keyword like SELECT, INSERT, UPDATE, etc. \
     DO NOT include explanations, markdown formatting, or anything else - ONLY the SQL query itself.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You summarize SQL query results. Provide a clear, concise summary of the results in natural language.";

/// Orchestrates the prompt -> extract -> validate -> execute -> summarize
/// pipeline for a single request.
pub struct ChatOrchestrator {
    llm: Arc<dyn LlmClient>,
}

impl ChatOrchestrator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Answer a natural-language question against the given database.
    pub async fn answer(
        &self,
        question: &str,
        params: &ConnectionParams,
    ) -> Result<ChatResult, ChatError> {
        let pool = db::connect(params).await.map_err(ChatError::Connection)?;

        // The pool is released on every path once execution is done.
        let result = self.answer_with_pool(question, &pool).await;
        pool.close().await;
        result
    }

    async fn answer_with_pool(
        &self,
        question: &str,
        pool: &PgPool,
    ) -> Result<ChatResult, ChatError> {
        let schema = match db::schema_summary(pool).await {
            Ok(s) => s,
            Err(e) => {
                warn!("schema introspection failed, generating without it: {}", e);
                String::new()
            }
        };

        let sql_query = self.generate_sql(question, &schema).await?;
        info!(model = self.llm.model_name(), sql = %sql_query, "executing generated SQL");

        let sql_result = db::execute(pool, &sql_query).await?;

        let summary = self.summarize(question, &sql_query, &sql_result).await;

        Ok(ChatResult {
            user_query: question.to_string(),
            sql_query,
            sql_result,
            summary,
        })
    }

    /// Generate SQL for the question, allowing the LLM exactly one
    /// corrective retry when extraction or validation fails.
    async fn generate_sql(&self, question: &str, schema: &str) -> Result<String, ChatError> {
        let response = self
            .llm
            .chat(GENERATION_SYSTEM_PROMPT, &generation_prompt(question, schema))
            .await
            .map_err(ChatError::Llm)?;
        debug!(response = %response, "agent response");

        match extract_and_validate(&response) {
            Ok(sql) => Ok(sql),
            Err(first_err) if first_err.is_retryable() => {
                warn!("no valid SQL in agent response, retrying once: {}", first_err);
                let response = self
                    .llm
                    .chat(GENERATION_SYSTEM_PROMPT, &retry_prompt(question))
                    .await
                    .map_err(ChatError::Llm)?;
                debug!(response = %response, "agent retry response");
                extract_and_validate(&response)
            }
            Err(other) => Err(other),
        }
    }

    /// Ask the LLM for a natural-language summary of the results.
    ///
    /// A failure here does not discard a valid result set; the request
    /// succeeds with no summary.
    async fn summarize(
        &self,
        question: &str,
        sql_query: &str,
        sql_result: &SqlResult,
    ) -> Option<String> {
        let result_json = match serde_json::to_string(sql_result) {
            Ok(s) => s,
            Err(e) => {
                warn!("could not encode results for summarization: {}", e);
                return None;
            }
        };

        match self
            .llm
            .chat(
                SUMMARY_SYSTEM_PROMPT,
                &summary_prompt(question, sql_query, &result_json),
            )
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("summarization failed, returning results without summary: {:#}", e);
                None
            }
        }
    }
}

fn extract_and_validate(response: &str) -> Result<String, ChatError> {
    let sql = extract_sql_query(response)?;
    if !is_valid_sql(&sql) {
        return Err(ChatError::Validation { candidate: sql });
    }
    Ok(sql)
}

fn generation_prompt(question: &str, schema: &str) -> String {
    let mut prompt = format!("Question: \"{}\"\n", question);
    if !schema.is_empty() {
        prompt.push_str("\nThe database has the following schema:\n");
        prompt.push_str(schema);
        prompt.push('\n');
    }
    prompt
}

fn retry_prompt(question: &str) -> String {
    format!(
        "The previous response didn't contain a valid SQL query. \
         Please generate a valid SQL query (starting with SELECT, INSERT, etc.) for this question: \
         \"{}\"\n\
         Return ONLY the SQL query itself, no explanations.",
        question
    )
}

fn summary_prompt(question: &str, sql_query: &str, result_json: &str) -> String {
    format!(
        "Question: {}\nSQL Query: {}\nSQL Result: {}\n\n\
         Please provide a clear, concise summary of these results in natural language.",
        question, sql_query, result_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Deterministic LlmClient stub replaying canned responses in order.
    struct StubLlm {
        responses: Mutex<Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubLlm {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
            self.calls.lock().unwrap().push(user_prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| anyhow::anyhow!("stub exhausted"))
        }

        fn model_name(&self) -> &str {
            "stub"
        }

        fn provider_name(&self) -> &str {
            "Stub"
        }
    }

    fn orchestrator(responses: &[&str]) -> (ChatOrchestrator, Arc<StubLlm>) {
        let stub = Arc::new(StubLlm::new(responses));
        (ChatOrchestrator::new(stub.clone()), stub)
    }

    #[tokio::test]
    async fn test_clean_response_needs_no_retry() {
        let (orch, stub) = orchestrator(&["SELECT count(*) FROM users"]);
        let sql = orch.generate_sql("how many users?", "").await.unwrap();
        assert_eq!(sql, "SELECT count(*) FROM users");
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fenced_response_is_unwrapped() {
        let (orch, _) = orchestrator(&["```sql\nSELECT 1\n```"]);
        let sql = orch.generate_sql("anything", "").await.unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[tokio::test]
    async fn test_numeric_response_triggers_retry() {
        let (orch, stub) = orchestrator(&["42", "SELECT count(*) FROM users"]);
        let sql = orch.generate_sql("how many users?", "").await.unwrap();
        assert_eq!(sql, "SELECT count(*) FROM users");
        assert_eq!(stub.call_count(), 2);
        // The second call carries the corrective prompt
        let prompts = stub.prompts();
        assert!(prompts[1].contains("didn't contain a valid SQL query"));
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_fatal() {
        let (orch, stub) = orchestrator(&["42", "still not SQL, sorry"]);
        let err = orch.generate_sql("how many users?", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Extraction { .. }));
        // Exactly two attempts, never a third
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_candidate_triggers_retry() {
        // Extraction succeeds (keyword substring fallback) but validation
        // rejects the candidate.
        let (orch, stub) = orchestrator(&["CREATE", "SELECT 1"]);
        let sql = orch.generate_sql("make me a table", "").await.unwrap();
        assert_eq!(sql, "SELECT 1");
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_llm_failure_is_not_retried() {
        let (orch, stub) = orchestrator(&[]);
        let err = orch.generate_sql("how many users?", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Llm(_)));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_schema_is_injected_into_generation_prompt() {
        let (orch, stub) = orchestrator(&["SELECT name FROM users"]);
        orch.generate_sql("who is registered?", "Table users:\n  name (text)")
            .await
            .unwrap();
        assert!(stub.prompts()[0].contains("Table users"));
    }

}
