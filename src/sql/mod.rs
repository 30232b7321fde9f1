//! SQL extraction and validation for free-form LLM responses
//!
//! LLM responses are unstructured; these helpers isolate a single SQL
//! statement with a layered pattern fallback and apply a lexical sanity
//! check. This is not a SQL parser - extraction is pattern-based and later
//! stages are only reached when the higher-confidence patterns fail.

pub mod extract;
pub mod validate;

pub use extract::extract_sql_query;
pub use validate::is_valid_sql;
