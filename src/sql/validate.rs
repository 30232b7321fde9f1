//! Lexical sanity check for candidate SQL

use once_cell::sync::Lazy;
use regex::Regex;

/// Grammar keywords whose presence marks a candidate as plausible SQL.
const SQL_GRAMMAR_KEYWORDS: [&str; 9] = [
    "SELECT", "FROM", "WHERE", "INSERT", "UPDATE", "DELETE", "JOIN", "GROUP BY", "ORDER BY",
];

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9.]+$").unwrap());

/// Heuristic check that a candidate string looks like SQL.
///
/// Necessary but not sufficient: this filters obvious non-SQL text, it does
/// not guarantee the statement will execute.
pub fn is_valid_sql(query: &str) -> bool {
    if NUMERIC_RE.is_match(query.trim()) {
        return false;
    }

    let upper = query.to_uppercase();
    SQL_GRAMMAR_KEYWORDS.iter().any(|kw| upper.contains(kw))
}
