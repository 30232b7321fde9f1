//! SQL statement extraction from LLM response text

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ChatError;

/// Keywords searched for when the response carries no code formatting.
/// Ordered by priority; the first keyword found wins.
const SQL_KEYWORDS: [&str; 8] = [
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "SHOW",
];

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9.]+$").unwrap());

static FENCED_SQL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```sql\s*(.*?)\s*```").unwrap());

static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)`(.*?)`").unwrap());

static KEYWORD_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SQL_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?is){}\s+.*", kw)).unwrap())
        .collect()
});

/// Isolate a single SQL statement from an arbitrary agent response.
///
/// Tries, in order: a fenced ```sql block, an inline backtick span, a
/// case-insensitive keyword match running to end of input, and finally the
/// whole response if it at least mentions a SQL keyword. A pure-numeric
/// response fails immediately - that shape means the agent answered the
/// question itself instead of producing SQL.
pub fn extract_sql_query(agent_response: &str) -> Result<String, ChatError> {
    if NUMERIC_RE.is_match(agent_response.trim()) {
        return Err(ChatError::Extraction {
            response: agent_response.to_string(),
        });
    }

    if let Some(caps) = FENCED_SQL_RE.captures(agent_response) {
        return Ok(caps[1].trim().to_string());
    }

    if let Some(caps) = INLINE_CODE_RE.captures(agent_response) {
        return Ok(caps[1].trim().to_string());
    }

    for re in KEYWORD_RES.iter() {
        if let Some(m) = re.find(agent_response) {
            return Ok(m.as_str().trim().to_string());
        }
    }

    let upper = agent_response.to_uppercase();
    if SQL_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        return Ok(agent_response.trim().to_string());
    }

    Err(ChatError::Extraction {
        response: agent_response.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_numeric_is_rejected() {
        for input in ["42", "3.14", "  1000  ", "0.5"] {
            assert!(
                matches!(
                    extract_sql_query(input),
                    Err(ChatError::Extraction { .. })
                ),
                "expected extraction failure for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_fenced_sql_block() {
        let response = "```sql\nSELECT 1\n```";
        assert_eq!(extract_sql_query(response).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_fenced_block_ignores_surrounding_prose() {
        let response = "Here is the query:\n```sql\nSELECT name FROM users\n```\nHope that helps!";
        assert_eq!(
            extract_sql_query(response).unwrap(),
            "SELECT name FROM users"
        );
    }

    #[test]
    fn test_inline_backtick_span() {
        let response = "The answer is `SELECT name FROM users`";
        assert_eq!(
            extract_sql_query(response).unwrap(),
            "SELECT name FROM users"
        );
    }

    #[test]
    fn test_keyword_match_runs_to_end_of_input() {
        let response = "Sure! select id,\n  name\nfrom users where active = true";
        assert_eq!(
            extract_sql_query(response).unwrap(),
            "select id,\n  name\nfrom users where active = true"
        );
    }

    #[test]
    fn test_keyword_priority_order() {
        // SELECT outranks DROP even when DROP appears first in the text
        let response = "DROP nothing, instead SELECT 1 FROM t";
        let extracted = extract_sql_query(response).unwrap();
        assert!(extracted.starts_with("SELECT"));
    }

    #[test]
    fn test_substring_fallback_returns_whole_response() {
        // Keyword present but not followed by whitespace anywhere
        let response = "  SELECT";
        assert_eq!(extract_sql_query(response).unwrap(), "SELECT");
    }

    #[test]
    fn test_no_sql_found() {
        let response = "I don't know how to answer that.";
        match extract_sql_query(response) {
            Err(ChatError::Extraction { response: r }) => assert_eq!(r, response),
            other => panic!("expected extraction failure, got {:?}", other),
        }
    }
}
