//! Service configuration
//!
//! All environment reads happen once at startup; the resulting config is
//! passed explicitly into the components that need it.

use anyhow::{anyhow, Result};

/// Configuration read from the environment at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Groq API key (required)
    pub groq_api_key: String,
    /// Model override, defaults to the client's built-in model
    pub groq_model: Option<String>,
    /// Port to bind the HTTP server on
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("GROQ_API_KEY environment variable not set"))?;

        let groq_model = std::env::var("GROQ_MODEL").ok();

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .unwrap_or(8000);

        Ok(Self {
            groq_api_key,
            groq_model,
            port,
        })
    }
}
