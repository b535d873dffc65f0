use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    /// Reserved for session-backed auth; the web form is currently stateless.
    #[allow(dead_code)]
    pub secret_key: String,
    pub port: u16,
    pub rust_log: String,
    pub debug: bool,
    /// Upper bound on the completion round-trip, in seconds. Errors and
    /// timeouts alike route to the deterministic fallback.
    pub llm_timeout_secs: u64,
    /// Maximum number of students per batch request.
    pub max_batch_size: usize,
    /// Student names are truncated to this many characters before storage.
    pub max_name_length: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| "dev-secret-key-change-in-production".to_string()),
            port: env_or("PORT", "8080").parse::<u16>().context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            debug: env_or("APP_DEBUG", "false").to_lowercase() == "true",
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a positive integer")?,
            max_batch_size: env_or("MAX_BATCH_SIZE", "50")
                .parse::<usize>()
                .context("MAX_BATCH_SIZE must be a positive integer")?,
            max_name_length: env_or("MAX_NAME_LENGTH", "100")
                .parse::<usize>()
                .context("MAX_NAME_LENGTH must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
