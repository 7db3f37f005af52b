use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // MongoDB
    pub mongodb_uri: String,
    pub database_name: String,

    // Translation provider
    pub translation_api_url: Option<String>,
    pub translation_api_key: Option<String>,
    pub translation_provider: String,
    pub translation_timeout_secs: u64,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // MongoDB
            mongodb_uri: std::env::var("MONGODB_URI").context("MONGODB_URI not set")?,
            database_name: std::env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "article_engine".to_string()),

            // Translation provider. Optional: without both URL and key the
            // engine runs with translation passthrough.
            translation_api_url: std::env::var("TRANSLATION_API_URL").ok(),
            translation_api_key: std::env::var("TRANSLATION_API_KEY").ok(),
            translation_provider: std::env::var("TRANSLATION_PROVIDER")
                .unwrap_or_else(|_| "google".to_string()),
            translation_timeout_secs: std::env::var("TRANSLATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
