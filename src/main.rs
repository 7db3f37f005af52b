use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use article_engine::config::Config;
use article_engine::http;
use article_engine::service::ArticleService;
use article_engine::store::MongoArticleStore;
use article_engine::translator::Translator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("article_engine=info".parse()?),
        )
        .init();

    info!("Starting article engine");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Connect to MongoDB and bootstrap indexes
    info!("Connecting to MongoDB");
    let client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let db = client.database(&config.database_name);
    let store = MongoArticleStore::new(&db);
    store
        .ensure_indexes()
        .await
        .context("Failed to create article indexes")?;

    // Translation provider (passthrough when unconfigured)
    let translator = Translator::new(
        config.translation_api_url.clone(),
        config.translation_api_key.clone(),
        config.translation_provider.clone(),
        Duration::from_secs(config.translation_timeout_secs),
    );
    if translator.is_configured() {
        info!(provider = %translator.provider(), "Translation provider configured");
    } else {
        info!("No translation provider configured, translations pass through unchanged");
    }

    let service = Arc::new(ArticleService::new(Arc::new(store), translator));
    let app = http::router(service);

    let addr = format!("0.0.0.0:{}", config.port);
    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
