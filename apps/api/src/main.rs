mod auth;
mod config;
mod db;
mod errors;
mod lifecycle;
mod llm_client;
mod models;
mod notify;
mod placement;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::notify::{EmailNotifier, HttpEmailNotifier, LogNotifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; a missing required variable stops startup.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting placement API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.anthropic_api_key.clone())?
        .with_api_url(config.anthropic_api_url.clone())
        .with_max_tokens(config.llm_max_tokens);
    info!(
        "LLM client initialized (model: {}, max_tokens: {})",
        llm_client::MODEL,
        config.llm_max_tokens
    );

    let notifier: Arc<dyn EmailNotifier> = match &config.email_function_url {
        Some(url) => {
            info!("Email delivery via {url}");
            Arc::new(HttpEmailNotifier::new(
                url.clone(),
                config.email_function_key.clone(),
                config.email_from.clone(),
            )?)
        }
        None => {
            warn!("EMAIL_FUNCTION_URL not set; interview emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState {
        db,
        redis,
        s3,
        llm,
        config: config.clone(),
        notifier,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// S3 client for MinIO locally or AWS in production.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "placement-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
