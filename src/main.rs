use std::sync::Arc;
use tower_http::cors::CorsLayer;

use autotube::capabilities::{GeminiCapabilities, GenerationCapability, UnconfiguredCapabilities};
use autotube::config::AppConfig;
use autotube::gemini_client::GeminiClient;
use autotube::store::{InMemoryProjectStore, PgProjectStore, ProjectStore};
use autotube::{app, db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let config = AppConfig::from_env()?;

    let capabilities: Arc<dyn GenerationCapability> = match &config.gemini_api_key {
        Some(api_key) => {
            let client = GeminiClient::new(api_key.clone())
                .with_models(&config.gemini_text_model, &config.gemini_image_model)
                .with_timeout(config.gemini_timeout)?;
            tracing::info!(
                "✅ Gemini client initialized (text: {}, image: {})",
                client.text_model(),
                client.image_model()
            );
            Arc::new(GeminiCapabilities::new(client))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set - content generation will fail until it is configured");
            Arc::new(UnconfiguredCapabilities)
        }
    };

    let (store, store_backend): (Arc<dyn ProjectStore>, &'static str) = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("✅ Project store: PostgreSQL");
            (Arc::new(PgProjectStore::new(pool)), "postgres")
        }
        None => {
            tracing::warn!("DATABASE_URL not set - projects are kept in memory only");
            (Arc::new(InMemoryProjectStore::new()), "memory")
        }
    };

    let shared_state = Arc::new(AppState::new(
        capabilities,
        store,
        config.storyboard_max_scenes,
        config.gemini_api_key.is_some(),
        store_backend,
    ));

    let router = app(shared_state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,autotube=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,autotube=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON for log aggregation
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!("🎬 AutoTube starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
