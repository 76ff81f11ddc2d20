use std::sync::Arc;

use connections_server::{config::AppConfig, hint::HintStrategy, server::run_server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Arc::new(AppConfig::from_env());

    tracing_subscriber::registry()
        .with(EnvFilter::new(config.log_level.clone()))
        .with(fmt::layer())
        .init();

    tracing::info!(
        addr = %format!("{}:{}", config.host, config.port),
        workers = config.workers,
        "Connections server starting"
    );
    tracing::info!(
        data_file = %config.data_file.display(),
        store_ttl_secs = config.store_ttl.as_secs(),
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        shape = %format!("{}x{}", config.shape.categories, config.shape.words_per_category),
        "Puzzle archive settings"
    );
    match &config.hints.api_key {
        Some(_) if config.hints.strategy == HintStrategy::Completion => tracing::info!(
            strategy = %config.hints.strategy,
            model = %config.hints.model,
            api_base_url = %config.hints.api_base_url,
            timeout_secs = config.hints.timeout.as_secs(),
            "Hints phrased by completion backend"
        ),
        _ => tracing::info!(strategy = %config.hints.strategy, "Hints served from templates"),
    }

    run_server(config).await
}
