use page_translator::{server, TranslationService, TranslatorConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_translator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = TranslatorConfig::load_from_default_locations();
    config.apply_env_overrides();

    let service = match TranslationService::new(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!("Failed to start translator: {}", e);
            return Err(e.into());
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        "Page translator listening on {} (model={}, batch_size={})",
        addr,
        config.provider.model,
        config.pipeline.batch_size
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, server::router(service)).await?;

    Ok(())
}
