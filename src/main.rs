use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcp_thai_weather::{build_service, Settings, WeatherServer, BANGKOK_METRO};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_thai_weather=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(&BANGKOK_METRO)?;
    if settings.has_api_key() {
        tracing::info!("Using OpenWeatherMap at {}", settings.api_base_url);
    } else {
        tracing::info!("No API key configured, serving synthetic weather only");
    }

    tracing::info!("Starting MCP weather server");

    let service = build_service(&settings)?;
    let server = WeatherServer::new(Arc::new(service))
        .serve(rmcp::transport::stdio())
        .await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
