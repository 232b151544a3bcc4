//! # fieldguard-demo: Binary Entry Point
//!
//! Serves the demo user service with validation enabled.
//!
//! - `PORT`: listen port (default 8080).
//! - `FIELDGUARD_CONFIG`: optional YAML or JSON route configuration. Without
//!   it the built-in demo validator is used.

use fieldguard_core::ValidationConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let validator = match std::env::var("FIELDGUARD_CONFIG") {
        Ok(path) => {
            let validator = ValidationConfig::load(&path)
                .and_then(|config| config.build())
                .map_err(|e| {
                    tracing::error!(%path, "failed to load validation config: {e}");
                    e
                })?;
            tracing::info!(%path, routes = validator.entries().len(), "validation config loaded");
            validator
        }
        Err(_) => {
            tracing::info!("FIELDGUARD_CONFIG not set; using built-in demo routes");
            fieldguard_axum::demo::default_validator()?
        }
    };

    let app = fieldguard_axum::demo::app(validator);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("fieldguard demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
