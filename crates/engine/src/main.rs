//! Spirit Dice Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spiritdice_engine::{api, infrastructure::config::EngineConfig, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spiritdice_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Spirit Dice Engine");

    let config = EngineConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");

    tokio::fs::create_dir_all(&config.portrait_dir).await?;
    tracing::info!(dir = %config.portrait_dir.display(), "Portrait directory ready");

    let cors = build_cors_layer(config.cors_allowed_origins.as_deref());
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;

    let app = Arc::new(App::from_config(config));

    if let Some(character) = app.seed().await? {
        tracing::info!(character_id = %character.id(), "Default character ready");
    }

    let mut router = api::router(app).layer(TraceLayer::new_for_http());
    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // Viewers send JSON and raw image bodies, both of which trigger preflights.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS set but no valid origins parsed");
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
