//! Opsdesk Server - IT operations dashboard back end
//!
//! Serves the file repository, service request and provisioning APIs from
//! an in-memory store.

mod config;
mod identity;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::HeaderValue,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use opsdesk::DashboardState;
use std::net::SocketAddr;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, Config};
use crate::identity::identity_middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let mut config = Config::from_env()?;
    Args::parse().apply(&mut config)?;

    init_tracing(config.log_json);
    info!("Starting opsdesk server on {}:{}", config.host, config.port);

    let state = DashboardState::new(config.dashboard.clone(), config.default_user.clone());
    if state.config.seed_demo_data {
        opsdesk::seed::seed_demo_data(&state.files, &state.requests)
            .await
            .context("Failed to seed demo data")?;
    }
    spawn_notification_log(&state);

    let app = build_router(state, &config)?;

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "opsdesk_server=info,opsdesk=info,tower_http=debug".into());
    let (plain, structured) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();
}

/// Mirror every toast into the server log
fn spawn_notification_log(state: &DashboardState) {
    let mut rx = state.notifier.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(n) => info!(variant = ?n.variant, "{}: {}", n.title, n.description),
                Err(RecvError::Lagged(skipped)) => warn!("Notification log skipped {} messages", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn build_router(state: DashboardState, config: &Config) -> Result<Router> {
    // CORS configuration
    let origin = match config.cors_origins() {
        Some(origins) => {
            let values = origins
                .iter()
                .map(|o| o.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid CORS_ALLOWED_ORIGINS")?;
            AllowOrigin::list(values)
        }
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state.clone());

    let api_routes = opsdesk::routes::configure(state)
        .layer(axum::middleware::from_fn(identity_middleware));

    Ok(Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn root() -> &'static str {
    "Opsdesk Server"
}

async fn health_check(State(state): State<DashboardState>) -> Json<serde_json::Value> {
    let store = state.files.store().read().await;
    Json(serde_json::json!({
        "status": "healthy",
        "folders": store.folders().len(),
        "files": store.files().len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use opsdesk::DashboardConfig;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            default_user: "anonymous".into(),
            cors_allowed_origins: Some("https://ops.example".into()),
            log_json: false,
            dashboard: DashboardConfig {
                seed_demo_data: false,
                ..DashboardConfig::default()
            },
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let config = test_config();
        let state = DashboardState::new(config.dashboard.clone(), "anonymous");
        let app = build_router(state, &config).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["files"], 0);
    }

    #[tokio::test]
    async fn test_header_identity_reaches_handlers() {
        let config = test_config();
        let state = DashboardState::new(config.dashboard.clone(), "anonymous");
        let app = build_router(state, &config).unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/api/folders")
            .header("content-type", "application/json")
            .header(identity::USER_HEADER, "carol")
            .body(Body::from(r#"{"name":"Audits"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["owner"], "carol");
    }

    #[test]
    fn test_bad_cors_origin_is_reported() {
        let mut config = test_config();
        config.cors_allowed_origins = Some("bad\norigin".into());
        let state = DashboardState::new(config.dashboard.clone(), "anonymous");
        assert!(build_router(state, &config).is_err());
    }
}
