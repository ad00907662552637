use anyhow::{anyhow, Result};
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use include_dir::{include_dir, Dir};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::labs::{hidden_endpoint, private_fields, private_posts};

static ASSET_DIR: Dir = include_dir!("assets");

/// Routes shared by every lab: health check and the embedded stylesheet.
pub fn base_routes<S>(service: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(move || health_check(service)))
        .route("/styles.css", get(stylesheet))
}

async fn health_check(service: &'static str) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": service,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn stylesheet() -> impl IntoResponse {
    let css = ASSET_DIR
        .files()
        .iter()
        .find(|file| file.path().to_str() == Some("styles.css"))
        .and_then(|file| std::str::from_utf8(file.contents()).ok());

    match css {
        Some(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn cors_layer(cors_origin: Option<&str>) -> Result<CorsLayer> {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
    };

    Ok(cors)
}

pub async fn serve(app: Router, service: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("{} lab running on http://localhost:{}", service, port);

    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn run_all(base_port: u16, cors_origin: Option<&str>) -> Result<()> {
    let posts = private_posts::app(cors_origin)?;
    let fields = private_fields::app(cors_origin)?;
    let hidden = hidden_endpoint::app(cors_origin)?;

    tokio::try_join!(
        serve(posts, private_posts::SERVICE, base_port),
        serve(fields, private_fields::SERVICE, base_port + 1),
        serve(hidden, hidden_endpoint::SERVICE, base_port + 2),
    )?;

    Ok(())
}
