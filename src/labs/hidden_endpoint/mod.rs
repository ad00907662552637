pub mod graphql;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tracing::{info, warn};

use crate::errors::LabError;
use crate::introspection::{
    decode_query, is_blocked_introspection, production_mode, BYPASS_KEYWORD,
};
use crate::pages::Pages;
use crate::server;

use graphql::HiddenSchema;
use store::OrgStore;

pub const SERVICE: &str = "hidden-endpoint";

const LAB_TITLE: &str = "Finding a hidden GraphQL endpoint";

#[derive(Clone)]
pub struct AppState {
    pub schema: HiddenSchema,
    pub store: Arc<OrgStore>,
    pub pages: Arc<Pages>,
}

pub fn app(cors_origin: Option<&str>) -> Result<Router> {
    let store = Arc::new(OrgStore::seeded());
    let schema = graphql::build_schema(store.clone());
    let pages = Arc::new(Pages::new()?);

    let state = AppState {
        schema,
        store,
        pages,
    };

    let app = Router::new()
        .route("/", get(status_page))
        .route("/api", get(api_get).post(api_post))
        .merge(server::base_routes(SERVICE))
        .layer(ServiceBuilder::new().layer(server::cors_layer(cors_origin)?))
        .with_state(state);

    log_routes();

    Ok(app)
}

fn log_routes() {
    info!("{} endpoints:", SERVICE);
    info!("  /                           - Service status page");
    info!("  /health                     - Health check");
    // /api is the hidden endpoint; finding it is the exercise
}

#[derive(Deserialize)]
struct ApiParams {
    query: Option<String>,
}

/// GET side of the hidden endpoint. Decodes the query, applies the guard,
/// and executes. Mutations over GET run like anything else here.
async fn api_get(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Result<Json<async_graphql::Response>, LabError> {
    let raw = params.query.unwrap_or_default();
    let mut query = decode_query(&raw).map_err(|_| LabError::InvalidQueryEncoding)?;

    if !production_mode() && query.contains(BYPASS_KEYWORD) {
        warn!("development bypass activated");
        query = query.replace(BYPASS_KEYWORD, "");
    } else if is_blocked_introspection(&query) {
        return Err(LabError::IntrospectionBlocked);
    }

    Ok(Json(
        state.schema.execute(async_graphql::Request::new(query)).await,
    ))
}

/// POST side. The guard runs against the raw query text; there is no
/// bypass keyword on this path.
async fn api_post(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Result<Json<async_graphql::Response>, LabError> {
    if is_blocked_introspection(&request.query) {
        return Err(LabError::IntrospectionBlocked);
    }

    Ok(Json(state.schema.execute(request).await))
}

async fn status_page(State(state): State<AppState>) -> Response {
    state.pages.render_response(
        "hidden_status",
        &json!({
            "title": "GraphQL API Service",
            "user_count": state.store.count().await,
            "solved": state.store.solved(),
            "lab": LAB_TITLE,
            "detail": "You've found the hidden GraphQL endpoint and deleted carlos.",
        }),
    )
}
