pub mod graphql;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

use crate::pages::Pages;
use crate::server;

use graphql::PostsSchema;
use store::{PostStore, POST_PASSWORD};

pub const SERVICE: &str = "private-posts";

#[derive(Clone)]
pub struct AppState {
    pub schema: PostsSchema,
    pub pages: Arc<Pages>,
}

pub fn app(cors_origin: Option<&str>) -> Result<Router> {
    let store = Arc::new(PostStore::seeded());
    let schema = graphql::build_schema(store);
    let pages = Arc::new(Pages::new()?);

    let state = AppState { schema, pages };

    let app = Router::new()
        .route("/", get(home))
        .route("/graphql/v1", post(graphql_handler))
        .route("/api/verify-password", post(verify_password))
        .merge(server::base_routes(SERVICE))
        .layer(ServiceBuilder::new().layer(server::cors_layer(cors_origin)?))
        .with_state(state);

    log_routes();

    Ok(app)
}

fn log_routes() {
    info!("{} endpoints:", SERVICE);
    info!("  /                           - Lab narrative");
    info!("  /graphql/v1                 - GraphQL API (introspection enabled)");
    info!("  /api/verify-password        - Password verification");
    info!("  /health                     - Health check");
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    GraphQLResponse(state.schema.execute(req.into_inner()).await.into())
}

async fn home(State(state): State<AppState>) -> Response {
    state.pages.render_response(
        "posts_home",
        &json!({
            "title": "GraphQL Security Lab",
            "lab": "Accessing private GraphQL posts"
        }),
    )
}

#[derive(Deserialize)]
struct VerifyPassword {
    password: String,
}

async fn verify_password(Json(body): Json<VerifyPassword>) -> Json<Value> {
    if body.password == POST_PASSWORD {
        Json(json!({
            "success": true,
            "message": "Congratulations! You have successfully solved the lab!"
        }))
    } else {
        Json(json!({
            "success": false,
            "message": "Incorrect password. Try again!"
        }))
    }
}
