pub mod graphql;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

use crate::pages::Pages;
use crate::server;
use crate::session::{
    new_session_id, session_cookie, session_id_from_headers, RequestSession, SessionManager,
    SessionUser,
};

use graphql::FieldsSchema;
use store::UserStore;

pub const SERVICE: &str = "private-fields";

const LAB_TITLE: &str = "Accidental exposure of private GraphQL fields";

#[derive(Clone)]
pub struct AppState {
    pub schema: FieldsSchema,
    pub sessions: Arc<SessionManager>,
    pub store: Arc<UserStore>,
    pub pages: Arc<Pages>,
}

pub fn app(cors_origin: Option<&str>) -> Result<Router> {
    let store = Arc::new(UserStore::seeded());
    let sessions = Arc::new(SessionManager::new());
    let schema = graphql::build_schema(store.clone(), sessions.clone());
    let pages = Arc::new(Pages::new()?);

    let state = AppState {
        schema,
        sessions,
        store,
        pages,
    };

    let app = Router::new()
        .route("/", get(home))
        .route("/products", get(products))
        .route("/my-account", get(my_account))
        .route("/admin", get(admin))
        .route("/admin/delete", post(admin_delete))
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .merge(server::base_routes(SERVICE))
        .layer(ServiceBuilder::new().layer(server::cors_layer(cors_origin)?))
        .with_state(state);

    log_routes();

    Ok(app)
}

fn log_routes() {
    info!("{} endpoints:", SERVICE);
    info!("  /                           - Lab home");
    info!("  /products                   - Product listing");
    info!("  /my-account                 - Login page");
    info!("  /admin                      - Admin panel (admins only)");
    info!("  /graphql                    - GraphQL API & Playground");
    info!("  /health                     - Health check");
}

/// GraphQL entry point. Mints a session cookie on first contact so the
/// login mutation has a session to bind to.
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> Response {
    let (session_id, minted) = match session_id_from_headers(&headers) {
        Some(id) => (id, false),
        None => (new_session_id(), true),
    };
    state.sessions.touch(&session_id).await;

    let request = req.into_inner().data(RequestSession(session_id.clone()));
    let response = GraphQLResponse(state.schema.execute(request).await.into());

    let mut response = response.into_response();
    if minted {
        if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&session_id)) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<SessionUser, Response> {
    if let Some(session_id) = session_id_from_headers(headers) {
        if let Some(user) = state.sessions.user(&session_id).await {
            if user.is_admin {
                return Ok(user);
            }
        }
    }

    Err((
        StatusCode::FORBIDDEN,
        Html(r#"<div class="container"><div class="alert error">Access denied. Admins only.</div></div>"#),
    )
        .into_response())
}

async fn home(State(state): State<AppState>) -> Response {
    state
        .pages
        .render_response("fields_home", &json!({ "title": "GraphQL Security Lab" }))
}

async fn products(State(state): State<AppState>) -> Response {
    let products: Vec<Value> = graphql::product_catalog()
        .into_iter()
        .map(|product| {
            json!({
                "name": product.name,
                "price": format!("{:.2}", product.price.unwrap_or(0.0)),
                "description": product.description,
                "image": product.image,
            })
        })
        .collect();

    state.pages.render_response(
        "fields_products",
        &json!({
            "title": "Products - GraphQL Security Lab",
            "products": products,
        }),
    )
}

async fn my_account(State(state): State<AppState>) -> Response {
    state.pages.render_response(
        "fields_account",
        &json!({ "title": "My Account - GraphQL Security Lab" }),
    )
}

async fn admin(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(denied) = require_admin(&state, &headers).await {
        return denied;
    }

    state.pages.render_response(
        "fields_admin",
        &json!({ "title": "Admin Panel - GraphQL Security Lab" }),
    )
}

#[derive(Deserialize)]
struct DeleteUserForm {
    #[allow(dead_code)]
    username: String,
}

async fn admin_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(_form): Form<DeleteUserForm>,
) -> Response {
    if let Err(denied) = require_admin(&state, &headers).await {
        return denied;
    }

    // The panel only ever offers carlos.
    if state.store.delete_by_username("carlos").await {
        state.pages.render_response(
            "fields_solved",
            &json!({
                "title": "Lab Solved",
                "lab": LAB_TITLE,
            }),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Html(r#"<div class="container"><div class="alert error">User not found</div></div>"#),
        )
            .into_response()
    }
}
