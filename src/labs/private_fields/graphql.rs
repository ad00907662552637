use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject, ID};

use crate::session::{RequestSession, SessionManager, SessionUser};

use super::store::{self, UserStore};

/// The whole point of this lab: `password` and `isAdmin` are part of the
/// public schema.
#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

impl From<store::User> for User {
    fn from(user: store::User) -> Self {
        Self {
            id: ID::from(user.id),
            username: user.username,
            password: user.password,
            is_admin: user.is_admin,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Product {
    pub id: ID,
    pub name: String,
    pub listed: bool,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub fn product_catalog() -> Vec<Product> {
    vec![
        Product {
            id: ID::from("1"),
            name: "Web Security Book".to_string(),
            listed: true,
            price: Some(49.99),
            description: Some("Comprehensive guide to web application security".to_string()),
            image: Some("https://images.unsplash.com/photo-1548048026-5a1a941d93d3?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=800&q=80".to_string()),
        },
        Product {
            id: ID::from("2"),
            name: "Burp Suite Pro".to_string(),
            listed: true,
            price: Some(399.00),
            description: Some("Professional web security testing toolkit".to_string()),
            image: Some("https://images.unsplash.com/photo-1551650975-87deedd944c3?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=800&q=80".to_string()),
        },
        Product {
            id: ID::from("4"),
            name: "Hacking Lab License".to_string(),
            listed: true,
            price: Some(199.00),
            description: Some("Access to premium security training labs".to_string()),
            image: Some("https://images.unsplash.com/photo-1561070791-2526d30994b5?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=800&q=80".to_string()),
        },
    ]
}

pub struct Query;

#[Object]
impl Query {
    /// Any user by id, every field included
    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let store = ctx.data::<Arc<UserStore>>()?;
        Ok(store.by_id(id.as_str()).await.map(User::from))
    }

    async fn products(&self, _ctx: &Context<'_>) -> Vec<Product> {
        product_catalog()
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    /// Credential check by string equality. Binds the caller's session on
    /// success; admins get a redirect marker instead of a greeting.
    async fn login(&self, ctx: &Context<'_>, username: String, password: String) -> Result<String> {
        let store = ctx.data::<Arc<UserStore>>()?;
        let sessions = ctx.data::<Arc<SessionManager>>()?;
        let session = ctx.data::<RequestSession>()?;

        match store.by_credentials(&username, &password).await {
            Some(user) => {
                let is_admin = user.is_admin;
                sessions
                    .login(
                        session.as_str(),
                        SessionUser {
                            id: user.id,
                            username: user.username,
                            is_admin,
                        },
                    )
                    .await;

                if is_admin {
                    Ok("ADMIN_REDIRECT".to_string())
                } else {
                    Ok("Login successful!".to_string())
                }
            }
            None => Ok("Invalid credentials".to_string()),
        }
    }
}

pub type FieldsSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(store: Arc<UserStore>, sessions: Arc<SessionManager>) -> FieldsSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(store)
        .data(sessions)
        .finish()
}
