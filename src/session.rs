use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Session id carried by the current GraphQL request.
#[derive(Clone, Debug)]
pub struct RequestSession(pub String);

impl RequestSession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The user bound to a session after a successful login.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

/// Simple in-memory session manager keyed by the `session` cookie.
///
/// Anonymous sessions map to `None`; `login` upgrades them. Sessions live
/// for the lifetime of the process, like everything else in the labs.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Option<SessionUser>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Ensure an entry exists for the given session id.
    pub async fn touch(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_id.to_string()).or_insert(None);
    }

    pub async fn login(&self, session_id: &str, user: SessionUser) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), Some(user));
    }

    pub async fn user(&self, session_id: &str) -> Option<SessionUser> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned().flatten()
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Extract the lab session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Cookie line for `Set-Cookie`. The labs run over plain HTTP, so no
/// `Secure` attribute.
pub fn session_cookie(session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; lang=en"),
        );
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_missing_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let sessions = SessionManager::new();
        let id = new_session_id();

        sessions.touch(&id).await;
        assert!(sessions.user(&id).await.is_none());

        sessions
            .login(
                &id,
                SessionUser {
                    id: "1".to_string(),
                    username: "administrator".to_string(),
                    is_admin: true,
                },
            )
            .await;

        let user = sessions.user(&id).await.unwrap();
        assert_eq!(user.username, "administrator");
        assert!(user.is_admin);
        assert!(sessions.user("other-session").await.is_none());
    }
}
