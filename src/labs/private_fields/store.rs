use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// In-memory user list. Passwords are deliberately plaintext; leaking them
/// through the GraphQL schema is the exercise.
#[derive(Debug)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn seeded() -> Self {
        let users = vec![
            User {
                id: "0".to_string(),
                username: "carlos".to_string(),
                password: "ilovecarlos".to_string(),
                is_admin: false,
            },
            User {
                id: "1".to_string(),
                username: "administrator".to_string(),
                password: "adminadmin".to_string(),
                is_admin: true,
            },
        ];

        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn by_id(&self, id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|user| user.id == id).cloned()
    }

    /// Plain string-equality credential check.
    pub async fn by_credentials(&self, username: &str, password: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .cloned()
    }

    /// Remove a user by name. Returns false when no such user exists.
    pub async fn delete_by_username(&self, username: &str) -> bool {
        let mut users = self.users.write().await;
        match users.iter().position(|user| user.username == username) {
            Some(index) => {
                users.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_users() {
        let store = UserStore::seeded();
        let admin = store.by_id("1").await.unwrap();
        assert_eq!(admin.username, "administrator");
        assert!(admin.is_admin);

        let carlos = store.by_id("0").await.unwrap();
        assert!(!carlos.is_admin);
    }

    #[tokio::test]
    async fn test_credential_check() {
        let store = UserStore::seeded();
        assert!(store.by_credentials("carlos", "ilovecarlos").await.is_some());
        assert!(store.by_credentials("carlos", "wrong").await.is_none());
        assert!(store.by_credentials("nobody", "ilovecarlos").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_username() {
        let store = UserStore::seeded();
        assert!(store.delete_by_username("carlos").await);
        assert!(!store.delete_by_username("carlos").await);
        assert!(store.by_id("0").await.is_none());
    }
}
