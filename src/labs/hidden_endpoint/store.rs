use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct OrgUser {
    pub id: String,
    pub username: String,
}

/// Organization directory plus the solved flag the status page reads.
#[derive(Debug)]
pub struct OrgStore {
    users: RwLock<Vec<OrgUser>>,
    solved: AtomicBool,
}

impl OrgStore {
    pub fn seeded() -> Self {
        let users = vec![
            OrgUser {
                id: "1".to_string(),
                username: "admin".to_string(),
            },
            OrgUser {
                id: "2".to_string(),
                username: "wiener".to_string(),
            },
            OrgUser {
                id: "3".to_string(),
                username: "carlos".to_string(),
            },
        ];

        Self {
            users: RwLock::new(users),
            solved: AtomicBool::new(false),
        }
    }

    pub async fn by_id(&self, id: &str) -> Option<OrgUser> {
        let users = self.users.read().await;
        users.iter().find(|user| user.id == id).cloned()
    }

    /// Remove a user by id, returning the removed record.
    pub async fn delete(&self, id: &str) -> Option<OrgUser> {
        let mut users = self.users.write().await;
        let index = users.iter().position(|user| user.id == id)?;
        Some(users.remove(index))
    }

    pub async fn count(&self) -> usize {
        let users = self.users.read().await;
        users.len()
    }

    pub fn mark_solved(&self) {
        self.solved.store(true, Ordering::SeqCst);
    }

    pub fn solved(&self) -> bool {
        self.solved.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_directory() {
        let store = OrgStore::seeded();
        assert_eq!(store.count().await, 3);
        assert_eq!(store.by_id("3").await.unwrap().username, "carlos");
        assert!(!store.solved());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_user() {
        let store = OrgStore::seeded();
        let removed = store.delete("3").await.unwrap();
        assert_eq!(removed.username, "carlos");
        assert_eq!(store.count().await, 2);
        assert!(store.delete("3").await.is_none());
    }

    #[test]
    fn test_solved_flag_latches() {
        let store = OrgStore::seeded();
        store.mark_solved();
        store.mark_solved();
        assert!(store.solved());
    }
}
