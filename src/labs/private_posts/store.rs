use tokio::sync::RwLock;

/// The password hidden inside the unpublished post. Recovering it through
/// the id lookup is the point of the exercise.
pub const POST_PASSWORD: &str = "graphql_h4ck3r_2024";

#[derive(Debug, Clone)]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: bool,
    pub post_password: Option<String>,
}

/// In-memory blog post list. Seeded at startup, mutated in place, gone on
/// restart.
#[derive(Debug)]
pub struct PostStore {
    posts: RwLock<Vec<BlogPost>>,
}

impl PostStore {
    pub fn seeded() -> Self {
        let posts = vec![
            BlogPost {
                id: 1,
                title: "Getting Started with GraphQL".to_string(),
                content: "GraphQL is a powerful query language for APIs that provides a complete and understandable description of the data in your API.".to_string(),
                author: "John Doe".to_string(),
                published: true,
                post_password: None,
            },
            BlogPost {
                id: 2,
                title: "Advanced GraphQL Techniques".to_string(),
                content: "Learn about advanced GraphQL concepts including subscriptions, fragments, and schema stitching.".to_string(),
                author: "Jane Smith".to_string(),
                published: true,
                post_password: None,
            },
            BlogPost {
                id: 3,
                title: "Secret GraphQL Post".to_string(),
                content: "This is a hidden blog post that contains sensitive information about our GraphQL implementation. Only authorized users should access this content.".to_string(),
                author: "Admin".to_string(),
                published: false,
                post_password: Some(POST_PASSWORD.to_string()),
            },
            BlogPost {
                id: 4,
                title: "GraphQL Best Practices".to_string(),
                content: "Discover the best practices for implementing secure and efficient GraphQL APIs in production environments.".to_string(),
                author: "Bob Johnson".to_string(),
                published: true,
                post_password: None,
            },
        ];

        Self {
            posts: RwLock::new(posts),
        }
    }

    pub async fn published(&self) -> Vec<BlogPost> {
        let posts = self.posts.read().await;
        posts.iter().filter(|post| post.published).cloned().collect()
    }

    /// Any post by id, published or not. No authorization check.
    pub async fn by_id(&self, id: i32) -> Option<BlogPost> {
        let posts = self.posts.read().await;
        posts.iter().find(|post| post.id == id).cloned()
    }

    pub async fn create(&self, title: String, content: String, author: String) -> BlogPost {
        let mut posts = self.posts.write().await;
        let post = BlogPost {
            id: posts.len() as i32 + 1,
            title,
            content,
            author,
            published: true,
            post_password: None,
        };
        posts.push(post.clone());
        post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_published_excludes_the_secret_post() {
        let store = PostStore::seeded();
        let published = store.published().await;
        assert_eq!(published.len(), 3);
        assert!(published.iter().all(|post| post.published));
        assert!(published.iter().all(|post| post.id != 3));
    }

    #[tokio::test]
    async fn test_by_id_ignores_published_flag() {
        let store = PostStore::seeded();
        let secret = store.by_id(3).await.unwrap();
        assert!(!secret.published);
        assert_eq!(secret.post_password.as_deref(), Some(POST_PASSWORD));
        assert!(store.by_id(99).await.is_none());
    }

    #[tokio::test]
    async fn test_create_appends_published_post() {
        let store = PostStore::seeded();
        let post = store
            .create(
                "New Post".to_string(),
                "Content".to_string(),
                "Author".to_string(),
            )
            .await;
        assert_eq!(post.id, 5);
        assert!(post.published);
        assert!(post.post_password.is_none());
        assert_eq!(store.published().await.len(), 4);
    }
}
