use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject};

use super::store::{self, PostStore};

#[derive(SimpleObject, Clone)]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: bool,
    pub post_password: Option<String>,
}

impl From<store::BlogPost> for BlogPost {
    fn from(post: store::BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author: post.author,
            published: post.published,
            post_password: post.post_password,
        }
    }
}

pub struct Query;

#[Object]
impl Query {
    /// Published blog posts only
    async fn blog_posts(&self, ctx: &Context<'_>) -> Result<Vec<BlogPost>> {
        let store = ctx.data::<Arc<PostStore>>()?;
        Ok(store
            .published()
            .await
            .into_iter()
            .map(BlogPost::from)
            .collect())
    }

    /// Any blog post by id, including unpublished ones. No authorization
    /// check on the caller-supplied id (IDOR).
    async fn blog_post(&self, ctx: &Context<'_>, id: i32) -> Result<Option<BlogPost>> {
        let store = ctx.data::<Arc<PostStore>>()?;
        Ok(store.by_id(id).await.map(BlogPost::from))
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    async fn create_blog_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        author: String,
    ) -> Result<BlogPost> {
        let store = ctx.data::<Arc<PostStore>>()?;
        Ok(store.create(title, content, author).await.into())
    }
}

pub type PostsSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(store: Arc<PostStore>) -> PostsSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(store)
        .finish()
}
