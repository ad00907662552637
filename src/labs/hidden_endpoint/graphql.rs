use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, InputObject, Object, Result, Schema, SimpleObject, ID,
};

use super::store::{self, OrgStore};

#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: ID,
    pub username: String,
}

impl From<store::OrgUser> for User {
    fn from(user: store::OrgUser) -> Self {
        Self {
            id: ID::from(user.id),
            username: user.username,
        }
    }
}

#[derive(InputObject)]
pub struct DeleteUserInput {
    pub id: ID,
}

#[derive(SimpleObject)]
pub struct DeleteUserPayload {
    pub user: Option<User>,
}

pub struct Query;

#[Object]
impl Query {
    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let store = ctx.data::<Arc<OrgStore>>()?;
        Ok(store.by_id(id.as_str()).await.map(User::from))
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    /// Deleting carlos (id 3) is the lab objective. Any other id is a
    /// silent no-op with a null payload.
    async fn delete_organization_user(
        &self,
        ctx: &Context<'_>,
        input: DeleteUserInput,
    ) -> Result<DeleteUserPayload> {
        let store = ctx.data::<Arc<OrgStore>>()?;

        if input.id.as_str() == "3" {
            let user = store.delete("3").await;
            store.mark_solved();
            Ok(DeleteUserPayload {
                user: user.map(User::from),
            })
        } else {
            Ok(DeleteUserPayload { user: None })
        }
    }
}

pub type HiddenSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(store: Arc<OrgStore>) -> HiddenSchema {
    // Introspection is also disabled at the executor level
    Schema::build(Query, Mutation, EmptySubscription)
        .disable_introspection()
        .data(store)
        .finish()
}
