mod mutation;
mod nodes;
mod query;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema};
use platform_api::ApiError;
use platform_db::DbPool;
use products_hr::{HrError, drafting::Drafter};

pub use mutation::HrMutation;
pub use query::HrQuery;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Shared handles injected into every resolver.
#[derive(Clone)]
pub struct GraphqlData {
    pub pool: DbPool,
    pub drafter: Arc<Drafter>,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data.pool)
        .data(data.drafter)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn hr(&self) -> HrQuery {
        HrQuery
    }

    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn hr(&self) -> HrMutation {
        HrMutation
    }
}

pub(crate) fn database(ctx: &Context<'_>) -> async_graphql::Result<DbPool> {
    ctx.data::<DbPool>().cloned()
}

pub(crate) fn drafter<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<Drafter>> {
    ctx.data::<Arc<Drafter>>()
}

/// Map a domain error onto a coded GraphQL error.
pub(crate) fn api(err: HrError) -> async_graphql::Error {
    ApiError::from(err).extend()
}
