//! Database repository for customized models.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::customized_models::{CustomizedModelCreateDBRequest, CustomizedModelDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct CustomizedModels<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for CustomizedModels<'c> {
    type CreateRequest = CustomizedModelCreateDBRequest;
    type Response = CustomizedModelDBResponse;

    /// Fails with a foreign key violation if the base model is missing, and with a unique
    /// violation if the (bmid, mid) pair already exists.
    #[instrument(skip(self), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let model = sqlx::query_as::<_, CustomizedModelDBResponse>(
            "INSERT INTO CustomizedModel (bmid, mid) VALUES ($1, $2) RETURNING bmid, mid",
        )
        .bind(request.bmid)
        .bind(request.mid)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(model)
    }
}

impl<'c> CustomizedModels<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

}
