//! Database repository for agent clients.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::agent_clients::{AgentClientCreateDBRequest, AgentClientDBResponse},
};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

pub struct AgentClients<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for AgentClients<'c> {
    type CreateRequest = AgentClientCreateDBRequest;
    type Response = AgentClientDBResponse;

    /// Register the user identity and the client profile as one unit.
    #[instrument(skip(self, request), fields(uid = request.uid), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // Two tables, so regardless of the connection passed in we need a transaction
        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO Users (uid, username, email) VALUES ($1, $2, $3)")
            .bind(request.uid)
            .bind(&request.username)
            .bind(&request.email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO AgentClient (uid, interests, cardholder, expire, cardno, cvv, zip)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.uid)
        .bind(&request.interests)
        .bind(&request.card_holder)
        .bind(request.expiration_date)
        .bind(request.card_number)
        .bind(request.cvv)
        .bind(request.zip)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(AgentClientDBResponse {
            uid: request.uid,
            username: request.username.clone(),
            email: request.email.clone(),
            interests: request.interests.clone(),
            cardholder: request.card_holder.clone(),
            expire: request.expiration_date,
            cardno: request.card_number,
            cvv: request.cvv,
            zip: request.zip,
        })
    }
}

impl<'c> AgentClients<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
