//! Database models for agent clients.

use chrono::NaiveDate;

/// Database request for registering a client: one `Users` row plus its `AgentClient` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentClientCreateDBRequest {
    pub uid: i32,
    pub username: String,
    pub email: String,
    pub card_number: i64,
    pub card_holder: String,
    pub expiration_date: NaiveDate,
    pub cvv: i32,
    pub zip: i32,
    pub interests: String,
}

/// Database response for a client, joined with its user identity
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AgentClientDBResponse {
    pub uid: i32,
    pub username: String,
    pub email: String,
    pub interests: String,
    pub cardholder: String,
    pub expire: NaiveDate,
    pub cardno: i64,
    pub cvv: i32,
    pub zip: i32,
}
