//! Database repository for client configurations.

use crate::db::{errors::Result, models::configurations::ConfigurationDuration};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Configurations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Configurations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The client's `limit` longest recorded usages, longest first.
    ///
    /// Equal durations are ordered by configuration id, then by the customization the usage was
    /// recorded against, so the cut-off at `limit` is deterministic.
    #[instrument(skip(self), err)]
    pub async fn top_by_duration(&mut self, client_uid: i32, limit: i64) -> Result<Vec<ConfigurationDuration>> {
        let rows = sqlx::query_as::<_, ConfigurationDuration>(
            r#"
            SELECT c.client_uid, c.cid, c.labels, c.content, mc.duration
            FROM Configuration c
            JOIN ModelConfigurations mc ON c.cid = mc.cid
            WHERE c.client_uid = $1
            ORDER BY mc.duration DESC, c.cid ASC, mc.bmid ASC, mc.mid ASC
            LIMIT $2
            "#,
        )
        .bind(client_uid)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}
