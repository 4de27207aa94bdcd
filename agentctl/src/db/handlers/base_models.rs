//! Database repository for base models and the reports keyed by them.

use crate::db::{
    errors::Result,
    models::base_models::{CustomizationCount, LlmDomainMatch},
};
use sqlx::PgConnection;
use tracing::instrument;

/// Maximum number of rows returned by [`BaseModels::search_by_llm_domain`].
pub const KEYWORD_SEARCH_LIMIT: i64 = 5;

pub struct BaseModels<'c> {
    db: &'c mut PgConnection,
}

impl<'c> BaseModels<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Removes the model along with its customizations, service links and, through the
    /// customizations, the configurations recorded against them. A missing id is not an error.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, bmid: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM BaseModel WHERE bmid = $1")
            .bind(bmid)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Customization count for each requested base model, ordered by id.
    ///
    /// Models without customizations report zero; ids with no base model are left out.
    #[instrument(skip(self, bmids), fields(count = bmids.len()), err)]
    pub async fn count_customizations(&mut self, bmids: &[i32]) -> Result<Vec<CustomizationCount>> {
        if bmids.is_empty() {
            return Ok(Vec::new());
        }

        let counts = sqlx::query_as::<_, CustomizationCount>(
            r#"
            SELECT bm.bmid, bm.description, COUNT(cm.mid) AS customized_model_count
            FROM BaseModel bm
            LEFT JOIN CustomizedModel cm ON bm.bmid = cm.bmid
            WHERE bm.bmid = ANY($1)
            GROUP BY bm.bmid, bm.description
            ORDER BY bm.bmid ASC
            "#,
        )
        .bind(bmids)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(counts)
    }

    /// Base models backed by an LLM service whose domain contains `keyword`, at most
    /// [`KEYWORD_SEARCH_LIMIT`] distinct rows ordered by base model then service id.
    #[instrument(skip(self), err)]
    pub async fn search_by_llm_domain(&mut self, keyword: &str) -> Result<Vec<LlmDomainMatch>> {
        let matches = sqlx::query_as::<_, LlmDomainMatch>(
            r#"
            SELECT DISTINCT bm.bmid, i.sid, i.provider, l.domain
            FROM BaseModel bm
            JOIN ModelServices ms ON bm.bmid = ms.bmid
            JOIN InternetService i ON ms.sid = i.sid
            JOIN LLMService l ON i.sid = l.sid
            WHERE l.domain LIKE $1
            ORDER BY bm.bmid ASC, i.sid ASC
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(keyword))
        .bind(KEYWORD_SEARCH_LIMIT)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(matches)
    }
}

/// LIKE pattern matching `keyword` as a literal substring.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
