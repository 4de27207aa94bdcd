//! Database repository for internet services and their specializations.

use crate::db::{
    errors::Result,
    models::internet_services::{InternetServiceDBResponse, ServiceKind},
};
use sqlx::{FromRow, PgConnection};
use tracing::{debug, instrument, warn};

// Database entity model: a service row outer-joined with both specialization tables
#[derive(Debug, Clone, FromRow)]
struct InternetService {
    pub sid: i32,
    pub provider: String,
    pub endpoints: String,
    pub is_llm: bool,
    pub domain: Option<String>,
    pub is_storage: bool,
    pub storage_type: Option<String>,
}

impl From<InternetService> for InternetServiceDBResponse {
    fn from(service: InternetService) -> Self {
        if service.is_llm && service.is_storage {
            // The schema allows it; the LLM role is the one the reports care about
            warn!(sid = service.sid, "service has both LLMService and DataStorage rows");
        }

        let kind = if service.is_llm {
            ServiceKind::Llm { domain: service.domain }
        } else if service.is_storage {
            ServiceKind::DataStorage {
                storage_type: service.storage_type,
            }
        } else {
            ServiceKind::Generic
        };

        Self {
            sid: service.sid,
            provider: service.provider,
            endpoints: service.endpoints,
            kind,
        }
    }
}

pub struct InternetServices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> InternetServices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Services a base model depends on, ordered by provider name (then id).
    #[instrument(skip(self), err)]
    pub async fn list_for_base_model(&mut self, bmid: i32) -> Result<Vec<InternetServiceDBResponse>> {
        let rows = sqlx::query_as::<_, InternetService>(
            r#"
            SELECT i.sid, i.provider, i.endpoints,
                   l.sid IS NOT NULL AS is_llm, l.domain,
                   d.sid IS NOT NULL AS is_storage, d.type AS storage_type
            FROM InternetService i
            JOIN ModelServices ms ON i.sid = ms.sid
            LEFT JOIN LLMService l ON l.sid = i.sid
            LEFT JOIN DataStorage d ON d.sid = i.sid
            WHERE ms.bmid = $1
            ORDER BY i.provider ASC, i.sid ASC
            "#,
        )
        .bind(bmid)
        .fetch_all(&mut *self.db)
        .await?;

        let services: Vec<InternetServiceDBResponse> = rows.into_iter().map(Into::into).collect();
        for service in &services {
            debug!(sid = service.sid, kind = service.kind.label(), "linked service");
        }

        Ok(services)
    }
}
