//! Database models for internet services.
//!
//! `LLMService` and `DataStorage` rows specialize an `InternetService` row through a shared
//! primary key. In memory that is a single record with a [`ServiceKind`] tag; the tables stay
//! separate in the database.

use std::fmt;

/// What kind of internet service a record is, with the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// Plain service with no specialization row
    Generic,
    /// `LLMService` row: the domain the model provider serves
    Llm { domain: Option<String> },
    /// `DataStorage` row: the storage type offered
    DataStorage { storage_type: Option<String> },
}

impl ServiceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKind::Generic => "generic",
            ServiceKind::Llm { .. } => "llm",
            ServiceKind::DataStorage { .. } => "data_storage",
        }
    }
}

/// Database response for a service together with its specialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetServiceDBResponse {
    pub sid: i32,
    pub provider: String,
    pub endpoints: String,
    pub kind: ServiceKind,
}

/// The listing line: `sid,endpoints,provider`. The kind is not printed.
impl fmt::Display for InternetServiceDBResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.sid, self.endpoints, self.provider)
    }
}
