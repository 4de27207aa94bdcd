//! Base repository trait for database operations.

/// Contains the Repository trait.
///
/// A repository is a data access layer for one entity of the agent platform schema. Entities are
/// keyed by the ids carried in the source data, so unlike generated-key stores the caller always
/// supplies the identifier in the create request.
use crate::db::errors::Result;

/// Base repository trait for entities the CLI registers
///
/// This trait has separate associated types for create requests and responses.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// Create a new entity, failing on any constraint violation with nothing committed
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;
}
