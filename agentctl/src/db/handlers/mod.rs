//! Repository implementations for database access.
//!
//! This module provides repository structs for each entity the commands touch. Repositories
//! follow a consistent pattern; the ones that register new entities implement the [`Repository`]
//! trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a borrowed SQLx connection (`&mut PgConnection`, which a transaction derefs to)
//! - Provides strongly-typed operations with bound parameters
//! - Returns models from [`crate::db::models`]
//! - Opens its own transaction when one operation spans several tables
//!
//! # Available Repositories
//!
//! - [`AgentClients`]: client registration (`Users` + `AgentClient`)
//! - [`BaseModels`]: cascading deletion, customization counts, LLM domain search
//! - [`CustomizedModels`]: customizations of a base model
//! - [`InternetServices`]: per-model service listing with the LLM / storage specialization
//! - [`Configurations`]: client configurations ranked by usage duration
//!
//! # Common Pattern
//!
//! ```ignore
//! use agentctl::db::handlers::{CustomizedModels, Repository};
//! use agentctl::db::models::customized_models::CustomizedModelId;
//!
//! async fn example(conn: &mut sqlx::PgConnection) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut repo = CustomizedModels::new(conn);
//!     let created = repo.create(&CustomizedModelId { bmid: 1, mid: 900 }).await?;
//!     println!("created: {created:?}");
//!     Ok(())
//! }
//! ```

pub mod agent_clients;
pub mod base_models;
pub mod configurations;
pub mod customized_models;
pub mod internet_services;
pub mod repository;

pub use agent_clients::AgentClients;
pub use base_models::BaseModels;
pub use configurations::Configurations;
pub use customized_models::CustomizedModels;
pub use internet_services::InternetServices;
pub use repository::Repository;
