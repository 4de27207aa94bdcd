//! Database record models matching table schemas.
//!
//! This module contains struct definitions that correspond to rows of the agent platform tables
//! and to the shaped rows returned by the reporting queries. Repositories in
//! [`crate::db::handlers`] accept the `*CreateDBRequest` types and return the `*DBResponse` types.
//!
//! Query result rows implement [`std::fmt::Display`] as the comma-joined line printed by the CLI.
//!
//! # Model Categories
//!
//! - [`agent_clients`]: users registered as paying clients
//! - [`base_models`]: creator-published models, customization counts and keyword matches
//! - [`customized_models`]: per-creator customizations of a base model
//! - [`internet_services`]: external services and their LLM / storage specializations
//! - [`configurations`]: client configurations ranked by usage duration

pub mod agent_clients;
pub mod base_models;
pub mod configurations;
pub mod customized_models;
pub mod internet_services;
