//! Database models for base models.

use std::fmt;

/// Number of customizations of one base model
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomizationCount {
    pub bmid: i32,
    pub description: String,
    pub customized_model_count: i64,
}

impl fmt::Display for CustomizationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.bmid, self.description, self.customized_model_count)
    }
}

/// A base model that relies on an LLM service whose domain matched a keyword
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LlmDomainMatch {
    pub bmid: i32,
    pub sid: i32,
    pub provider: String,
    pub domain: String,
}

impl fmt::Display for LlmDomainMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.bmid, self.sid, self.provider, self.domain)
    }
}
