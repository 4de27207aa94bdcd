//! Database models for customized models.

/// Composite key of a customization: the base model it derives from and its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomizedModelId {
    pub bmid: i32,
    pub mid: i32,
}

pub type CustomizedModelCreateDBRequest = CustomizedModelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomizedModelDBResponse {
    pub bmid: i32,
    pub mid: i32,
}
