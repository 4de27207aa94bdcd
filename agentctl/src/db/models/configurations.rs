//! Database models for client configurations.

use std::fmt;

/// A client configuration paired with one recorded usage duration
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ConfigurationDuration {
    pub client_uid: i32,
    pub cid: i32,
    pub labels: String,
    pub content: String,
    pub duration: i32,
}

impl fmt::Display for ConfigurationDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.client_uid, self.cid, self.labels, self.content, self.duration
        )
    }
}
