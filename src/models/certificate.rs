use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Proof that a user completed a course. Display names come from joins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub description: String,
    pub validation_code: String,
    pub user_id: i64,
    pub course_id: i64,
    pub user_name: Option<String>,
    pub course_name: Option<String>,
}
