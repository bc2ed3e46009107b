use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting joined with the legal name of the company that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub salary: Decimal,
    pub published_at: DateTime<Utc>,
    pub company_id: i64,
    pub company_name: Option<String>,
}
