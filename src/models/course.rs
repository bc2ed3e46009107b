use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub hours: i32,
}

/// A course together with how many certificates were issued for it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RankedCourse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub hours: i32,
    pub certificate_count: i64,
}

impl From<RankedCourse> for Course {
    fn from(value: RankedCourse) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            hours: value.hours,
        }
    }
}
