use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::links::{course_links, Link};
use crate::models::course::Course;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, max = 10000))]
    pub hours: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub hours: i32,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseSort {
    #[default]
    Id,
    Name,
    Hours,
}

impl CourseSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("name" | "nome") => Self::Name,
            Some("hours" | "horas") => Self::Hours,
            _ => Self::Id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationQuery {
    #[serde(alias = "topn")]
    pub top_n: Option<i64>,
}

impl From<Course> for CourseResponse {
    fn from(value: Course) -> Self {
        Self {
            links: course_links(value.id),
            id: value.id,
            name: value.name,
            description: value.description,
            hours: value.hours,
        }
    }
}
