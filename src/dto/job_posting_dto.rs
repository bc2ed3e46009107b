use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::links::{job_posting_links, Link};
use crate::models::job_posting::JobPosting;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingPayload {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub salary: Decimal,
    #[validate(range(min = 1))]
    pub company_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub salary: Decimal,
    pub published_at: DateTime<Utc>,
    pub company_id: i64,
    pub company_name: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JobPostingListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(alias = "empresaId")]
    pub company_id: Option<i64>,
    #[serde(alias = "salarioMin")]
    pub min_salary: Option<Decimal>,
    pub search: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPostingSort {
    #[default]
    PublishedDate,
    Title,
    Salary,
}

impl JobPostingSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("name" | "title" | "nome") => Self::Title,
            Some("salary" | "salario") => Self::Salary,
            _ => Self::PublishedDate,
        }
    }
}

impl From<JobPosting> for JobPostingResponse {
    fn from(value: JobPosting) -> Self {
        Self {
            links: job_posting_links(value.id, value.company_id),
            id: value.id,
            title: value.title,
            description: value.description,
            salary: value.salary,
            published_at: value.published_at,
            company_id: value.company_id,
            company_name: value.company_name,
        }
    }
}
