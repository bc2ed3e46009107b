use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::links::{certificate_links, Link};
use crate::models::certificate::Certificate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificatePayload {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(range(min = 1))]
    pub course_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificatePayload {
    #[validate(length(max = 500))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub description: String,
    pub validation_code: String,
    pub user_id: i64,
    pub course_id: i64,
    pub user_name: Option<String>,
    pub course_name: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub user_id: Option<i64>,
    pub course_id: Option<i64>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateSort {
    #[default]
    Issued,
    Id,
}

impl CertificateSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("id") => Self::Id,
            _ => Self::Issued,
        }
    }
}

impl From<Certificate> for CertificateResponse {
    fn from(value: Certificate) -> Self {
        Self {
            links: certificate_links(&value.id, value.user_id, value.course_id),
            id: value.id,
            issued_at: value.issued_at,
            description: value.description,
            validation_code: value.validation_code,
            user_id: value.user_id,
            course_id: value.course_id,
            user_name: value.user_name,
            course_name: value.course_name,
        }
    }
}
