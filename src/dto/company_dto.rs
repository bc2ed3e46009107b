use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::links::{company_links, Link};
use crate::models::company::Company;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub legal_name: String,
    #[validate(length(min = 1, max = 18), custom(function = "not_blank"))]
    pub registration_number: String,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: i64,
    pub legal_name: String,
    pub registration_number: String,
    pub email: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanySort {
    #[default]
    Id,
    Name,
}

impl CompanySort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("name" | "nome") => Self::Name,
            _ => Self::Id,
        }
    }
}

impl From<Company> for CompanyResponse {
    fn from(value: Company) -> Self {
        Self {
            links: company_links(value.id),
            id: value.id,
            legal_name: value.legal_name,
            registration_number: value.registration_number,
            email: value.email,
        }
    }
}
