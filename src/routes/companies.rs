use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        company_dto::{CompanyListQuery, CompanyPayload, CompanyResponse},
        page_dto::PagedResponse,
    },
    error::Result,
    AppState,
};

pub type CompanyPage = PagedResponse<CompanyResponse>;

#[utoipa::path(
    get,
    path = "/api/v1/companies",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, at most 100"),
        ("search" = Option<String>, Query, description = "Match on legal name or email"),
        ("orderBy" = Option<String>, Query, description = "id or name")
    ),
    responses(
        (status = 200, description = "Companies retrieved", body = Json<CompanyPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.company_service.list(query).await?;
    Ok(Json(CompanyPage::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/companies",
    request_body = CompanyPayload,
    responses(
        (status = 201, description = "Company created", body = Json<CompanyResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Registration number already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found", body = Json<CompanyResponse>),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let company = state.company_service.get_by_id(id).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    put,
    path = "/api/v1/companies/{id}",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    request_body = CompanyPayload,
    responses(
        (status = 200, description = "Company updated", body = Json<CompanyResponse>),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Registration number already registered")
    )
)]
#[axum::debug_handler]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.update(id, payload).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/companies/{id}",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Company still has job postings")
    )
)]
#[axum::debug_handler]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.company_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
