use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        certificate_dto::{
            CertificateListQuery, CertificateResponse, CreateCertificatePayload,
            UpdateCertificatePayload,
        },
        page_dto::PagedResponse,
    },
    error::Result,
    AppState,
};

pub type CertificatePage = PagedResponse<CertificateResponse>;

#[utoipa::path(
    get,
    path = "/api/v1/certificates",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, at most 100"),
        ("userId" = Option<i64>, Query, description = "Only certificates of this user"),
        ("courseId" = Option<i64>, Query, description = "Only certificates for this course"),
        ("orderBy" = Option<String>, Query, description = "issued or id")
    ),
    responses(
        (status = 200, description = "Certificates retrieved", body = Json<CertificatePage>)
    )
)]
#[axum::debug_handler]
pub async fn list_certificates(
    State(state): State<AppState>,
    Query(query): Query<CertificateListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.certificate_service.list(query).await?;
    Ok(Json(CertificatePage::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/certificates",
    request_body = CreateCertificatePayload,
    responses(
        (status = 201, description = "Certificate issued", body = Json<CertificateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User or course not found")
    )
)]
#[axum::debug_handler]
pub async fn create_certificate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCertificatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let certificate = state.certificate_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CertificateResponse::from(certificate))))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    responses(
        (status = 200, description = "Certificate found", body = Json<CertificateResponse>),
        (status = 404, description = "Certificate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let certificate = state.certificate_service.get_by_id(&id).await?;
    Ok(Json(CertificateResponse::from(certificate)))
}

#[utoipa::path(
    put,
    path = "/api/v1/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    request_body = UpdateCertificatePayload,
    responses(
        (status = 200, description = "Certificate updated", body = Json<CertificateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Certificate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCertificatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let certificate = state.certificate_service.update(&id, payload).await?;
    Ok(Json(CertificateResponse::from(certificate)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/certificates/{id}",
    params(
        ("id" = String, Path, description = "Certificate ID")
    ),
    responses(
        (status = 204, description = "Certificate deleted"),
        (status = 404, description = "Certificate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.certificate_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
