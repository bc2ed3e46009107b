use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{AuthResponse, LoginPayload, RegisterPayload},
        user_dto::UserResponse,
    },
    error::{Error, Result},
    utils::crypto::verify_password,
    AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = Json<UserResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email or tax id already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued", body = Json<AuthResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let Some(user) = state.user_service.find_by_email(&payload.email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let issued = state.jwt.issue(&user)?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
