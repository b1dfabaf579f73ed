use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::routes::LOGIN_PATH;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

/// Where to continue after logging in, as appended to login redirects.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NextQuery {
    pub(crate) next: Option<String>,
}

impl NextQuery {
    /// Only same-site paths are echoed back; anything else is dropped.
    pub(crate) fn local_target(self) -> Option<String> {
        self.next
            .filter(|next| next.starts_with('/') && !next.starts_with("//") && !next.contains('\\'))
    }
}

/// Empty login form; submitting it to `action` returns an access token.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LoginFormDto {
    pub(crate) action: &'static str,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) next: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/registration/",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "User already exists", body = ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    let Json(dto) = body?;
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
            next: None,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/login/",
    tag = "auth",
    params(
        ("next" = Option<String>, Query, description = "Path to return to after login")
    ),
    responses(
        (status = 200, description = "Login form", body = LoginFormDto)
    )
)]
pub(crate) async fn login_form(Query(query): Query<NextQuery>) -> Json<LoginFormDto> {
    Json(LoginFormDto {
        action: LOGIN_PATH,
        username: String::new(),
        password: String::new(),
        next: query.local_target(),
    })
}

#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "auth",
    params(
        ("next" = Option<String>, Query, description = "Path to return to after login")
    ),
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    body: Result<Json<LoginDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    let Json(dto) = body?;
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
            next: query.local_target(),
        }),
    ))
}
