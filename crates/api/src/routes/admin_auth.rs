use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use hostelhub_db::models::{Admin, AdminRole};
use hostelhub_services::auth::PrincipalRole;
use hostelhub_services::dao::base::DaoError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{realtor_auth::LoginRequest, timestamp};
use crate::{
    error::ApiError,
    extractors::{
        auth::{AuthAdmin, SuperAdmin},
        json::ValidJson,
    },
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub role: AdminRole,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: AdminRole,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: admin.email,
            full_name: admin.full_name,
            role: admin.role,
            last_login_at: admin.last_login_at.map(timestamp),
            created_at: timestamp(admin.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub admin: AdminResponse,
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admin = state
        .admins
        .find_by_email(&body.email)
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ApiError::Unauthorized("Invalid credentials".to_string()),
            other => other.into(),
        })?;

    state.auth.check_credentials(&body.password, &admin.password_hash)?;

    let admin_id = admin
        .id
        .ok_or_else(|| ApiError::Internal("Stored admin has no _id".to_string()))?;
    let token = state
        .auth
        .issue_token(admin_id, &admin.email, PrincipalRole::Admin, None)?;
    state.admins.touch_login(admin_id).await?;

    tracing::info!(email = %admin.email, role = admin.role.as_str(), "Admin logged in");
    Ok(Json(AdminLoginResponse {
        token: token.token,
        expires_in: token.expires_in,
        admin: admin.into(),
    }))
}

pub async fn me(auth: AuthAdmin) -> Json<AdminResponse> {
    Json(auth.admin.into())
}

pub async fn create_admin(
    State(state): State<AppState>,
    SuperAdmin(auth): SuperAdmin,
    ValidJson(body): ValidJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    match state.admins.find_by_email(&body.email).await {
        Ok(_) => {
            return Err(ApiError::BadRequest(
                "An admin with this email already exists".to_string(),
            ));
        }
        Err(DaoError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let admin = state
        .admins
        .create(body.email, body.full_name, password_hash, body.role)
        .await?;

    tracing::info!(
        email = %admin.email,
        role = admin.role.as_str(),
        created_by = %auth.admin_id,
        "Admin account created"
    );
    Ok((StatusCode::CREATED, Json(admin.into())))
}
