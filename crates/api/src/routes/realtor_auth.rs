use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use hostelhub_db::models::{Realtor, RealtorStatus};
use hostelhub_services::auth::PrincipalRole;
use hostelhub_services::dao::base::DaoError;
use hostelhub_services::dao::realtor::{NewRealtor, RealtorProfileUpdate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp;
use crate::{
    error::ApiError,
    extractors::{auth::AuthRealtor, json::ValidJson},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRealtorRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RealtorResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub status: RealtorStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Realtor> for RealtorResponse {
    fn from(realtor: Realtor) -> Self {
        Self {
            id: realtor.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: realtor.email,
            full_name: realtor.full_name,
            phone: realtor.phone,
            whatsapp: realtor.whatsapp,
            business_name: realtor.business_name,
            business_address: realtor.business_address,
            status: realtor.status,
            approved_at: realtor.approved_at.map(timestamp),
            approved_by: realtor.approved_by.map(|id| id.to_hex()),
            last_login_at: realtor.last_login_at.map(timestamp),
            created_at: timestamp(realtor.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RealtorLoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub realtor: RealtorResponse,
    pub needs_approval: bool,
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRealtorRequest>,
) -> Result<(StatusCode, Json<RealtorResponse>), ApiError> {
    if state.realtors.email_taken(&body.email).await? {
        return Err(ApiError::BadRequest(
            "A realtor with this email already exists".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let realtor = state
        .realtors
        .create(NewRealtor {
            email: body.email,
            password_hash,
            full_name: body.full_name,
            phone: body.phone,
            whatsapp: body.whatsapp,
            business_name: body.business_name,
            business_address: body.business_address,
        })
        .await?;

    tracing::info!(email = %realtor.email, "Realtor registered, awaiting approval");
    Ok((StatusCode::CREATED, Json(realtor.into())))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<RealtorLoginResponse>, ApiError> {
    let realtor = state
        .realtors
        .find_by_email(&body.email)
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ApiError::Unauthorized("Invalid credentials".to_string()),
            other => other.into(),
        })?;

    state
        .auth
        .check_credentials(&body.password, &realtor.password_hash)?;

    if realtor.status == RealtorStatus::Suspended {
        return Err(ApiError::AccountSuspended);
    }

    let realtor_id = realtor
        .id
        .ok_or_else(|| ApiError::Internal("Stored realtor has no _id".to_string()))?;
    let token = state.auth.issue_token(
        realtor_id,
        &realtor.email,
        PrincipalRole::Realtor,
        Some(realtor.status.as_str()),
    )?;
    state.realtors.touch_login(realtor_id).await?;

    let needs_approval = realtor.status == RealtorStatus::Pending;
    Ok(Json(RealtorLoginResponse {
        token: token.token,
        expires_in: token.expires_in,
        realtor: realtor.into(),
        needs_approval,
    }))
}

pub async fn me(auth: AuthRealtor) -> Json<RealtorResponse> {
    Json(auth.realtor.into())
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthRealtor,
    ValidJson(body): ValidJson<UpdateProfileRequest>,
) -> Result<Json<RealtorResponse>, ApiError> {
    let realtor = state
        .realtors
        .update_profile(
            auth.realtor_id,
            RealtorProfileUpdate {
                full_name: body.full_name,
                phone: body.phone,
                whatsapp: body.whatsapp,
                business_name: body.business_name,
                business_address: body.business_address,
            },
        )
        .await?;

    Ok(Json(realtor.into()))
}
