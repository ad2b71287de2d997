use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use hostelhub_db::models::{Admin, Realtor, RealtorStatus, Student};
use hostelhub_services::auth::{Claims, PrincipalRole};
use hostelhub_services::dao::base::DaoError;

use crate::{error::ApiError, state::AppState};

/// An authenticated realtor, re-read from the database on every request so
/// a suspension takes effect immediately rather than at token expiry.
/// Suspended accounts are refused here; pending ones get through.
#[derive(Debug, Clone)]
pub struct AuthRealtor {
    pub realtor_id: ObjectId,
    pub realtor: Realtor,
    pub claims: Claims,
}

/// `AuthRealtor` whose account is `active`. Guards every route that mutates
/// hostels or applications.
#[derive(Debug, Clone)]
pub struct ActiveRealtor(pub AuthRealtor);

#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub admin_id: ObjectId,
    pub admin: Admin,
    pub claims: Claims,
}

#[derive(Debug, Clone)]
pub struct SuperAdmin(pub AuthAdmin);

#[derive(Debug, Clone)]
pub struct AuthStudent {
    pub student_id: ObjectId,
    pub student: Student,
    pub claims: Claims,
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))
}

/// Verifies the bearer token and checks it was issued for `role`.
fn principal(
    parts: &Parts,
    state: &AppState,
    role: PrincipalRole,
) -> Result<(ObjectId, Claims), ApiError> {
    let token = bearer_token(parts)?;
    let claims = state.auth.verify_token(token)?;

    if claims.role != role {
        return Err(ApiError::WrongRole(format!(
            "This route requires a {} account",
            role.as_str()
        )));
    }

    let id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid principal ID in token".to_string()))?;
    Ok((id, claims))
}

fn missing_principal(err: DaoError, what: &str) -> ApiError {
    match err {
        DaoError::NotFound => ApiError::NotFound(format!("{what} account no longer exists")),
        other => other.into(),
    }
}

impl<S> FromRequestParts<S> for AuthRealtor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let (realtor_id, claims) = principal(parts, &app_state, PrincipalRole::Realtor)?;

        let realtor = app_state
            .realtors
            .base
            .find_by_id(realtor_id)
            .await
            .map_err(|e| missing_principal(e, "Realtor"))?;

        if realtor.status == RealtorStatus::Suspended {
            return Err(ApiError::AccountSuspended);
        }

        Ok(AuthRealtor {
            realtor_id,
            realtor,
            claims,
        })
    }
}

impl<S> FromRequestParts<S> for ActiveRealtor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthRealtor::from_request_parts(parts, state).await?;
        if auth.realtor.status != RealtorStatus::Active {
            return Err(ApiError::AccountPending(auth.realtor.status));
        }
        Ok(ActiveRealtor(auth))
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let (admin_id, claims) = principal(parts, &app_state, PrincipalRole::Admin)?;

        let admin = app_state
            .admins
            .base
            .find_by_id(admin_id)
            .await
            .map_err(|e| missing_principal(e, "Admin"))?;

        Ok(AuthAdmin {
            admin_id,
            admin,
            claims,
        })
    }
}

impl<S> FromRequestParts<S> for SuperAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthAdmin::from_request_parts(parts, state).await?;
        if !auth.admin.is_super_admin() {
            return Err(ApiError::Forbidden(
                "Only super-admins can perform this action".to_string(),
            ));
        }
        Ok(SuperAdmin(auth))
    }
}

impl<S> FromRequestParts<S> for AuthStudent
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let (student_id, claims) = principal(parts, &app_state, PrincipalRole::Student)?;

        let student = app_state
            .students
            .base
            .find_by_id(student_id)
            .await
            .map_err(|e| missing_principal(e, "Student"))?;

        Ok(AuthStudent {
            student_id,
            student,
            claims,
        })
    }
}
