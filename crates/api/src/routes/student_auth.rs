use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use hostelhub_db::models::Student;
use hostelhub_services::auth::{IssuedToken, PrincipalRole};
use hostelhub_services::dao::base::DaoError;
use hostelhub_services::dao::student::NewStudent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{realtor_auth::LoginRequest, timestamp};
use crate::{
    error::ApiError,
    extractors::{auth::AuthStudent, json::ValidJson},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub academic_level: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub academic_level: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: student.email,
            full_name: student.full_name,
            phone: student.phone,
            student_id: student.student_id,
            academic_level: student.academic_level,
            department: student.department,
            created_at: timestamp(student.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentAuthResponse {
    pub token: String,
    pub expires_in: u64,
    pub student: StudentResponse,
}

fn auth_response(token: IssuedToken, student: Student) -> StudentAuthResponse {
    StudentAuthResponse {
        token: token.token,
        expires_in: token.expires_in,
        student: student.into(),
    }
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<StudentAuthResponse>), ApiError> {
    if state.students.email_taken(&body.email).await? {
        return Err(ApiError::BadRequest(
            "A student with this email already exists".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let student = state
        .students
        .create(NewStudent {
            email: body.email,
            password_hash,
            full_name: body.full_name,
            phone: body.phone,
            student_id: body.student_id,
            academic_level: body.academic_level,
            department: body.department,
        })
        .await?;

    let student_id = student
        .id
        .ok_or_else(|| ApiError::Internal("Stored student has no _id".to_string()))?;
    let token = state
        .auth
        .issue_token(student_id, &student.email, PrincipalRole::Student, None)?;

    Ok((StatusCode::CREATED, Json(auth_response(token, student))))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<StudentAuthResponse>, ApiError> {
    let student = state
        .students
        .find_by_email(&body.email)
        .await
        .map_err(|e| match e {
            DaoError::NotFound => ApiError::Unauthorized("Invalid credentials".to_string()),
            other => other.into(),
        })?;

    state
        .auth
        .check_credentials(&body.password, &student.password_hash)?;

    let student_id = student
        .id
        .ok_or_else(|| ApiError::Internal("Stored student has no _id".to_string()))?;
    let token = state
        .auth
        .issue_token(student_id, &student.email, PrincipalRole::Student, None)?;
    state.students.touch_login(student_id).await?;

    Ok(Json(auth_response(token, student)))
}

pub async fn me(auth: AuthStudent) -> Json<StudentResponse> {
    Json(auth.student.into())
}
