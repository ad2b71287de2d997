use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hostelhub_db::models::{RealtorStatus, RealtorTransitionError};
use hostelhub_services::auth::AuthError;
use hostelhub_services::dao::application::WorkflowError;
use hostelhub_services::dao::base::DaoError;
use hostelhub_services::lifecycle::LifecycleError;
use serde::Serialize;
use tracing::error;

static EXPOSE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Whether 500 responses carry the raw error text in `details`.
/// Switched off in production.
pub fn set_expose_internal_details(expose: bool) {
    EXPOSE_INTERNAL_DETAILS.store(expose, Ordering::Relaxed);
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    WrongRole(String),
    AccountSuspended,
    AccountPending(RealtorStatus),
    /// A state-machine precondition failed; `code` names which one.
    InvalidTransition { code: &'static str, message: String },
    Conflict(String),
    Internal(String),
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_status: Option<RealtorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut account_status = None;
        let mut details = None;

        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::WrongRole(msg) => (StatusCode::FORBIDDEN, "wrong_role", msg),
            ApiError::AccountSuspended => {
                account_status = Some(RealtorStatus::Suspended);
                (
                    StatusCode::FORBIDDEN,
                    "account_suspended",
                    "Your account has been suspended. Please contact support.".to_string(),
                )
            }
            ApiError::AccountPending(current) => {
                account_status = Some(current);
                (
                    StatusCode::FORBIDDEN,
                    "account_pending",
                    format!("Your account is {current}. An administrator must approve it first."),
                )
            }
            ApiError::InvalidTransition { code, message } => {
                (StatusCode::BAD_REQUEST, code, message)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal server error");
                if EXPOSE_INTERNAL_DETAILS.load(Ordering::Relaxed) {
                    details = Some(msg);
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
        };

        let body = ErrorResponse {
            status: "error",
            error: error_type,
            message,
            account_status,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DaoError> for ApiError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DaoError::DuplicateKey(msg) => ApiError::Conflict(msg),
            DaoError::Validation(msg) => ApiError::Validation(msg),
            DaoError::Mongo(e) => ApiError::Internal(e.to_string()),
            DaoError::BsonSer(e) => ApiError::Internal(e.to_string()),
            DaoError::BsonDe(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::HashError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound => ApiError::NotFound("Realtor not found".to_string()),
            LifecycleError::Transition(t) => {
                let code = match t {
                    RealtorTransitionError::AlreadyActive => "already_active",
                    RealtorTransitionError::NotPending(_) => "not_pending",
                };
                ApiError::InvalidTransition {
                    code,
                    message: t.to_string(),
                }
            }
            LifecycleError::Contended => {
                ApiError::Conflict(LifecycleError::Contended.to_string())
            }
            LifecycleError::Dao(e) => e.into(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::HostelNotFound
            | WorkflowError::RealtorNotFound
            | WorkflowError::ApplicationNotFound => ApiError::NotFound(message),
            WorkflowError::InvalidStatus(_) => ApiError::InvalidTransition {
                code: "invalid_status",
                message,
            },
            WorkflowError::IllegalTransition { .. } => ApiError::InvalidTransition {
                code: "illegal_transition",
                message,
            },
            WorkflowError::NotCancellable(_) => ApiError::InvalidTransition {
                code: "not_cancellable",
                message,
            },
            WorkflowError::Validation(msg) => ApiError::Validation(msg),
            WorkflowError::Dao(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages.join("; "))
    }
}
