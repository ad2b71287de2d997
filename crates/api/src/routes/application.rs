use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use hostelhub_db::models::{
    Accommodation, Actor, AdditionalInfo, Application, ApplicationMessage, ApplicationStats,
    ApplicationStatus, SenderRole, StatusHistoryEntry, StudentInfo,
};
use hostelhub_services::dao::application::{SubmitApplication, WorkflowError};
use hostelhub_services::dao::base::{PaginatedResult, PaginationParams};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp;
use crate::{
    error::ApiError,
    extractors::{
        auth::{ActiveRealtor, AuthRealtor, AuthStudent},
        json::ValidJson,
    },
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    pub application_id: Option<String>,
    #[validate(length(min = 1, message = "hostel_id is required"))]
    pub hostel_id: String,
    pub student_info: StudentInfo,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub additional: AdditionalInfo,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RealtorApplicationsQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub application_id: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub hostel_name: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdatedResponse {
    pub application_id: String,
    pub status: ApplicationStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HostelSnapshotResponse {
    pub hostel_id: String,
    pub hostel_name: String,
    pub hostel_price: i64,
    pub hostel_location: String,
}

#[derive(Debug, Serialize)]
pub struct RealtorSnapshotResponse {
    pub realtor_id: String,
    pub realtor_name: String,
    pub realtor_email: String,
    pub realtor_phone: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub status: ApplicationStatus,
    pub timestamp: DateTime<Utc>,
    pub note: Option<String>,
    pub actor: Actor,
}

impl From<StatusHistoryEntry> for HistoryResponse {
    fn from(entry: StatusHistoryEntry) -> Self {
        Self {
            status: entry.status,
            timestamp: timestamp(entry.timestamp),
            note: entry.note,
            actor: entry.actor,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub sender: SenderRole,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl From<ApplicationMessage> for MessageResponse {
    fn from(msg: ApplicationMessage) -> Self {
        Self {
            sender: msg.sender,
            message: msg.message,
            timestamp: timestamp(msg.timestamp),
            read: msg.read,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application_id: String,
    pub hostel: HostelSnapshotResponse,
    pub realtor: RealtorSnapshotResponse,
    pub student_info: StudentInfo,
    pub accommodation: Accommodation,
    pub additional: AdditionalInfo,
    pub status: ApplicationStatus,
    pub status_history: Vec<HistoryResponse>,
    pub messages: Vec<MessageResponse>,
    pub views: i64,
    pub submitted_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            application_id: app.application_id,
            hostel: HostelSnapshotResponse {
                hostel_id: app.hostel.hostel_id.to_hex(),
                hostel_name: app.hostel.hostel_name,
                hostel_price: app.hostel.hostel_price,
                hostel_location: app.hostel.hostel_location,
            },
            realtor: RealtorSnapshotResponse {
                realtor_id: app.realtor.realtor_id.to_hex(),
                realtor_name: app.realtor.realtor_name,
                realtor_email: app.realtor.realtor_email,
                realtor_phone: app.realtor.realtor_phone,
            },
            student_info: app.student_info,
            accommodation: app.accommodation,
            additional: app.additional,
            status: app.status,
            status_history: app.status_history.into_iter().map(HistoryResponse::from).collect(),
            messages: app.messages.into_iter().map(MessageResponse::from).collect(),
            views: app.views,
            submitted_at: timestamp(app.submitted_at),
            last_updated: timestamp(app.last_updated),
            expires_at: timestamp(app.expires_at),
        }
    }
}

/// Loads an application and checks it belongs to the calling realtor.
async fn owned_application(
    state: &AppState,
    auth: &AuthRealtor,
    application_id: &str,
) -> Result<Application, ApiError> {
    let application = state.applications.find_current(application_id).await?;
    if application.realtor.realtor_id != auth.realtor_id {
        return Err(ApiError::Forbidden(
            "This application belongs to another realtor".to_string(),
        ));
    }
    Ok(application)
}

pub async fn submit(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<SubmittedResponse>), ApiError> {
    let application = state
        .applications
        .submit(
            &state.hostels,
            &state.realtors,
            SubmitApplication {
                application_id: body.application_id,
                hostel_id: body.hostel_id,
                student_info: body.student_info,
                accommodation: body.accommodation,
                additional: body.additional,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedResponse {
            application_id: application.application_id,
            status: application.status,
            submitted_at: timestamp(application.submitted_at),
            hostel_name: application.hostel.hostel_name,
        }),
    ))
}

/// Public lookup by application id. Every read counts as a view.
pub async fn get(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    state.applications.increment_views(&application_id).await?;
    let application = state.applications.find(&application_id).await?;
    Ok(Json(application.into()))
}

pub async fn update_status(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    Path(application_id): Path<String>,
    ValidJson(body): ValidJson<UpdateStatusRequest>,
) -> Result<Json<StatusUpdatedResponse>, ApiError> {
    owned_application(&state, &auth, &application_id).await?;

    let application = state
        .applications
        .update_status(&application_id, &body.status, body.note, Actor::Realtor)
        .await?;

    Ok(Json(StatusUpdatedResponse {
        application_id: application.application_id,
        status: application.status,
        updated_at: timestamp(application.last_updated),
    }))
}

/// Student withdrawal; only pending applications can be cancelled.
pub async fn cancel(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<StatusUpdatedResponse>, ApiError> {
    let application = state.applications.cancel(&application_id).await?;

    Ok(Json(StatusUpdatedResponse {
        application_id: application.application_id,
        status: application.status,
        updated_at: timestamp(application.last_updated),
    }))
}

pub async fn student_message(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    ValidJson(body): ValidJson<MessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // Replying implies the realtor's messages have been seen.
    let message = state
        .applications
        .add_message(&application_id, SenderRole::Student, &body.message)
        .await?;
    state
        .applications
        .mark_messages_read(&application_id, SenderRole::Student)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn realtor_message(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    Path(application_id): Path<String>,
    ValidJson(body): ValidJson<MessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    owned_application(&state, &auth, &application_id).await?;

    let message = state
        .applications
        .add_message(&application_id, SenderRole::Realtor, &body.message)
        .await?;
    state
        .applications
        .mark_messages_read(&application_id, SenderRole::Realtor)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn realtor_list(
    State(state): State<AppState>,
    auth: AuthRealtor,
    Query(query): Query<RealtorApplicationsQuery>,
) -> Result<Json<PaginatedResult<ApplicationResponse>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<ApplicationStatus>()
                .map_err(|_| WorkflowError::InvalidStatus(raw.to_string()))?,
        ),
        _ => None,
    };

    let defaults = PaginationParams::default();
    let params = PaginationParams {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let result = state
        .applications
        .find_for_realtor(auth.realtor_id, status, &params)
        .await?;
    Ok(Json(result.map(ApplicationResponse::from)))
}

pub async fn realtor_stats(
    State(state): State<AppState>,
    auth: AuthRealtor,
) -> Result<Json<ApplicationStats>, ApiError> {
    let stats = state.applications.stats_for_realtor(auth.realtor_id).await?;
    Ok(Json(stats))
}

/// Applications submitted with the logged-in student's email.
pub async fn student_mine(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> Result<Json<Vec<ApplicationResponse>>, ApiError> {
    let applications = state.applications.find_for_student(&auth.student.email).await?;
    Ok(Json(
        applications.into_iter().map(ApplicationResponse::from).collect(),
    ))
}
