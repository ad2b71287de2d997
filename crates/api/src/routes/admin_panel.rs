use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::doc;
use hostelhub_db::models::{ApplicationStats, RealtorStatus};
use hostelhub_services::dao::base::{DaoError, PaginatedResult, PaginationParams};
use hostelhub_services::lifecycle::RealtorLifecycle;
use serde::{Deserialize, Serialize};

use super::{
    hostel::{HostelResponse, hostel_not_found},
    parse_object_id,
    realtor_auth::RealtorResponse,
};
use crate::{error::ApiError, extractors::auth::AuthAdmin, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RealtorListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Serialize)]
pub struct RealtorCounts {
    pub pending: u64,
    pub active: u64,
    pub suspended: u64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub realtors: RealtorCounts,
    pub hostels: u64,
    pub applications: ApplicationStats,
}

#[derive(Debug, Serialize)]
pub struct RealtorDetailResponse {
    pub realtor: RealtorResponse,
    pub hostels: Vec<HostelResponse>,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub message: String,
    pub realtor_id: String,
    pub email: String,
}

pub async fn overview(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> Result<Json<OverviewResponse>, ApiError> {
    let mut realtors = RealtorCounts::default();
    for (status, count) in state.realtors.count_by_status().await? {
        realtors.total += count;
        match status.parse::<RealtorStatus>() {
            Ok(RealtorStatus::Pending) => realtors.pending += count,
            Ok(RealtorStatus::Active) => realtors.active += count,
            Ok(RealtorStatus::Suspended) => realtors.suspended += count,
            Err(_) => {}
        }
    }

    let hostels = state.hostels.base.count(doc! {}).await?;
    let applications = state.applications.overall_stats().await?;

    Ok(Json(OverviewResponse {
        realtors,
        hostels,
        applications,
    }))
}

pub async fn list_realtors(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(query): Query<RealtorListQuery>,
) -> Result<Json<PaginatedResult<RealtorResponse>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<RealtorStatus>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let defaults = PaginationParams::default();
    let params = PaginationParams {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let result = state.realtors.list(status, &params).await?;
    Ok(Json(result.map(RealtorResponse::from)))
}

pub async fn get_realtor(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(realtor_id): Path<String>,
) -> Result<Json<RealtorDetailResponse>, ApiError> {
    let rid = parse_object_id(&realtor_id, "realtor id")?;

    let realtor = state.realtors.base.find_by_id(rid).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound("Realtor not found".to_string()),
        other => other.into(),
    })?;
    let hostels = state.hostels.find_by_realtor(rid).await?;

    Ok(Json(RealtorDetailResponse {
        realtor: realtor.into(),
        hostels: hostels.into_iter().map(HostelResponse::from).collect(),
    }))
}

pub async fn approve(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(realtor_id): Path<String>,
) -> Result<Json<RealtorResponse>, ApiError> {
    let rid = parse_object_id(&realtor_id, "realtor id")?;

    let realtor = RealtorLifecycle::new(&state.realtors)
        .approve(rid, auth.admin_id)
        .await?;

    Ok(Json(realtor.into()))
}

/// Toggles suspension; the response status says which way it went.
pub async fn toggle_suspension(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(realtor_id): Path<String>,
) -> Result<Json<RealtorResponse>, ApiError> {
    let rid = parse_object_id(&realtor_id, "realtor id")?;

    let realtor = RealtorLifecycle::new(&state.realtors)
        .toggle_suspension(rid, auth.admin_id)
        .await?;

    Ok(Json(realtor.into()))
}

/// Hard-deletes a pending realtor.
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(realtor_id): Path<String>,
) -> Result<Json<RejectResponse>, ApiError> {
    let rid = parse_object_id(&realtor_id, "realtor id")?;

    let realtor = RealtorLifecycle::new(&state.realtors).reject(rid).await?;

    tracing::info!(realtor_id = %rid, admin_id = %auth.admin_id, "Realtor application rejected");
    Ok(Json(RejectResponse {
        message: "Realtor application rejected and removed".to_string(),
        realtor_id: rid.to_hex(),
        email: realtor.email,
    }))
}

pub async fn delete_hostel(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(hostel_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let hid = parse_object_id(&hostel_id, "hostel id")?;

    state.hostels.delete_any(hid).await.map_err(hostel_not_found)?;

    tracing::info!(hostel_id = %hid, admin_id = %auth.admin_id, "Hostel removed by admin");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
