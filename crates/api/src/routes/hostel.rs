use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use hostelhub_db::models::Hostel;
use hostelhub_services::dao::base::{DaoError, PaginatedResult, PaginationParams};
use hostelhub_services::dao::hostel::{HostelFilter, HostelUpdate, NewHostel};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{parse_object_id, timestamp};
use crate::{
    error::ApiError,
    extractors::{
        auth::{ActiveRealtor, AuthRealtor},
        json::ValidJson,
    },
    state::AppState,
};

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHostelRequest {
    #[validate(length(min = 1, message = "Hostel name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 1, message = "Price must be a positive amount"))]
    pub price: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub whatsapp: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHostelRequest {
    #[validate(length(min = 1, message = "Hostel name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Price must be a positive amount"))]
    pub price: Option<i64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub whatsapp: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct HostelQuery {
    pub location: Option<String>,
    pub max_price: Option<i64>,
    pub available: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HostelResponse {
    pub id: String,
    pub realtor_id: String,
    pub name: String,
    pub location: String,
    pub price: i64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub whatsapp: Option<String>,
    pub available: bool,
    pub applications: i64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Hostel> for HostelResponse {
    fn from(hostel: Hostel) -> Self {
        Self {
            id: hostel.id.map(|id| id.to_hex()).unwrap_or_default(),
            realtor_id: hostel.realtor_id.to_hex(),
            name: hostel.name,
            location: hostel.location,
            price: hostel.price,
            description: hostel.description,
            images: hostel.images,
            features: hostel.features,
            whatsapp: hostel.whatsapp,
            available: hostel.available,
            applications: hostel.applications,
            views: hostel.views,
            created_at: timestamp(hostel.created_at),
            updated_at: timestamp(hostel.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: String,
    pub available: bool,
}

pub(crate) fn hostel_not_found(err: DaoError) -> ApiError {
    match err {
        DaoError::NotFound => ApiError::NotFound("Hostel not found".to_string()),
        other => other.into(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HostelQuery>,
) -> Result<Json<PaginatedResult<HostelResponse>>, ApiError> {
    let filter = HostelFilter {
        location: query.location,
        max_price: query.max_price,
        available: query.available,
    };
    let defaults = PaginationParams::default();
    let params = PaginationParams {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let result = state.hostels.list_public(&filter, &params).await?;
    Ok(Json(result.map(HostelResponse::from)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(hostel_id): Path<String>,
) -> Result<Json<HostelResponse>, ApiError> {
    let hid = parse_object_id(&hostel_id, "hostel id")?;

    if !state.hostels.increment_views(hid).await? {
        return Err(ApiError::NotFound("Hostel not found".to_string()));
    }
    let hostel = state.hostels.base.find_by_id(hid).await.map_err(hostel_not_found)?;

    Ok(Json(hostel.into()))
}

/// The caller's own listings. Pending realtors may see them too.
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthRealtor,
) -> Result<Json<Vec<HostelResponse>>, ApiError> {
    let hostels = state.hostels.find_by_realtor(auth.realtor_id).await?;
    Ok(Json(hostels.into_iter().map(HostelResponse::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    ValidJson(body): ValidJson<CreateHostelRequest>,
) -> Result<(StatusCode, Json<HostelResponse>), ApiError> {
    let hostel = state
        .hostels
        .create(
            auth.realtor_id,
            NewHostel {
                name: body.name,
                location: body.location,
                price: body.price,
                description: body.description,
                images: body.images,
                features: body.features,
                whatsapp: body.whatsapp,
                available: body.available,
            },
        )
        .await?;

    tracing::info!(realtor_id = %auth.realtor_id, hostel = %hostel.name, "Hostel listed");
    Ok((StatusCode::CREATED, Json(hostel.into())))
}

pub async fn update(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    Path(hostel_id): Path<String>,
    ValidJson(body): ValidJson<UpdateHostelRequest>,
) -> Result<Json<HostelResponse>, ApiError> {
    let hid = parse_object_id(&hostel_id, "hostel id")?;

    let hostel = state
        .hostels
        .update(
            auth.realtor_id,
            hid,
            HostelUpdate {
                name: body.name,
                location: body.location,
                price: body.price,
                description: body.description,
                images: body.images,
                features: body.features,
                whatsapp: body.whatsapp,
                available: body.available,
            },
        )
        .await
        .map_err(hostel_not_found)?;

    Ok(Json(hostel.into()))
}

pub async fn toggle_availability(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    Path(hostel_id): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let hid = parse_object_id(&hostel_id, "hostel id")?;

    let available = state
        .hostels
        .toggle_availability(auth.realtor_id, hid)
        .await
        .map_err(hostel_not_found)?;

    Ok(Json(AvailabilityResponse {
        id: hid.to_hex(),
        available,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    ActiveRealtor(auth): ActiveRealtor,
    Path(hostel_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let hid = parse_object_id(&hostel_id, "hostel id")?;

    state
        .hostels
        .delete_owned(auth.realtor_id, hid)
        .await
        .map_err(hostel_not_found)?;

    tracing::info!(realtor_id = %auth.realtor_id, hostel_id = %hid, "Hostel deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
