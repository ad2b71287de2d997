pub mod admin_auth;
pub mod admin_panel;
pub mod application;
pub mod hostel;
pub mod realtor_auth;
pub mod student_auth;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::error::ApiError;

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what}")))
}

pub(crate) fn timestamp(dt: bson::DateTime) -> DateTime<Utc> {
    dt.to_chrono()
}
