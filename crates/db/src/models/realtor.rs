use std::fmt;
use std::str::FromStr;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realtor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    #[serde(default)]
    pub status: RealtorStatus,
    pub approved_at: Option<DateTime>,
    pub approved_by: Option<ObjectId>,
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Realtor {
    pub const COLLECTION: &'static str = "realtors";
}

/// Account lifecycle of a realtor.
///
/// ```text
/// pending ──approve──▶ active ◀──toggle──▶ suspended
///    │                                         ▲
///    ├──reject (hard delete)                   │
///    └──toggle─────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RealtorStatus {
    #[default]
    Pending,
    Active,
    Suspended,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RealtorTransitionError {
    #[error("Realtor is already approved")]
    AlreadyActive,
    #[error("Only pending realtors can be rejected (current status: {0})")]
    NotPending(RealtorStatus),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl RealtorStatus {
    pub const ALL: [RealtorStatus; 3] = [
        RealtorStatus::Pending,
        RealtorStatus::Active,
        RealtorStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RealtorStatus::Pending => "pending",
            RealtorStatus::Active => "active",
            RealtorStatus::Suspended => "suspended",
        }
    }

    /// Target of an admin approval. Legal from `pending` and `suspended`.
    pub fn approve(self) -> Result<RealtorStatus, RealtorTransitionError> {
        match self {
            RealtorStatus::Active => Err(RealtorTransitionError::AlreadyActive),
            RealtorStatus::Pending | RealtorStatus::Suspended => Ok(RealtorStatus::Active),
        }
    }

    /// Suspension toggle: `suspended` flips back to `active`, everything
    /// else becomes `suspended`. Calling it twice alternates.
    pub fn toggle_suspension(self) -> RealtorStatus {
        match self {
            RealtorStatus::Suspended => RealtorStatus::Active,
            RealtorStatus::Pending | RealtorStatus::Active => RealtorStatus::Suspended,
        }
    }

    /// Rejection deletes the record and is only legal while pending.
    pub fn check_rejectable(self) -> Result<(), RealtorTransitionError> {
        match self {
            RealtorStatus::Pending => Ok(()),
            other => Err(RealtorTransitionError::NotPending(other)),
        }
    }
}

impl fmt::Display for RealtorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RealtorStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RealtorStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
