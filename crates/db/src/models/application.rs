use std::fmt;
use std::str::FromStr;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::realtor::UnknownStatus;

/// A student's application for a hostel.
///
/// `hostel` and `realtor` are copies taken at submission time, not live
/// references. After creation the document only receives status flips and
/// appends to `status_history` / `messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub application_id: String,
    pub hostel: HostelSnapshot,
    pub realtor: RealtorSnapshot,
    pub student_info: StudentInfo,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub additional: AdditionalInfo,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(default)]
    pub messages: Vec<ApplicationMessage>,
    #[serde(default)]
    pub views: i64,
    pub submitted_at: DateTime,
    pub last_updated: DateTime,
    pub expires_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostelSnapshot {
    pub hostel_id: ObjectId,
    pub hostel_name: String,
    pub hostel_price: i64,
    pub hostel_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtorSnapshot {
    pub realtor_id: ObjectId,
    pub realtor_name: String,
    pub realtor_email: String,
    pub realtor_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StudentInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub student_id: Option<String>,
    pub academic_level: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Accommodation {
    pub room_type: Option<String>,
    pub move_in_date: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdditionalInfo {
    pub emergency_contact: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    pub timestamp: DateTime,
    pub note: Option<String>,
    pub actor: Actor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationMessage {
    pub sender: SenderRole,
    pub message: String,
    pub timestamp: DateTime,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Student,
    Realtor,
    Admin,
    System,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Student => "student",
            Actor::Realtor => "realtor",
            Actor::Admin => "admin",
            Actor::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Student,
    Realtor,
    System,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::Student => "student",
            SenderRole::Realtor => "realtor",
            SenderRole::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Cancelled,
    Expired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Cancelled,
        ApplicationStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::Expired => "expired",
        }
    }

    /// Statuses an application can still leave; these are the ones that expire.
    pub fn open() -> impl Iterator<Item = ApplicationStatus> {
        Self::ALL.into_iter().filter(|s| !s.is_terminal())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved
                | ApplicationStatus::Rejected
                | ApplicationStatus::Cancelled
                | ApplicationStatus::Expired
        )
    }

    /// Students may only withdraw applications nobody has started reviewing.
    pub fn is_cancellable(&self) -> bool {
        *self == ApplicationStatus::Pending
    }

    /// Transition table used when strict transitions are enabled.
    /// Setting the current status again is never a legal transition.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match self {
            Pending => matches!(next, UnderReview | Approved | Rejected | Cancelled | Expired),
            UnderReview => matches!(next, Approved | Rejected | Expired),
            Approved | Rejected | Cancelled | Expired => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl Application {
    pub const COLLECTION: &'static str = "applications";

    pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

    pub fn expiry_from(submitted_at: DateTime, expiry_days: u32) -> DateTime {
        DateTime::from_millis(submitted_at.timestamp_millis() + expiry_days as i64 * Self::DAY_MILLIS)
    }
}

/// Per-status application counts plus a computed total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationStats {
    pub pending: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub cancelled: u64,
    pub expired: u64,
    pub total: u64,
}

impl ApplicationStats {
    /// Fold `(status, count)` rows from a group-by aggregation. Rows with an
    /// unrecognised status still count towards `total`.
    pub fn from_counts<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut stats = ApplicationStats::default();
        for (status, count) in rows {
            stats.total += count;
            match status.as_ref().parse::<ApplicationStatus>() {
                Ok(ApplicationStatus::Pending) => stats.pending += count,
                Ok(ApplicationStatus::UnderReview) => stats.under_review += count,
                Ok(ApplicationStatus::Approved) => stats.approved += count,
                Ok(ApplicationStatus::Rejected) => stats.rejected += count,
                Ok(ApplicationStatus::Cancelled) => stats.cancelled += count,
                Ok(ApplicationStatus::Expired) => stats.expired += count,
                Err(_) => {}
            }
        }
        stats
    }
}
