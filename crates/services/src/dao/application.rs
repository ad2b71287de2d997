use bson::{doc, oid::ObjectId, DateTime, Document};
use hostelhub_config::ApplicationSettings;
use hostelhub_db::models::{
    Accommodation, Actor, AdditionalInfo, Application, ApplicationMessage, ApplicationStats,
    ApplicationStatus, HostelSnapshot, RealtorSnapshot, SenderRole, StatusHistoryEntry,
    StudentInfo,
};
use mongodb::Database;
use thiserror::Error;
use tracing::{info, warn};

use super::base::{BaseDao, DaoError, PaginatedResult, PaginationParams};
use super::hostel::HostelDao;
use super::realtor::RealtorDao;

const APPLICATION_ID_ALPHABET: [char; 32] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K',
    'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Hostel not found")]
    HostelNotFound,
    #[error("The realtor for this hostel no longer exists")]
    RealtorNotFound,
    #[error("Application not found")]
    ApplicationNotFound,
    #[error(
        "Invalid status '{0}'. Must be one of: pending, under_review, approved, rejected, cancelled, expired"
    )]
    InvalidStatus(String),
    #[error("Cannot move an application from {from} to {to}")]
    IllegalTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Only pending applications can be cancelled (current status: {0})")]
    NotCancellable(ApplicationStatus),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Dao(#[from] DaoError),
}

impl From<mongodb::error::Error> for WorkflowError {
    fn from(err: mongodb::error::Error) -> Self {
        WorkflowError::Dao(DaoError::Mongo(err))
    }
}

impl From<bson::ser::Error> for WorkflowError {
    fn from(err: bson::ser::Error) -> Self {
        WorkflowError::Dao(DaoError::BsonSer(err))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

pub struct SubmitApplication {
    /// Caller-chosen external handle; generated when absent.
    pub application_id: Option<String>,
    pub hostel_id: String,
    pub student_info: StudentInfo,
    pub accommodation: Accommodation,
    pub additional: AdditionalInfo,
}

/// Student hostel applications and their status workflow.
///
/// Applications are addressed by their external `application_id`. Expiry is
/// declarative: open applications past `expires_at` are flipped to
/// `expired` whenever they are read, never by a background job.
pub struct ApplicationDao {
    pub base: BaseDao<Application>,
    expiry_days: u32,
    enforce_transitions: bool,
}

impl ApplicationDao {
    pub fn new(db: &Database, settings: &ApplicationSettings) -> Self {
        Self {
            base: BaseDao::new(db, Application::COLLECTION),
            expiry_days: settings.expiry_days,
            enforce_transitions: settings.enforce_transitions,
        }
    }

    pub async fn submit(
        &self,
        hostels: &HostelDao,
        realtors: &RealtorDao,
        submission: SubmitApplication,
    ) -> WorkflowResult<Application> {
        validate_student_info(&submission.student_info)?;
        let mut student_info = submission.student_info;
        student_info.email = student_info.email.trim().to_lowercase();

        let hostel_id = ObjectId::parse_str(submission.hostel_id.trim())
            .map_err(|_| WorkflowError::HostelNotFound)?;
        let hostel = hostels.base.find_by_id(hostel_id).await.map_err(|e| match e {
            DaoError::NotFound => WorkflowError::HostelNotFound,
            other => WorkflowError::Dao(other),
        })?;
        let realtor = realtors
            .base
            .find_by_id(hostel.realtor_id)
            .await
            .map_err(|e| match e {
                DaoError::NotFound => WorkflowError::RealtorNotFound,
                other => WorkflowError::Dao(other),
            })?;

        let application_id = match submission.application_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_application_id(),
        };

        let now = DateTime::now();
        let application = Application {
            id: None,
            application_id,
            hostel: HostelSnapshot {
                hostel_id,
                hostel_name: hostel.name,
                hostel_price: hostel.price,
                hostel_location: hostel.location,
            },
            realtor: RealtorSnapshot {
                realtor_id: hostel.realtor_id,
                realtor_name: realtor.full_name,
                realtor_email: realtor.email,
                realtor_phone: realtor.phone,
            },
            student_info,
            accommodation: submission.accommodation,
            additional: submission.additional,
            status: ApplicationStatus::Pending,
            status_history: vec![StatusHistoryEntry {
                status: ApplicationStatus::Pending,
                timestamp: now,
                note: Some("Application submitted".to_string()),
                actor: Actor::Student,
            }],
            messages: Vec::new(),
            views: 0,
            submitted_at: now,
            last_updated: now,
            expires_at: Application::expiry_from(now, self.expiry_days),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&application).await?;

        if let Err(e) = hostels.increment_applications(hostel_id).await {
            warn!(%hostel_id, error = %e, "Failed to bump hostel application counter");
        }

        let stored = self.base.find_by_id(id).await?;
        info!(
            application_id = %stored.application_id,
            hostel_id = %hostel_id,
            realtor_id = %stored.realtor.realtor_id,
            "Application submitted"
        );
        Ok(stored)
    }

    /// Loads an application by its external id, expiring it first if due.
    pub async fn find(&self, application_id: &str) -> WorkflowResult<Application> {
        self.expire_overdue(doc! { "application_id": application_id })
            .await?;
        self.base
            .find_one(doc! { "application_id": application_id })
            .await?
            .ok_or(WorkflowError::ApplicationNotFound)
    }

    /// Loads an application as stored, without applying expiry.
    pub async fn find_current(&self, application_id: &str) -> WorkflowResult<Application> {
        self.base
            .find_one(doc! { "application_id": application_id })
            .await?
            .ok_or(WorkflowError::ApplicationNotFound)
    }

    /// Sets `status`, appending exactly one history entry.
    ///
    /// Any of the six statuses is accepted regardless of the current one
    /// unless strict transitions are enabled in settings.
    pub async fn update_status(
        &self,
        application_id: &str,
        new_status: &str,
        note: Option<String>,
        actor: Actor,
    ) -> WorkflowResult<Application> {
        let next: ApplicationStatus = new_status
            .trim()
            .parse()
            .map_err(|_| WorkflowError::InvalidStatus(new_status.to_string()))?;

        // Overdue applications only expire here under strict transitions.
        let current = if self.enforce_transitions {
            self.find(application_id).await?
        } else {
            self.find_current(application_id).await?
        };

        if !self.enforce_transitions {
            let applied = self
                .apply_status(doc! { "application_id": application_id }, next, note, actor)
                .await?;
            if !applied {
                return Err(WorkflowError::ApplicationNotFound);
            }
        } else {
            if !current.status.can_transition_to(next) {
                return Err(WorkflowError::IllegalTransition {
                    from: current.status,
                    to: next,
                });
            }
            let applied = self
                .apply_status(
                    doc! { "application_id": application_id, "status": current.status.as_str() },
                    next,
                    note,
                    actor,
                )
                .await?;
            if !applied {
                let latest = self.find(application_id).await?;
                return Err(WorkflowError::IllegalTransition {
                    from: latest.status,
                    to: next,
                });
            }
        }

        info!(
            application_id,
            from = %current.status,
            to = %next,
            actor = actor.as_str(),
            "Application status updated"
        );
        self.find_current(application_id).await
    }

    /// Student withdrawal. Only legal while the application is `pending`.
    pub async fn cancel(&self, application_id: &str) -> WorkflowResult<Application> {
        let current = self.find(application_id).await?;
        if !current.status.is_cancellable() {
            return Err(WorkflowError::NotCancellable(current.status));
        }

        let applied = self
            .apply_status(
                doc! {
                    "application_id": application_id,
                    "status": ApplicationStatus::Pending.as_str(),
                },
                ApplicationStatus::Cancelled,
                Some("Cancelled by student".to_string()),
                Actor::Student,
            )
            .await?;
        if !applied {
            let latest = self.find(application_id).await?;
            return Err(WorkflowError::NotCancellable(latest.status));
        }

        info!(application_id, "Application cancelled by student");
        self.find(application_id).await
    }

    pub async fn add_message(
        &self,
        application_id: &str,
        sender: SenderRole,
        message: &str,
    ) -> WorkflowResult<ApplicationMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(WorkflowError::Validation("Message cannot be empty".to_string()));
        }

        let entry = ApplicationMessage {
            sender,
            message: message.to_string(),
            timestamp: DateTime::now(),
            read: false,
        };

        let pushed = self
            .base
            .update_one(
                doc! { "application_id": application_id },
                doc! { "$push": { "messages": bson::to_bson(&entry)? } },
            )
            .await?;
        if !pushed {
            return Err(WorkflowError::ApplicationNotFound);
        }
        Ok(entry)
    }

    /// Marks every message not authored by `reader` as read.
    pub async fn mark_messages_read(
        &self,
        application_id: &str,
        reader: SenderRole,
    ) -> WorkflowResult<()> {
        let result = self
            .base
            .collection()
            .update_one(
                doc! { "application_id": application_id },
                doc! { "$set": { "messages.$[m].read": true } },
            )
            .array_filters(vec![doc! { "m.sender": { "$ne": reader.as_str() }, "m.read": false }])
            .await?;
        if result.matched_count == 0 {
            return Err(WorkflowError::ApplicationNotFound);
        }
        Ok(())
    }

    pub async fn increment_views(&self, application_id: &str) -> WorkflowResult<()> {
        self.base
            .increment(doc! { "application_id": application_id }, "views", 1)
            .await?;
        Ok(())
    }

    pub async fn find_for_realtor(
        &self,
        realtor_id: ObjectId,
        status: Option<ApplicationStatus>,
        params: &PaginationParams,
    ) -> WorkflowResult<PaginatedResult<Application>> {
        let scope = doc! { "realtor.realtor_id": realtor_id };
        self.expire_overdue(scope.clone()).await?;

        let mut filter = scope;
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }
        Ok(self
            .base
            .find_paginated(filter, Some(doc! { "submitted_at": -1 }), params)
            .await?)
    }

    pub async fn find_for_student(&self, email: &str) -> WorkflowResult<Vec<Application>> {
        let scope = doc! { "student_info.email": email.trim().to_lowercase() };
        self.expire_overdue(scope.clone()).await?;
        Ok(self
            .base
            .find_many(scope, Some(doc! { "submitted_at": -1 }))
            .await?)
    }

    pub async fn stats_for_realtor(&self, realtor_id: ObjectId) -> WorkflowResult<ApplicationStats> {
        let scope = doc! { "realtor.realtor_id": realtor_id };
        self.expire_overdue(scope.clone()).await?;
        let rows = self.base.count_by(scope, "status").await?;
        Ok(ApplicationStats::from_counts(rows))
    }

    pub async fn overall_stats(&self) -> WorkflowResult<ApplicationStats> {
        self.expire_overdue(doc! {}).await?;
        let rows = self.base.count_by(doc! {}, "status").await?;
        Ok(ApplicationStats::from_counts(rows))
    }

    async fn apply_status(
        &self,
        filter: Document,
        next: ApplicationStatus,
        note: Option<String>,
        actor: Actor,
    ) -> WorkflowResult<bool> {
        let now = DateTime::now();
        let entry = StatusHistoryEntry {
            status: next,
            timestamp: now,
            note: note.filter(|n| !n.trim().is_empty()),
            actor,
        };

        Ok(self
            .base
            .update_one(
                filter,
                doc! {
                    "$set": { "status": next.as_str(), "last_updated": now },
                    "$push": { "status_history": bson::to_bson(&entry)? },
                },
            )
            .await?)
    }

    /// Flips open applications within `scope` whose `expires_at` has passed.
    async fn expire_overdue(&self, scope: Document) -> WorkflowResult<u64> {
        let now = DateTime::now();
        let entry = StatusHistoryEntry {
            status: ApplicationStatus::Expired,
            timestamp: now,
            note: Some("Application expired".to_string()),
            actor: Actor::System,
        };

        let mut filter = scope;
        let open: Vec<&str> = ApplicationStatus::open().map(|s| s.as_str()).collect();
        filter.insert("status", doc! { "$in": open });
        filter.insert("expires_at", doc! { "$lte": now });

        let result = self
            .base
            .collection()
            .update_many(
                filter,
                doc! {
                    "$set": {
                        "status": ApplicationStatus::Expired.as_str(),
                        "last_updated": now,
                        "updated_at": now,
                    },
                    "$push": { "status_history": bson::to_bson(&entry)? },
                },
            )
            .await?;

        if result.modified_count > 0 {
            info!(count = result.modified_count, "Expired overdue applications");
        }
        Ok(result.modified_count)
    }
}

fn validate_student_info(info: &StudentInfo) -> WorkflowResult<()> {
    let mut missing = Vec::new();
    if info.full_name.trim().is_empty() {
        missing.push("student_info.full_name");
    }
    if info.email.trim().is_empty() {
        missing.push("student_info.email");
    }
    if info.phone.trim().is_empty() {
        missing.push("student_info.phone");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn generate_application_id() -> String {
    format!("APP-{}", nanoid::nanoid!(10, &APPLICATION_ID_ALPHABET))
}
