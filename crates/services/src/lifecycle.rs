//! Admin-driven realtor account transitions.
//!
//! `reject` is destructive: it hard-deletes a pending realtor and there is
//! no way back. Use `toggle_suspension` to take an account offline
//! reversibly.

use bson::oid::ObjectId;
use hostelhub_db::models::{Realtor, RealtorStatus, RealtorTransitionError};
use thiserror::Error;
use tracing::info;

use crate::dao::base::DaoError;
use crate::dao::realtor::RealtorDao;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Realtor not found")]
    NotFound,
    #[error(transparent)]
    Transition(#[from] RealtorTransitionError),
    #[error("Realtor status changed concurrently; re-fetch and retry")]
    Contended,
    #[error(transparent)]
    Dao(DaoError),
}

impl From<DaoError> for LifecycleError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => LifecycleError::NotFound,
            other => LifecycleError::Dao(other),
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Number of times a transition is retried after losing a race to another
/// writer before the current state's error is reported.
const MAX_ATTEMPTS: usize = 3;

pub struct RealtorLifecycle<'a> {
    realtors: &'a RealtorDao,
}

impl<'a> RealtorLifecycle<'a> {
    pub fn new(realtors: &'a RealtorDao) -> Self {
        Self { realtors }
    }

    pub async fn approve(&self, realtor_id: ObjectId, admin_id: ObjectId) -> LifecycleResult<Realtor> {
        for _ in 0..MAX_ATTEMPTS {
            let realtor = self.realtors.base.find_by_id(realtor_id).await?;
            let next = realtor.status.approve()?;
            if self
                .realtors
                .transition(realtor_id, realtor.status, next, Some(admin_id))
                .await?
            {
                info!(%realtor_id, %admin_id, from = %realtor.status, "Realtor approved");
                return Ok(self.realtors.base.find_by_id(realtor_id).await?);
            }
        }
        self.settled_error(realtor_id, |status| status.approve().map(|_| ()))
            .await
    }

    /// Flips between `suspended` and `active`; a pending account is
    /// suspended. The returned record tells which way it went.
    pub async fn toggle_suspension(
        &self,
        realtor_id: ObjectId,
        admin_id: ObjectId,
    ) -> LifecycleResult<Realtor> {
        for _ in 0..MAX_ATTEMPTS {
            let realtor = self.realtors.base.find_by_id(realtor_id).await?;
            let next = realtor.status.toggle_suspension();
            // Reactivating an account that was never approved records the
            // admin as its approver.
            let approver = (next == RealtorStatus::Active && realtor.approved_at.is_none())
                .then_some(admin_id);
            if self
                .realtors
                .transition(realtor_id, realtor.status, next, approver)
                .await?
            {
                info!(%realtor_id, %admin_id, from = %realtor.status, to = %next, "Realtor suspension toggled");
                return Ok(self.realtors.base.find_by_id(realtor_id).await?);
            }
        }
        self.settled_error(realtor_id, |_| Ok(())).await
    }

    /// Deletes a pending realtor. Irreversible.
    pub async fn reject(&self, realtor_id: ObjectId) -> LifecycleResult<Realtor> {
        let realtor = self.realtors.base.find_by_id(realtor_id).await?;
        realtor.status.check_rejectable()?;

        if !self.realtors.delete_pending(realtor_id).await? {
            // Changed or removed between the read and the delete.
            let current = self.realtors.base.find_by_id(realtor_id).await?;
            current.status.check_rejectable()?;
            return Err(LifecycleError::Contended);
        }

        info!(%realtor_id, email = %realtor.email, "Pending realtor rejected and deleted");
        Ok(realtor)
    }

    async fn settled_error<T>(
        &self,
        realtor_id: ObjectId,
        check: impl Fn(RealtorStatus) -> Result<(), RealtorTransitionError>,
    ) -> LifecycleResult<T> {
        let realtor = self.realtors.base.find_by_id(realtor_id).await?;
        check(realtor.status)?;
        Err(LifecycleError::Contended)
    }
}
