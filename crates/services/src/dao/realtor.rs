use bson::{doc, oid::ObjectId, DateTime};
use hostelhub_db::models::{Realtor, RealtorStatus};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct NewRealtor {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
}

#[derive(Debug, Default)]
pub struct RealtorProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
}

pub struct RealtorDao {
    pub base: BaseDao<Realtor>,
}

impl RealtorDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Realtor::COLLECTION),
        }
    }

    /// Registers a realtor. New accounts always start `pending`.
    pub async fn create(&self, new: NewRealtor) -> DaoResult<Realtor> {
        let now = DateTime::now();
        let realtor = Realtor {
            id: None,
            email: new.email.trim().to_lowercase(),
            password_hash: new.password_hash,
            full_name: new.full_name,
            phone: new.phone,
            whatsapp: new.whatsapp,
            business_name: new.business_name,
            business_address: new.business_address,
            status: RealtorStatus::Pending,
            approved_at: None,
            approved_by: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&realtor).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Realtor> {
        self.base
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn email_taken(&self, email: &str) -> DaoResult<bool> {
        let count = self
            .base
            .count(doc! { "email": email.trim().to_lowercase() })
            .await?;
        Ok(count > 0)
    }

    pub async fn list(
        &self,
        status: Option<RealtorStatus>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Realtor>> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };
        self.base
            .find_paginated(filter, Some(doc! { "created_at": -1 }), params)
            .await
    }

    pub async fn count_by_status(&self) -> DaoResult<Vec<(String, u64)>> {
        self.base.count_by(doc! {}, "status").await
    }

    pub async fn touch_login(&self, realtor_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(realtor_id, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await
    }

    pub async fn update_profile(
        &self,
        realtor_id: ObjectId,
        update: RealtorProfileUpdate,
    ) -> DaoResult<Realtor> {
        let mut set = bson::Document::new();
        if let Some(name) = update.full_name {
            set.insert("full_name", name);
        }
        if let Some(phone) = update.phone {
            set.insert("phone", phone);
        }
        if let Some(whatsapp) = update.whatsapp {
            set.insert("whatsapp", whatsapp);
        }
        if let Some(business_name) = update.business_name {
            set.insert("business_name", business_name);
        }
        if let Some(business_address) = update.business_address {
            set.insert("business_address", business_address);
        }

        if !set.is_empty() {
            self.base.update_by_id(realtor_id, doc! { "$set": set }).await?;
        }
        self.base.find_by_id(realtor_id).await
    }

    /// Moves the realtor to `next` only if it is still in `expected`.
    /// Returns false when another writer changed the status first.
    pub async fn transition(
        &self,
        realtor_id: ObjectId,
        expected: RealtorStatus,
        next: RealtorStatus,
        approved_by: Option<ObjectId>,
    ) -> DaoResult<bool> {
        let mut set = doc! { "status": next.as_str() };
        if let Some(admin_id) = approved_by {
            set.insert("approved_at", DateTime::now());
            set.insert("approved_by", admin_id);
        }

        self.base
            .update_one(
                doc! { "_id": realtor_id, "status": expected.as_str() },
                doc! { "$set": set },
            )
            .await
    }

    /// Deletes the realtor only while it is still `pending`.
    pub async fn delete_pending(&self, realtor_id: ObjectId) -> DaoResult<bool> {
        self.base
            .delete_one(doc! { "_id": realtor_id, "status": RealtorStatus::Pending.as_str() })
            .await
    }
}
