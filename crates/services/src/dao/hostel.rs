use bson::{doc, oid::ObjectId, DateTime, Document};
use hostelhub_db::models::Hostel;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct NewHostel {
    pub name: String,
    pub location: String,
    pub price: i64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub whatsapp: Option<String>,
    pub available: bool,
}

#[derive(Debug, Default)]
pub struct HostelUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub whatsapp: Option<String>,
    pub available: Option<bool>,
}

/// Public listing filter. Every field is optional.
#[derive(Debug, Default, Clone)]
pub struct HostelFilter {
    pub location: Option<String>,
    pub max_price: Option<i64>,
    pub available: Option<bool>,
}

impl HostelFilter {
    fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            filter.insert(
                "location",
                doc! { "$regex": escape_regex(location.trim()), "$options": "i" },
            );
        }
        if let Some(max_price) = self.max_price {
            filter.insert("price", doc! { "$lte": max_price });
        }
        if let Some(available) = self.available {
            filter.insert("available", available);
        }
        filter
    }
}

fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ownership-scoped hostel store. It has no notion of realtor account
/// status; that gate belongs to the caller.
pub struct HostelDao {
    pub base: BaseDao<Hostel>,
}

impl HostelDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Hostel::COLLECTION),
        }
    }

    pub async fn create(&self, realtor_id: ObjectId, new: NewHostel) -> DaoResult<Hostel> {
        let now = DateTime::now();
        let hostel = Hostel {
            id: None,
            realtor_id,
            name: new.name,
            location: new.location,
            price: new.price,
            description: new.description,
            images: new.images,
            features: new.features,
            whatsapp: new.whatsapp,
            available: new.available,
            applications: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&hostel).await?;
        self.base.find_by_id(id).await
    }

    /// Fetches a hostel owned by `realtor_id`. Someone else's hostel is
    /// reported as not found.
    pub async fn find_owned(&self, realtor_id: ObjectId, hostel_id: ObjectId) -> DaoResult<Hostel> {
        self.base
            .find_one(doc! { "_id": hostel_id, "realtor_id": realtor_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_realtor(&self, realtor_id: ObjectId) -> DaoResult<Vec<Hostel>> {
        self.base
            .find_many(doc! { "realtor_id": realtor_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn list_public(
        &self,
        filter: &HostelFilter,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Hostel>> {
        self.base
            .find_paginated(filter.to_document(), Some(doc! { "created_at": -1 }), params)
            .await
    }

    pub async fn update(
        &self,
        realtor_id: ObjectId,
        hostel_id: ObjectId,
        update: HostelUpdate,
    ) -> DaoResult<Hostel> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(location) = update.location {
            set.insert("location", location);
        }
        if let Some(price) = update.price {
            set.insert("price", price);
        }
        if let Some(description) = update.description {
            set.insert("description", description);
        }
        if let Some(images) = update.images {
            set.insert("images", images);
        }
        if let Some(features) = update.features {
            set.insert("features", features);
        }
        if let Some(whatsapp) = update.whatsapp {
            set.insert("whatsapp", whatsapp);
        }
        if let Some(available) = update.available {
            set.insert("available", available);
        }

        let filter = doc! { "_id": hostel_id, "realtor_id": realtor_id };
        if set.is_empty() {
            return self.find_owned(realtor_id, hostel_id).await;
        }
        if !self.base.update_one(filter, doc! { "$set": set }).await? {
            return Err(DaoError::NotFound);
        }
        self.base.find_by_id(hostel_id).await
    }

    /// Flips `available` on an owned hostel and returns the new value.
    pub async fn toggle_availability(
        &self,
        realtor_id: ObjectId,
        hostel_id: ObjectId,
    ) -> DaoResult<bool> {
        let hostel = self.find_owned(realtor_id, hostel_id).await?;
        let next = !hostel.available;
        let matched = self
            .base
            .update_one(
                doc! { "_id": hostel_id, "realtor_id": realtor_id, "available": hostel.available },
                doc! { "$set": { "available": next } },
            )
            .await?;
        if matched {
            Ok(next)
        } else {
            // Lost a race with another toggle; report what is stored now.
            Ok(self.find_owned(realtor_id, hostel_id).await?.available)
        }
    }

    pub async fn delete_owned(&self, realtor_id: ObjectId, hostel_id: ObjectId) -> DaoResult<()> {
        if self
            .base
            .delete_one(doc! { "_id": hostel_id, "realtor_id": realtor_id })
            .await?
        {
            Ok(())
        } else {
            Err(DaoError::NotFound)
        }
    }

    /// Admin override: delete regardless of owner.
    pub async fn delete_any(&self, hostel_id: ObjectId) -> DaoResult<()> {
        if self.base.delete_one(doc! { "_id": hostel_id }).await? {
            Ok(())
        } else {
            Err(DaoError::NotFound)
        }
    }

    pub async fn increment_applications(&self, hostel_id: ObjectId) -> DaoResult<bool> {
        self.base
            .increment(doc! { "_id": hostel_id }, "applications", 1)
            .await
    }

    pub async fn increment_views(&self, hostel_id: ObjectId) -> DaoResult<bool> {
        self.base.increment(doc! { "_id": hostel_id }, "views", 1).await
    }
}
