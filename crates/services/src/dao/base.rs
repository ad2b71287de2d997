use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Validation: {0}")]
    Validation(String),
}

pub type DaoResult<T> = Result<T, DaoError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Clamp to `1 <= page <= MAX_PAGE` and `1 <= per_page <= 100`.
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page.clamp(1, Self::MAX_PAGE),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Documents to skip for this page. Call on normalized params.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DaoResult<Vec<T>> {
        let cursor = match sort {
            Some(sort) => self.collection.find(filter).sort(sort).await?,
            None => self.collection.find(filter).await?,
        };
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_paginated(
        &self,
        filter: Document,
        sort: Option<Document>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<T>> {
        let params = params.normalized();
        let total = self.collection.count_documents(filter.clone()).await?;
        let skip = params.skip();

        let sort = sort.unwrap_or_else(|| doc! { "created_at": -1 });

        let items: Vec<T> = self
            .collection
            .find(filter)
            .sort(sort)
            .skip(skip)
            .limit(params.per_page as i64)
            .await?
            .try_collect()
            .await?;

        let total_pages = total.div_ceil(params.per_page);

        Ok(PaginatedResult {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages,
        })
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.collection.insert_one(doc).await.map_err(|e| {
            if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
                ref write_error,
            )) = *e.kind
            {
                if write_error.code == 11000 {
                    return DaoError::DuplicateKey(write_error.message.clone());
                }
            }
            DaoError::Mongo(e)
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Validation("inserted_id is not an ObjectId".to_string()))?;
        debug!(?id, "Inserted document");
        Ok(id)
    }

    /// Applies `update`, stamping `updated_at` into its `$set` stage.
    /// Returns whether a document matched `filter`.
    pub async fn update_one(&self, filter: Document, update: Document) -> DaoResult<bool> {
        let update = with_updated_at(update);
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> DaoResult<bool> {
        self.update_one(doc! { "_id": id }, update).await
    }

    /// Bumps a numeric counter without touching `updated_at`.
    pub async fn increment(&self, filter: Document, field: &str, by: i64) -> DaoResult<bool> {
        let result = self
            .collection
            .update_one(filter, doc! { "$inc": { field: by } })
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete_one(&self, filter: Document) -> DaoResult<bool> {
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Group documents matching `filter` by a string `field` and count them.
    pub async fn count_by(&self, filter: Document, field: &str) -> DaoResult<Vec<(String, u64)>> {
        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;

        let mut rows = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            let key = row.get_str("_id").unwrap_or_default().to_string();
            let count = match row.get("count") {
                Some(bson::Bson::Int32(n)) => *n as u64,
                Some(bson::Bson::Int64(n)) => *n as u64,
                _ => 0,
            };
            rows.push((key, count));
        }
        Ok(rows)
    }
}

fn with_updated_at(mut update: Document) -> Document {
    let now = bson::DateTime::now();
    if !update.contains_key("$set") {
        update.insert("$set", Document::new());
    }
    if let Ok(set_doc) = update.get_document_mut("$set") {
        set_doc.insert("updated_at", now);
    }
    update
}
