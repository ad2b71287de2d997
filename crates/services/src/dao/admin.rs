use bson::{doc, oid::ObjectId, DateTime};
use hostelhub_db::models::{Admin, AdminRole};
use mongodb::Database;
use tracing::info;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct AdminDao {
    pub base: BaseDao<Admin>,
}

impl AdminDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Admin::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        email: String,
        full_name: String,
        password_hash: String,
        role: AdminRole,
    ) -> DaoResult<Admin> {
        let now = DateTime::now();
        let admin = Admin {
            id: None,
            email: email.trim().to_lowercase(),
            password_hash,
            full_name,
            role,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&admin).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Admin> {
        self.base
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn touch_login(&self, admin_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(admin_id, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await
    }

    /// Creates the bootstrap super-admin unless an admin with that email
    /// already exists. Returns true when a new account was created.
    pub async fn ensure_bootstrap(
        &self,
        email: &str,
        full_name: &str,
        password_hash: String,
    ) -> DaoResult<bool> {
        match self.find_by_email(email).await {
            Ok(_) => Ok(false),
            Err(DaoError::NotFound) => {
                self.create(
                    email.to_string(),
                    full_name.to_string(),
                    password_hash,
                    AdminRole::SuperAdmin,
                )
                .await?;
                info!(email, "Bootstrap super-admin created");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
