use bson::{doc, oid::ObjectId, DateTime};
use hostelhub_db::models::Student;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct NewStudent {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub academic_level: Option<String>,
    pub department: Option<String>,
}

pub struct StudentDao {
    pub base: BaseDao<Student>,
}

impl StudentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Student::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewStudent) -> DaoResult<Student> {
        let now = DateTime::now();
        let student = Student {
            id: None,
            email: new.email.trim().to_lowercase(),
            password_hash: new.password_hash,
            full_name: new.full_name,
            phone: new.phone,
            student_id: new.student_id,
            academic_level: new.academic_level,
            department: new.department,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&student).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Student> {
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

    pub async fn touch_login(&self, student_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(student_id, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await
    }
}
