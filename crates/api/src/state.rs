use mongodb::Database;
use hostelhub_config::Settings;
use hostelhub_services::{
    AuthService,
    dao::{
        admin::AdminDao, application::ApplicationDao, hostel::HostelDao, realtor::RealtorDao,
        student::StudentDao,
    },
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::set_expose_internal_details;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub realtors: Arc<RealtorDao>,
    pub admins: Arc<AdminDao>,
    pub students: Arc<StudentDao>,
    pub hostels: Arc<HostelDao>,
    pub applications: Arc<ApplicationDao>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        set_expose_internal_details(!settings.app.is_production());

        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let realtors = Arc::new(RealtorDao::new(&db));
        let admins = Arc::new(AdminDao::new(&db));
        let students = Arc::new(StudentDao::new(&db));
        let hostels = Arc::new(HostelDao::new(&db));
        let applications = Arc::new(ApplicationDao::new(&db, &settings.applications));

        Self {
            db,
            settings,
            auth,
            realtors,
            admins,
            students,
            hostels,
            applications,
        }
    }

    /// Ensures the configured bootstrap super-admin exists. A no-op when
    /// either credential is unset.
    pub async fn bootstrap_admin(&self) -> anyhow::Result<()> {
        let admin = &self.settings.admin;
        if admin.bootstrap_email.trim().is_empty() || admin.bootstrap_password.is_empty() {
            warn!("No bootstrap admin configured; admin panel is unreachable until one exists");
            return Ok(());
        }

        if self.admins.find_by_email(&admin.bootstrap_email).await.is_ok() {
            return Ok(());
        }

        let password_hash = self.auth.hash_password(&admin.bootstrap_password)?;
        if self
            .admins
            .ensure_bootstrap(&admin.bootstrap_email, &admin.bootstrap_name, password_hash)
            .await?
        {
            info!(email = %admin.bootstrap_email, "Bootstrap admin ready");
        }
        Ok(())
    }
}
