use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub admin: AdminSettings,
    pub applications: ApplicationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// `production` hides raw internal error text from API responses.
    pub environment: String,
}

impl AppSettings {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub token_ttl_secs: u64,
    pub issuer: String,
}

/// Bootstrap credentials for the first super-admin. Both email and password
/// must be non-empty for the account to be ensured at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminSettings {
    pub bootstrap_email: String,
    pub bootstrap_password: String,
    pub bootstrap_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub expiry_days: u32,
    pub enforce_transitions: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("HOSTELHUB"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 5000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("app.environment", "development")?
            .set_default("database.url", "mongodb://localhost:27019")?
            .set_default("database.name", "hostelhub")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.token_ttl_secs", 86400)?
            .set_default("jwt.issuer", "hostelhub")?
            .set_default("admin.bootstrap_email", "")?
            .set_default("admin.bootstrap_password", "")?
            .set_default("admin.bootstrap_name", "Super Admin")?
            .set_default("applications.expiry_days", 30)?
            .set_default("applications.enforce_transitions", false)?
            .build()?;

        config.try_deserialize()
    }
}
