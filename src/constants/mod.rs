use crate::api::error::SystemError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_MESSAGE_PAGE_SIZE: i64 = 30;
pub const MESSAGE_PREVIEW_CHARS: usize = 120;

pub const VIEWING_INSERT_ATTEMPTS: u32 = 3;
pub const VIEWING_RETRY_DELAY_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Env {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub allow_user_id_header: bool,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub workers: usize,
    pub upload_dir: String,
    pub public_storage_url: String,
    pub max_upload_bytes: usize,
}

fn required(key: &'static str) -> Result<String, SystemError> {
    std::env::var(key)
        .map_err(|_| SystemError::config(format!("{key} must be set in .env file or environment")))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, SystemError> {
    optional(key, default)
        .parse::<T>()
        .map_err(|_| SystemError::config(format!("{key} has an invalid value")))
}

impl Env {
    pub fn load() -> Result<Self, SystemError> {
        dotenvy::dotenv().ok();

        Ok(Env {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "5")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: std::env::var("JWT_AUDIENCE").ok().filter(|v| !v.is_empty()),
            allow_user_id_header: parsed("ALLOW_USER_ID_HEADER", "false")?,
            frontend_url: optional("FRONTEND_URL", "http://localhost:3000"),
            ip: optional("IP", "127.0.0.1"),
            port: parsed("PORT", "8080")?,
            workers: parsed("WORKERS", "2")?,
            upload_dir: optional("UPLOAD_DIR", "./storage"),
            public_storage_url: optional("PUBLIC_STORAGE_URL", "/storage"),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "10485760")?,
        })
    }
}
