use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, constants::Env};

pub async fn connect_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(env.db_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&env.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database connected and migrations applied");

    Ok(pool)
}

/// How bearer tokens issued by the identity provider are checked.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: Option<String>,
    /// Trust a plain `X-User-Id` header. Only for deployments behind a trusted proxy.
    pub allow_user_id_header: bool,
}

impl From<&Env> for AuthConfig {
    fn from(env: &Env) -> Self {
        Self {
            jwt_secret: env.jwt_secret.clone(),
            audience: env.jwt_audience.clone(),
            allow_user_id_header: env.allow_user_id_header,
        }
    }
}

/// Storage bucket settings for listing images.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
    pub upload_dir: String,
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
            upload_dir: "./storage".to_string(),
            base_url: "/storage".to_string(),
        }
    }
}

impl From<&Env> for StorageConfig {
    fn from(env: &Env) -> Self {
        Self {
            max_file_size: env.max_upload_bytes,
            upload_dir: env.upload_dir.clone(),
            base_url: env.public_storage_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}
