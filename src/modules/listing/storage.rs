use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{api::error, configs::StorageConfig};

/// Local-disk bucket holding listing images, exposed under `config.base_url`.
#[derive(Debug, Clone)]
pub struct StorageBucket {
    config: StorageConfig,
}

impl StorageBucket {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn validate_file(&self, file_size: usize, mime_type: &str) -> Result<(), error::SystemError> {
        if file_size == 0 {
            return Err(error::SystemError::bad_request("File is empty"));
        }

        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                mime_type
            )));
        }

        Ok(())
    }

    fn generate_filename(&self, original_filename: &str, mime_type: &str) -> String {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .or_else(|| {
                mime_guess::get_mime_extensions_str(mime_type)
                    .and_then(|exts| exts.first())
                    .map(|ext| ext.to_string())
            });

        match extension {
            Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::now_v7(), ext),
            _ => Uuid::now_v7().to_string(),
        }
    }

    /// Resolves a stored object name to its path on disk. Rejects anything that
    /// could escape the bucket directory.
    pub fn object_path(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        valid.then(|| Path::new(&self.config.upload_dir).join(name))
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url, name)
    }

    fn object_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.config.base_url.as_str())?.strip_prefix('/')
    }

    /// Stores the bytes and returns the public URL of the new object.
    pub async fn put(
        &self,
        original_filename: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, error::SystemError> {
        self.validate_file(bytes.len(), mime_type)?;

        let name = self.generate_filename(original_filename, mime_type);
        let path = self
            .object_path(&name)
            .ok_or_else(|| error::SystemError::bad_request("Invalid file name"))?;

        tokio::fs::create_dir_all(&self.config.upload_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Stored object {} ({} bytes)", name, bytes.len());

        Ok(self.public_url(&name))
    }

    /// Deletes the object behind a public URL. URLs outside the bucket are ignored.
    pub async fn remove(&self, url: &str) -> Result<(), error::SystemError> {
        let Some(path) = self.object_name(url).and_then(|name| self.object_path(name)) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read(&self, name: &str) -> Result<(Vec<u8>, String), error::SystemError> {
        let path =
            self.object_path(name).ok_or_else(|| error::SystemError::not_found("File not found"))?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(error::SystemError::not_found("File not found"));
            }
            Err(e) => return Err(e.into()),
        };
        let mime = mime_guess::from_path(&path).first_or_octet_stream().to_string();
        Ok((bytes, mime))
    }
}
