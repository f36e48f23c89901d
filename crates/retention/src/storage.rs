/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Storage backend abstraction for backup locations

use crate::error::{RetentionError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tracing::warn;

/// A place holding backup files that can be listed and pruned
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// List all regular files
    async fn list_files(&self) -> Result<FileListing>;

    /// Delete a single file by name
    async fn delete_file(&self, name: &str) -> Result<()>;

    /// Human readable location used in logs
    fn describe(&self) -> String;
}

/// Files found in a storage location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    /// Names that can be evaluated and deleted, sorted
    pub files: Vec<String>,
    /// Files whose name is not valid UTF-8, rendered lossily. They can
    /// not be addressed by name and are always kept.
    pub unreadable: Vec<String>,
}

impl FileListing {
    pub fn len(&self) -> usize {
        self.files.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend_type: StorageBackendType,
    pub local: Option<LocalStorageConfig>,
}

/// Type of storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendType {
    Local,
}

/// Local storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    pub path: PathBuf,
}

impl StorageConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            backend_type: StorageBackendType::Local,
            local: Some(LocalStorageConfig { path: path.into() }),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend_type: StorageBackendType::Local,
            local: None,
        }
    }
}

/// Create a storage backend from configuration
pub async fn create_backend(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>> {
    match config.backend_type {
        StorageBackendType::Local => {
            let local_config = config.local.as_ref().ok_or_else(|| {
                RetentionError::ConfigError("Missing local storage path".to_string())
            })?;
            Ok(Arc::new(LocalStorageBackend::new(local_config).await?))
        }
    }
}

/// Local filesystem storage backend
#[derive(Debug)]
pub struct LocalStorageBackend {
    config: LocalStorageConfig,
}

impl LocalStorageBackend {
    pub async fn new(config: &LocalStorageConfig) -> Result<Self> {
        let metadata = tokio::fs::metadata(&config.path).await.map_err(|e| {
            RetentionError::StorageError(format!(
                "Cannot access {}: {}",
                config.path.display(),
                e
            ))
        })?;
        if !metadata.is_dir() {
            return Err(RetentionError::StorageError(format!(
                "{} is not a directory",
                config.path.display()
            )));
        }

        Ok(Self {
            config: config.clone(),
        })
    }

    fn file_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(RetentionError::InvalidFileName(name.to_string()));
        }
        Ok(self.config.path.join(name))
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn list_files(&self) -> Result<FileListing> {
        let mut entries = tokio::fs::read_dir(&self.config.path).await?;
        let mut listing = FileListing::default();

        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks, a link to an archive counts as a file
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!("Skipping {}: {}", entry.path().display(), err);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => listing.files.push(name),
                Err(name) => listing.unreadable.push(name.to_string_lossy().into_owned()),
            }
        }

        listing.files.sort();
        listing.unreadable.sort();
        Ok(listing)
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name)?;
        tokio::fs::remove_file(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RetentionError::FileNotFound(name.to_string()),
            _ => RetentionError::IoError(e),
        })
    }

    fn describe(&self) -> String {
        format!("local:{}", self.config.path.display())
    }
}
