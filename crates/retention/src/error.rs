/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Error types for retention operations

use thiserror::Error;

/// Result type for retention operations
pub type Result<T> = std::result::Result<T, RetentionError>;

/// Retention-specific errors
///
/// Note that an unparsable date in a file name is *not* an error: the
/// predicate fails open and reports the file as indeterminate instead.
#[derive(Error, Debug)]
pub enum RetentionError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}
