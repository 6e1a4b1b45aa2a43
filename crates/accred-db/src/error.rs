// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use accred_provisioning::RepositoryError;
use accred_settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for RepositoryError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(what) => RepositoryError::NotFound(what),
			DbError::Conflict(what) => RepositoryError::Conflict(what),
			other => RepositoryError::Backend(other.to_string()),
		}
	}
}

impl From<DbError> for SettingsError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::Serialization(e) => SettingsError::Serialization(e),
			other => SettingsError::Backend(other.to_string()),
		}
	}
}
