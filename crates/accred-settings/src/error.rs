// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use accred_core::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("settings backend error: {0}")]
	Backend(String),

	#[error("option {0} is not an object")]
	NotAnObject(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl From<SettingsError> for ConfigurationError {
	fn from(e: SettingsError) -> Self {
		match e {
			SettingsError::NotAnObject(name) => ConfigurationError::Malformed {
				key: name,
				message: "expected an object".to_string(),
			},
			other => ConfigurationError::Store(other.to_string()),
		}
	}
}
