// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use accred_core::ConfigurationError;

/// Failures reported by an [`AccountRepository`](crate::AccountRepository).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
	#[error("conflict: {0}")]
	Conflict(String),

	#[error("account not found: {0}")]
	NotFound(String),

	#[error("repository backend error: {0}")]
	Backend(String),
}

/// Errors that abort a provisioning attempt.
///
/// A denial is not an error; see [`ProvisioningOutcome`](crate::ProvisioningOutcome).
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("configuration error: {0}")]
	Configuration(#[from] ConfigurationError),

	#[error("repository error: {0}")]
	Repository(#[from] RepositoryError),
}
