// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors raised while reading or interpreting the access configuration.
///
/// These always propagate to the caller. No default mapping is ever guessed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
	#[error("role/group mapping is not configured (option {0})")]
	MissingMapping(String),

	#[error("malformed configuration for {key}: {message}")]
	Malformed { key: String, message: String },

	#[error("unknown role: {0}")]
	UnknownRole(String),

	#[error("invalid role identifier '{0}'")]
	InvalidRoleId(String),

	#[error("settings store error: {0}")]
	Store(String),
}
