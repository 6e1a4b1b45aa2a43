// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "sqlite:./accred.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
	/// Milliseconds a writer waits on a concurrent `accred` process.
	pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
	pub fn busy_timeout(&self) -> Duration {
		Duration::from_millis(self.busy_timeout_ms)
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_DATABASE_URL.to_string(),
			busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
		}
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub busy_timeout_ms: Option<u64>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.busy_timeout_ms.is_some() {
			self.busy_timeout_ms = other.busy_timeout_ms;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self.url.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
			busy_timeout_ms: self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_url() {
		let config = DatabaseConfigLayer::default().finalize();
		assert_eq!(config.url, "sqlite:./accred.db");
		assert_eq!(config.busy_timeout(), Duration::from_secs(5));
	}

	#[test]
	fn test_custom_url() {
		let layer = DatabaseConfigLayer {
			url: Some("sqlite:/var/lib/accred/accred.db".to_string()),
			busy_timeout_ms: None,
		};
		assert_eq!(layer.finalize().url, "sqlite:/var/lib/accred/accred.db");
	}

	#[test]
	fn test_busy_timeout_merge() {
		let mut base = DatabaseConfigLayer {
			url: Some("sqlite:/a.db".to_string()),
			busy_timeout_ms: Some(250),
		};
		base.merge(DatabaseConfigLayer {
			url: None,
			busy_timeout_ms: Some(0),
		});
		let config = base.finalize();
		assert_eq!(config.url, "sqlite:/a.db");
		assert_eq!(config.busy_timeout(), Duration::ZERO);
	}
}
