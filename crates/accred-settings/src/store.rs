// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::SettingsError;

/// Which option table a read or write goes to.
///
/// Single-tenant deployments use `Site`. A deployment that activates the
/// integration once for a whole multi-site network uses `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsScope {
	Site,
	Network,
}

impl SettingsScope {
	pub fn as_str(&self) -> &'static str {
		match self {
			SettingsScope::Site => "site",
			SettingsScope::Network => "network",
		}
	}
}

impl fmt::Display for SettingsScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
	async fn get_option(&self, scope: SettingsScope, name: &str)
		-> Result<Option<Value>, SettingsError>;
	async fn set_option(
		&self,
		scope: SettingsScope,
		name: &str,
		value: Value,
	) -> Result<(), SettingsError>;
	/// Returns true if an option was removed.
	async fn delete_option(&self, scope: SettingsScope, name: &str) -> Result<bool, SettingsError>;
}

/// Process-local settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
	options: RwLock<HashMap<(SettingsScope, String), Value>>,
}

impl MemorySettingsStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
	async fn get_option(
		&self,
		scope: SettingsScope,
		name: &str,
	) -> Result<Option<Value>, SettingsError> {
		let options = self.options.read().await;
		Ok(options.get(&(scope, name.to_string())).cloned())
	}

	async fn set_option(
		&self,
		scope: SettingsScope,
		name: &str,
		value: Value,
	) -> Result<(), SettingsError> {
		let mut options = self.options.write().await;
		options.insert((scope, name.to_string()), value);
		Ok(())
	}

	async fn delete_option(&self, scope: SettingsScope, name: &str) -> Result<bool, SettingsError> {
		let mut options = self.options.write().await;
		Ok(options.remove(&(scope, name.to_string())).is_some())
	}
}
