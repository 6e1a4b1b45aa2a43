// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings store binding: plugin slug, scope and role catalog.

use serde::Deserialize;

use accred_core::{RoleCatalog, RoleId};
use accred_settings::SettingsScope;

use crate::error::ConfigError;

pub const DEFAULT_SLUG: &str = "epfl-accred";

/// Settings configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct SettingsConfig {
	/// Option names are derived from it: `plugin:<slug>`.
	pub slug: String,
	/// Read the network-wide settings object instead of the site one.
	pub network: bool,
	pub roles: RoleCatalog,
}

impl SettingsConfig {
	pub fn scope(&self) -> SettingsScope {
		if self.network {
			SettingsScope::Network
		} else {
			SettingsScope::Site
		}
	}
}

impl Default for SettingsConfig {
	fn default() -> Self {
		Self {
			slug: DEFAULT_SLUG.to_string(),
			network: false,
			roles: RoleCatalog::default(),
		}
	}
}

/// Settings configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsConfigLayer {
	#[serde(default)]
	pub slug: Option<String>,
	#[serde(default)]
	pub network: Option<bool>,
	/// Role names in precedence order.
	#[serde(default)]
	pub roles: Option<Vec<String>>,
}

impl SettingsConfigLayer {
	pub fn merge(&mut self, other: SettingsConfigLayer) {
		if other.slug.is_some() {
			self.slug = other.slug;
		}
		if other.network.is_some() {
			self.network = other.network;
		}
		if other.roles.is_some() {
			self.roles = other.roles;
		}
	}

	pub fn finalize(self) -> Result<SettingsConfig, ConfigError> {
		let slug = self.slug.unwrap_or_else(|| DEFAULT_SLUG.to_string());
		if slug.trim().is_empty() {
			return Err(ConfigError::Validation("settings.slug must not be empty".to_string()));
		}

		let roles = match self.roles {
			Some(names) => {
				let roles = names
					.into_iter()
					.map(RoleId::new)
					.collect::<Result<Vec<_>, _>>()
					.map_err(|e| ConfigError::InvalidValue {
						key: "settings.roles".to_string(),
						message: e.to_string(),
					})?;
				RoleCatalog::new(roles).map_err(|e| ConfigError::Validation(e.to_string()))?
			}
			None => RoleCatalog::default(),
		};

		Ok(SettingsConfig {
			slug,
			network: self.network.unwrap_or(false),
			roles,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = SettingsConfigLayer::default().finalize().unwrap();
		assert_eq!(config.slug, "epfl-accred");
		assert_eq!(config.scope(), SettingsScope::Site);
		assert_eq!(config.roles, RoleCatalog::default());
	}

	#[test]
	fn test_custom_roles_keep_order() {
		let layer = SettingsConfigLayer {
			roles: Some(vec!["member".to_string(), "owner".to_string()]),
			network: Some(true),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		let names: Vec<&str> = config.roles.iter().map(RoleId::as_str).collect();
		assert_eq!(names, vec!["member", "owner"]);
		assert_eq!(config.scope(), SettingsScope::Network);
	}

	#[test]
	fn test_rejects_bad_roles() {
		let empty = SettingsConfigLayer {
			roles: Some(vec![]),
			..Default::default()
		};
		assert!(matches!(empty.finalize(), Err(ConfigError::Validation(_))));

		let invalid = SettingsConfigLayer {
			roles: Some(vec!["site admin".to_string()]),
			..Default::default()
		};
		assert!(matches!(invalid.finalize(), Err(ConfigError::InvalidValue { .. })));

		let duplicate = SettingsConfigLayer {
			roles: Some(vec!["editor".to_string(), "editor".to_string()]),
			..Default::default()
		};
		assert!(matches!(duplicate.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_rejects_blank_slug() {
		let layer = SettingsConfigLayer {
			slug: Some("  ".to_string()),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}
}
