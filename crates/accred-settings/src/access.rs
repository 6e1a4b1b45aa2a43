// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access configuration: the role → group mapping and the default role.
//!
//! Settings layout (one object per scope, see [`crate::settings`]):
//!
//! ```json
//! {
//!   "administrator_group": "web-admins",
//!   "editor_group": "web-editors",
//!   "author_group": "",
//!   "default_role": "subscriber"
//! }
//! ```
//!
//! The mapping is built by walking the [`RoleCatalog`] in order, so the
//! precedence is the catalog order and never the key order of the stored
//! object.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use accred_core::{ConfigurationError, GroupRoleMap, RoleCatalog, RoleId};

use crate::settings::{merge_with_defaults, Settings, SettingsValues};

/// Settings key holding the baseline role.
pub const DEFAULT_ROLE_KEY: &str = "default_role";

/// Settings key holding the required group of `role`.
pub fn group_key(role: &RoleId) -> String {
	format!("{role}_group")
}

/// Everything the provisioning engine needs from configuration for one sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
	pub mapping: GroupRoleMap,
	pub default_role: Option<RoleId>,
}

/// Read access to the current access configuration.
///
/// Implementations must return the latest configuration on every call.
#[async_trait]
pub trait AccessConfigReader: Send + Sync {
	async fn role_group_mapping(&self) -> Result<GroupRoleMap, ConfigurationError>;

	/// `None` means no baseline role is configured.
	async fn default_role(&self) -> Result<Option<RoleId>, ConfigurationError>;

	/// Mapping and default role together.
	async fn access_policy(&self) -> Result<AccessPolicy, ConfigurationError> {
		Ok(AccessPolicy {
			mapping: self.role_group_mapping().await?,
			default_role: self.default_role().await?,
		})
	}
}

/// Access configuration stored in [`Settings`].
#[derive(Clone)]
pub struct SettingsAccessConfig {
	settings: Settings,
	catalog: RoleCatalog,
}

impl SettingsAccessConfig {
	pub fn new(settings: Settings, catalog: RoleCatalog) -> Self {
		Self { settings, catalog }
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn catalog(&self) -> &RoleCatalog {
		&self.catalog
	}

	fn defaults(&self) -> Vec<(String, Value)> {
		let mut defaults: Vec<(String, Value)> = self
			.catalog
			.iter()
			.map(|role| (group_key(role), Value::String(String::new())))
			.collect();
		defaults.push((DEFAULT_ROLE_KEY.to_string(), Value::Null));
		defaults
	}

	async fn load(&self) -> Result<SettingsValues, ConfigurationError> {
		let option = self.settings.active_option_name();
		let stored = self
			.settings
			.get()
			.await?
			.ok_or_else(|| ConfigurationError::MissingMapping(option.clone()))?;

		let object: Map<String, Value> = match stored {
			Value::Object(map) => map,
			_ => {
				return Err(ConfigurationError::Malformed {
					key: option,
					message: "expected an object".to_string(),
				})
			}
		};

		let defaults = self.defaults();
		for key in object.keys() {
			if !defaults.iter().any(|(k, _)| k == key) {
				debug!(option = %option, key = %key, "ignoring unknown settings key");
			}
		}

		Ok(merge_with_defaults(&defaults, Some(&object)))
	}

	fn mapping_from(&self, values: &SettingsValues) -> Result<GroupRoleMap, ConfigurationError> {
		let mut pairs = Vec::with_capacity(self.catalog.len());
		for role in self.catalog.iter() {
			let key = group_key(role);
			let group = match values.get(&key) {
				None | Some(Value::Null) => String::new(),
				Some(Value::String(group)) => group.clone(),
				Some(other) => {
					return Err(ConfigurationError::Malformed {
						key,
						message: format!("expected a group name, got {other}"),
					})
				}
			};
			pairs.push((role.clone(), group));
		}

		let mapping = GroupRoleMap::from_pairs(pairs);
		for duplicate in mapping.duplicate_groups() {
			let roles: Vec<&str> = duplicate.roles.iter().map(RoleId::as_str).collect();
			warn!(
				group = %duplicate.group,
				roles = ?roles,
				winner = %duplicate.roles[0],
				"group is mapped to several roles; only the first one is ever granted"
			);
		}
		Ok(mapping)
	}

	fn default_role_from(&self, values: &SettingsValues) -> Result<Option<RoleId>, ConfigurationError> {
		match values.get(DEFAULT_ROLE_KEY) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(name)) if name.is_empty() => Ok(None),
			Some(Value::String(name)) => self.catalog.get(name).cloned().map(Some),
			Some(other) => Err(ConfigurationError::Malformed {
				key: DEFAULT_ROLE_KEY.to_string(),
				message: format!("expected a role name, got {other}"),
			}),
		}
	}

	/// Assign `group` to `role`. An empty group makes the role inert.
	pub async fn set_role_group(&self, role: &str, group: &str) -> Result<(), ConfigurationError> {
		let role = self.catalog.get(role)?;
		self
			.settings
			.set_field(&group_key(role), Value::String(group.to_string()))
			.await?;
		debug!(role = %role, group = %group, "role group updated");
		Ok(())
	}

	/// Set or clear the baseline role.
	pub async fn set_default_role(&self, role: Option<&str>) -> Result<(), ConfigurationError> {
		let value = match role {
			Some(name) => Value::String(self.catalog.get(name)?.to_string()),
			None => Value::Null,
		};
		self.settings.set_field(DEFAULT_ROLE_KEY, value).await?;
		Ok(())
	}
}

#[async_trait]
impl AccessConfigReader for SettingsAccessConfig {
	async fn role_group_mapping(&self) -> Result<GroupRoleMap, ConfigurationError> {
		let values = self.load().await?;
		self.mapping_from(&values)
	}

	async fn default_role(&self) -> Result<Option<RoleId>, ConfigurationError> {
		let values = self.load().await?;
		self.default_role_from(&values)
	}

	/// Reads the settings object once so mapping and default role come from
	/// the same snapshot.
	async fn access_policy(&self) -> Result<AccessPolicy, ConfigurationError> {
		let values = self.load().await?;
		Ok(AccessPolicy {
			mapping: self.mapping_from(&values)?,
			default_role: self.default_role_from(&values)?,
		})
	}
}

/// Fixed access configuration, for hosts that keep the mapping outside of
/// a settings store.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessConfig {
	policy: AccessPolicy,
}

impl StaticAccessConfig {
	pub fn new(mapping: GroupRoleMap, default_role: Option<RoleId>) -> Self {
		Self {
			policy: AccessPolicy {
				mapping,
				default_role,
			},
		}
	}
}

#[async_trait]
impl AccessConfigReader for StaticAccessConfig {
	async fn role_group_mapping(&self) -> Result<GroupRoleMap, ConfigurationError> {
		Ok(self.policy.mapping.clone())
	}

	async fn default_role(&self) -> Result<Option<RoleId>, ConfigurationError> {
		Ok(self.policy.default_role.clone())
	}
}
