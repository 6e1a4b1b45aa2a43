// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role catalogs and role → group mappings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::types::RoleId;

/// Roles a stock deployment knows about, highest privilege first.
const DEFAULT_ROLES: &[&str] = &[
	"administrator",
	"editor",
	"author",
	"contributor",
	"subscriber",
];

/// The ordered set of roles defined by the host application.
///
/// The order is the precedence order used when building a [`GroupRoleMap`]
/// from settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoleId>", into = "Vec<RoleId>")]
pub struct RoleCatalog {
	roles: Vec<RoleId>,
}

impl RoleCatalog {
	/// Build a catalog, rejecting empty lists and duplicate roles.
	pub fn new(roles: Vec<RoleId>) -> Result<Self, ConfigurationError> {
		if roles.is_empty() {
			return Err(ConfigurationError::Malformed {
				key: "roles".to_string(),
				message: "role catalog must not be empty".to_string(),
			});
		}
		for (i, role) in roles.iter().enumerate() {
			if roles[..i].contains(role) {
				return Err(ConfigurationError::Malformed {
					key: "roles".to_string(),
					message: format!("duplicate role '{role}'"),
				});
			}
		}
		Ok(Self { roles })
	}

	/// Parse a comma separated list such as `"administrator,editor"`.
	pub fn parse_list(list: &str) -> Result<Self, ConfigurationError> {
		let roles = list
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(RoleId::new)
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(roles)
	}

	pub fn roles(&self) -> &[RoleId] {
		&self.roles
	}

	pub fn iter(&self) -> impl Iterator<Item = &RoleId> {
		self.roles.iter()
	}

	pub fn contains(&self, role: &RoleId) -> bool {
		self.roles.contains(role)
	}

	/// Look up a role by name, failing with [`ConfigurationError::UnknownRole`].
	pub fn get(&self, name: &str) -> Result<&RoleId, ConfigurationError> {
		self
			.roles
			.iter()
			.find(|r| r.as_str() == name)
			.ok_or_else(|| ConfigurationError::UnknownRole(name.to_string()))
	}

	pub fn len(&self) -> usize {
		self.roles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.roles.is_empty()
	}
}

impl TryFrom<Vec<RoleId>> for RoleCatalog {
	type Error = ConfigurationError;

	fn try_from(roles: Vec<RoleId>) -> Result<Self, Self::Error> {
		Self::new(roles)
	}
}

impl From<RoleCatalog> for Vec<RoleId> {
	fn from(catalog: RoleCatalog) -> Self {
		catalog.roles
	}
}

impl Default for RoleCatalog {
	fn default() -> Self {
		Self {
			roles: DEFAULT_ROLES.iter().copied().map(RoleId::from_static).collect(),
		}
	}
}

/// One row of the mapping: members of `required_group` get `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoleEntry {
	pub role: RoleId,
	/// Empty means the role is currently not assigned to any group.
	pub required_group: String,
}

impl GroupRoleEntry {
	pub fn new(role: RoleId, required_group: impl Into<String>) -> Self {
		Self {
			role,
			required_group: required_group.into(),
		}
	}

	/// Inert entries never match any assertion.
	pub fn is_inert(&self) -> bool {
		self.required_group.is_empty()
	}
}

/// A group name claimed by more than one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
	pub group: String,
	/// Roles in mapping order; the first one is the one that wins.
	pub roles: Vec<RoleId>,
}

/// Ordered role → required group table.
///
/// Entries keep the order they were declared in. Nothing here sorts,
/// deduplicates or validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoleMap {
	entries: Vec<GroupRoleEntry>,
}

impl GroupRoleMap {
	pub fn new(entries: Vec<GroupRoleEntry>) -> Self {
		Self { entries }
	}

	pub fn from_pairs<I, G>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (RoleId, G)>,
		G: Into<String>,
	{
		Self {
			entries: pairs
				.into_iter()
				.map(|(role, group)| GroupRoleEntry::new(role, group))
				.collect(),
		}
	}

	pub fn entries(&self) -> &[GroupRoleEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Required group of the first entry for `role`, if that entry is not inert.
	pub fn group_for(&self, role: &RoleId) -> Option<&str> {
		self
			.entries
			.iter()
			.find(|e| &e.role == role)
			.filter(|e| !e.is_inert())
			.map(|e| e.required_group.as_str())
	}

	/// Groups assigned to more than one role.
	///
	/// Resolution keeps first-match semantics regardless; this only exists so
	/// operators can be told about the overlap.
	pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
		let mut duplicates: Vec<DuplicateGroup> = Vec::new();
		for (i, entry) in self.entries.iter().enumerate() {
			if entry.is_inert() || duplicates.iter().any(|d| d.group == entry.required_group) {
				continue;
			}
			let roles: Vec<RoleId> = self.entries[i..]
				.iter()
				.filter(|e| e.required_group == entry.required_group)
				.map(|e| e.role.clone())
				.collect();
			if roles.len() > 1 {
				duplicates.push(DuplicateGroup {
					group: entry.required_group.clone(),
					roles,
				});
			}
		}
		duplicates
	}
}
