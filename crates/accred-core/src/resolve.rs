// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mapping::GroupRoleMap;
use crate::types::{IdentityAssertion, RoleId};

/// Outcome of access resolution. Recomputed on every sync, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "access", content = "role", rename_all = "snake_case")]
pub enum ResolvedAccess {
	Role(RoleId),
	NoAccess,
}

impl ResolvedAccess {
	pub fn role(&self) -> Option<&RoleId> {
		match self {
			ResolvedAccess::Role(role) => Some(role),
			ResolvedAccess::NoAccess => None,
		}
	}

	pub fn into_role(self) -> Option<RoleId> {
		match self {
			ResolvedAccess::Role(role) => Some(role),
			ResolvedAccess::NoAccess => None,
		}
	}

	pub fn is_granted(&self) -> bool {
		matches!(self, ResolvedAccess::Role(_))
	}

	/// Fall back to the deployment's baseline role when nothing matched.
	/// A matched role is never replaced.
	pub fn or_default(self, default_role: Option<RoleId>) -> Self {
		match (self, default_role) {
			(ResolvedAccess::NoAccess, Some(role)) => ResolvedAccess::Role(role),
			(access, _) => access,
		}
	}
}

impl fmt::Display for ResolvedAccess {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResolvedAccess::Role(role) => write!(f, "role:{role}"),
			ResolvedAccess::NoAccess => write!(f, "no_access"),
		}
	}
}

/// Resolves the access level an assertion grants under `map`.
///
/// Entries are tried in declared order and the first one whose required
/// group is among the asserted groups wins. Inert entries (empty group) are
/// skipped. Group names are compared exactly, case included.
pub fn resolve(assertion: &IdentityAssertion, map: &GroupRoleMap) -> ResolvedAccess {
	map.entries()
		.iter()
		.filter(|entry| !entry.is_inert())
		.find(|entry| assertion.is_member_of(&entry.required_group))
		.map(|entry| ResolvedAccess::Role(entry.role.clone()))
		.unwrap_or(ResolvedAccess::NoAccess)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn role(name: &str) -> RoleId {
		RoleId::new(name).unwrap()
	}

	fn assertion_with(groups: &[&str]) -> IdentityAssertion {
		IdentityAssertion::new("jdoe", "123456").with_groups(groups.iter().copied())
	}

	#[test]
	fn test_first_match_wins_on_shared_group() {
		let map = GroupRoleMap::from_pairs(vec![(role("administrator"), "g1"), (role("editor"), "g1")]);
		let result = resolve(&assertion_with(&["g1"]), &map);
		assert_eq!(result, ResolvedAccess::Role(role("administrator")));
	}

	#[test]
	fn test_first_match_is_by_order_not_privilege() {
		let map = GroupRoleMap::from_pairs(vec![
			(role("subscriber"), "staff"),
			(role("administrator"), "admins"),
		]);
		let result = resolve(&assertion_with(&["admins", "staff"]), &map);
		assert_eq!(result, ResolvedAccess::Role(role("subscriber")));
	}

	#[test]
	fn test_no_match() {
		let map = GroupRoleMap::from_pairs(vec![(role("administrator"), "g1")]);
		assert_eq!(resolve(&assertion_with(&["x"]), &map), ResolvedAccess::NoAccess);
	}

	#[test]
	fn test_empty_groups_never_match() {
		let map = GroupRoleMap::from_pairs(vec![(role("administrator"), "g1"), (role("editor"), "")]);
		assert_eq!(resolve(&assertion_with(&[]), &map), ResolvedAccess::NoAccess);
	}

	#[test]
	fn test_inert_entry_skipped() {
		let map = GroupRoleMap::from_pairs(vec![(role("administrator"), ""), (role("editor"), "eds")]);
		let result = resolve(&assertion_with(&["eds", ""]), &map);
		assert_eq!(result, ResolvedAccess::Role(role("editor")));
	}

	#[test]
	fn test_match_is_case_sensitive() {
		let map = GroupRoleMap::from_pairs(vec![(role("administrator"), "Web-Admins")]);
		assert_eq!(
			resolve(&assertion_with(&["web-admins"]), &map),
			ResolvedAccess::NoAccess
		);
		assert_eq!(
			resolve(&assertion_with(&[" Web-Admins"]), &map),
			ResolvedAccess::NoAccess
		);
	}

	#[test]
	fn test_empty_map() {
		let map = GroupRoleMap::default();
		assert_eq!(resolve(&assertion_with(&["g1"]), &map), ResolvedAccess::NoAccess);
	}

	#[test]
	fn test_or_default() {
		let default = Some(role("subscriber"));
		assert_eq!(
			ResolvedAccess::NoAccess.or_default(default.clone()),
			ResolvedAccess::Role(role("subscriber"))
		);
		assert_eq!(
			ResolvedAccess::Role(role("editor")).or_default(default),
			ResolvedAccess::Role(role("editor"))
		);
		assert_eq!(ResolvedAccess::NoAccess.or_default(None), ResolvedAccess::NoAccess);
	}

	#[test]
	fn test_serialized_shape() {
		let json = serde_json::to_value(ResolvedAccess::Role(role("editor"))).unwrap();
		assert_eq!(json, serde_json::json!({"access": "role", "role": "editor"}));
		let json = serde_json::to_value(ResolvedAccess::NoAccess).unwrap();
		assert_eq!(json, serde_json::json!({"access": "no_access"}));
	}
}
