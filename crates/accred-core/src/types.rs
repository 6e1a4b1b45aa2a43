// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for access provisioning.
//!
//! - **[`RoleId`]**: a deployment-defined role identifier. Roles are owned by
//!   the host application, so this is a validated string rather than an enum.
//! - **[`IdentityAssertion`]**: one login event from the identity provider.
//! - **[`Profile`]**: the profile fields copied verbatim from an assertion.
//! - **[`Account`]**: the local account record, owned by the repository.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigurationError;

// =============================================================================
// Account ID
// =============================================================================

/// Unique identifier for a local account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
	/// Create a new ID from a UUID.
	pub fn new(id: Uuid) -> Self {
		Self(id)
	}

	/// Generate a new random ID.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Get the inner UUID value.
	pub fn into_inner(self) -> Uuid {
		self.0
	}

	/// Get a reference to the inner UUID.
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<Uuid> for AccountId {
	fn from(id: Uuid) -> Self {
		Self(id)
	}
}

impl From<AccountId> for Uuid {
	fn from(id: AccountId) -> Self {
		id.0
	}
}

// =============================================================================
// Roles
// =============================================================================

/// A role recognized by the host application (e.g. `administrator`).
///
/// Valid identifiers are non-empty and made of ASCII letters, digits, `_` and
/// `-`. Comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
	pub fn new(id: impl Into<String>) -> Result<Self, ConfigurationError> {
		let id = id.into();
		let valid = !id.is_empty()
			&& id
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
		if !valid {
			return Err(ConfigurationError::InvalidRoleId(id));
		}
		Ok(Self(id))
	}

	/// For identifiers known to be valid at compile time.
	pub(crate) fn from_static(id: &'static str) -> Self {
		Self(id.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RoleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for RoleId {
	type Err = ConfigurationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for RoleId {
	type Error = ConfigurationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<RoleId> for String {
	fn from(role: RoleId) -> Self {
		role.0
	}
}

impl AsRef<str> for RoleId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

// =============================================================================
// Identity assertion
// =============================================================================

/// An authenticated login event from the upstream identity provider.
///
/// Immutable once received; one assertion drives exactly one sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertion {
	/// External username, stable across logins. Accounts are keyed by it.
	pub login: String,

	/// Stable per-person identifier, distinct from `login`.
	pub unique_id: String,

	#[serde(default)]
	pub email: String,

	#[serde(default)]
	pub first_name: String,

	#[serde(default)]
	pub last_name: String,

	/// Group names the identity provider asserts membership in.
	#[serde(default)]
	pub groups: BTreeSet<String>,
}

impl IdentityAssertion {
	pub fn new(login: impl Into<String>, unique_id: impl Into<String>) -> Self {
		Self {
			login: login.into(),
			unique_id: unique_id.into(),
			email: String::new(),
			first_name: String::new(),
			last_name: String::new(),
			groups: BTreeSet::new(),
		}
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = email.into();
		self
	}

	pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
		self.first_name = first_name.into();
		self.last_name = last_name.into();
		self
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.groups.insert(group.into());
		self
	}

	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups.extend(groups.into_iter().map(Into::into));
		self
	}

	/// Exact, case-sensitive membership test.
	pub fn is_member_of(&self, group: &str) -> bool {
		self.groups.contains(group)
	}

	/// Profile fields to store on the account, copied without transformation.
	pub fn profile(&self) -> Profile {
		Profile {
			login: self.login.clone(),
			unique_id: self.unique_id.clone(),
			email: self.email.clone(),
			first_name: self.first_name.clone(),
			last_name: self.last_name.clone(),
		}
	}
}

// =============================================================================
// Accounts
// =============================================================================

/// Profile fields refreshed on every sync. The identity assertion is always
/// the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub login: String,
	pub unique_id: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
}

/// A local account as stored by the account repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub id: AccountId,
	pub profile: Profile,
	/// Currently assigned role. `None` means access was revoked.
	pub role: Option<RoleId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Account {
	pub fn login(&self) -> &str {
		&self.profile.login
	}

	pub fn has_role(&self) -> bool {
		self.role.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_id_accepts_slugs() {
		assert!(RoleId::new("administrator").is_ok());
		assert!(RoleId::new("shop_manager").is_ok());
		assert!(RoleId::new("level-2").is_ok());
	}

	#[test]
	fn test_role_id_rejects_empty_and_spaces() {
		assert_eq!(
			RoleId::new(""),
			Err(ConfigurationError::InvalidRoleId(String::new()))
		);
		assert!(RoleId::new("site admin").is_err());
		assert!(RoleId::new("admin\n").is_err());
	}

	#[test]
	fn test_role_id_serde_validates() {
		let role: RoleId = serde_json::from_str("\"editor\"").unwrap();
		assert_eq!(role.as_str(), "editor");
		assert!(serde_json::from_str::<RoleId>("\"\"").is_err());
	}

	#[test]
	fn test_assertion_deserializes_camel_case() {
		let json = r#"{
			"login": "jdoe",
			"uniqueId": "123456",
			"email": "jdoe@example.com",
			"firstName": "Jane",
			"lastName": "Doe",
			"groups": ["web-admins", "staff"]
		}"#;
		let assertion: IdentityAssertion = serde_json::from_str(json).unwrap();
		assert_eq!(assertion.login, "jdoe");
		assert_eq!(assertion.unique_id, "123456");
		assert_eq!(assertion.first_name, "Jane");
		assert!(assertion.is_member_of("web-admins"));
		assert!(!assertion.is_member_of("Web-Admins"));
	}

	#[test]
	fn test_assertion_groups_default_to_empty() {
		let assertion: IdentityAssertion =
			serde_json::from_str(r#"{"login": "jdoe", "uniqueId": "1"}"#).unwrap();
		assert!(assertion.groups.is_empty());
		assert_eq!(assertion.email, "");
	}

	#[test]
	fn test_profile_copies_fields_verbatim() {
		let assertion = IdentityAssertion::new("jdoe", "123456")
			.with_email("  JDoe@Example.com ")
			.with_name("Jane", "Doe");
		let profile = assertion.profile();
		assert_eq!(profile.login, "jdoe");
		assert_eq!(profile.unique_id, "123456");
		assert_eq!(profile.email, "  JDoe@Example.com ");
		assert_eq!(profile.first_name, "Jane");
		assert_eq!(profile.last_name, "Doe");
	}
}
