// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use accred_core::{Account, AccountId, Profile, RoleId};

use crate::error::RepositoryError;

/// Storage for local accounts, keyed by login.
///
/// `create` and `update` must be atomic: a failed call leaves no partial
/// record behind.
#[async_trait]
pub trait AccountRepository: Send + Sync {
	async fn find_by_login(&self, login: &str) -> Result<Option<Account>, RepositoryError>;

	/// Fails with [`RepositoryError::Conflict`] if the login is taken.
	async fn create(&self, profile: &Profile, role: &RoleId) -> Result<Account, RepositoryError>;

	/// Overwrites profile and role. `None` clears the role.
	///
	/// Fails with [`RepositoryError::NotFound`] for an unknown id.
	async fn update(
		&self,
		id: &AccountId,
		profile: &Profile,
		role: Option<&RoleId>,
	) -> Result<Account, RepositoryError>;
}
