// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use accred_core::{Account, AccountId, Profile, RoleId};

use crate::error::RepositoryError;
use crate::repository::AccountRepository;

/// Process-local account repository.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
	accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.accounts.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.accounts.read().await.is_empty()
	}

	pub async fn accounts(&self) -> Vec<Account> {
		let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
		accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
		accounts
	}
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
	async fn find_by_login(&self, login: &str) -> Result<Option<Account>, RepositoryError> {
		let accounts = self.accounts.read().await;
		Ok(accounts.values().find(|a| a.login() == login).cloned())
	}

	async fn create(&self, profile: &Profile, role: &RoleId) -> Result<Account, RepositoryError> {
		let mut accounts = self.accounts.write().await;
		if accounts.values().any(|a| a.login() == profile.login) {
			return Err(RepositoryError::Conflict(format!(
				"login {} already exists",
				profile.login
			)));
		}

		let now = Utc::now();
		let account = Account {
			id: AccountId::generate(),
			profile: profile.clone(),
			role: Some(role.clone()),
			created_at: now,
			updated_at: now,
		};
		accounts.insert(account.id, account.clone());
		Ok(account)
	}

	async fn update(
		&self,
		id: &AccountId,
		profile: &Profile,
		role: Option<&RoleId>,
	) -> Result<Account, RepositoryError> {
		let mut accounts = self.accounts.write().await;
		if accounts
			.values()
			.any(|a| a.id != *id && a.login() == profile.login)
		{
			return Err(RepositoryError::Conflict(format!(
				"login {} belongs to another account",
				profile.login
			)));
		}

		let account = accounts
			.get_mut(id)
			.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
		account.profile = profile.clone();
		account.role = role.cloned();
		account.updated_at = Utc::now();
		Ok(account.clone())
	}
}
