// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account repository for database operations.
//!
//! Accounts are keyed by login. The role column is nullable: a `NULL` role
//! is a revoked account, which is kept rather than deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use accred_core::{Account, AccountId, Profile, RoleId};
use accred_provisioning::{AccountRepository, RepositoryError};

use crate::error::DbError;

const ACCOUNT_COLUMNS: &str =
	"id, login, unique_id, email, first_name, last_name, role, created_at, updated_at";

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
	async fn find_by_login(&self, login: &str) -> Result<Option<Account>, RepositoryError> {
		Ok(self.get_account_by_login(login).await?)
	}

	async fn create(&self, profile: &Profile, role: &RoleId) -> Result<Account, RepositoryError> {
		Ok(self.create_account(profile, Some(role)).await?)
	}

	async fn update(
		&self,
		id: &AccountId,
		profile: &Profile,
		role: Option<&RoleId>,
	) -> Result<Account, RepositoryError> {
		Ok(self.update_account(id, profile, role).await?)
	}
}

/// Repository for account database operations.
#[derive(Clone)]
pub struct SqliteAccountRepository {
	pool: SqlitePool,
}

impl SqliteAccountRepository {
	/// Create a new account repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get an account by login. Comparison is exact.
	#[tracing::instrument(skip(self))]
	pub async fn get_account_by_login(&self, login: &str) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE login = ?"
		))
		.bind(login)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(account_id = %id))]
	pub async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	/// All accounts, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_accounts(&self) -> Result<Vec<Account>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at, login"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_account_row).collect()
	}

	/// Create an account.
	///
	/// # Errors
	/// `DbError::Conflict` if the login is already taken.
	#[tracing::instrument(skip(self, profile), fields(login = %profile.login))]
	pub async fn create_account(&self, profile: &Profile, role: Option<&RoleId>) -> Result<Account, DbError> {
		let id = AccountId::generate();
		let now = Utc::now();

		sqlx::query(
			r#"
			INSERT INTO accounts (
				id, login, unique_id, email, first_name, last_name, role, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(&profile.login)
		.bind(&profile.unique_id)
		.bind(&profile.email)
		.bind(&profile.first_name)
		.bind(&profile.last_name)
		.bind(role.map(RoleId::as_str))
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("Login {} already exists", profile.login))
			}
			_ => DbError::Sqlx(e),
		})?;

		tracing::debug!(account_id = %id, "account created");
		Ok(Account {
			id,
			profile: profile.clone(),
			role: role.cloned(),
			created_at: now,
			updated_at: now,
		})
	}

	/// Overwrite profile and role of an account.
	///
	/// # Errors
	/// `DbError::NotFound` if no account has this id, `DbError::Conflict` if
	/// the new login belongs to another account.
	#[tracing::instrument(skip(self, profile), fields(account_id = %id))]
	pub async fn update_account(
		&self,
		id: &AccountId,
		profile: &Profile,
		role: Option<&RoleId>,
	) -> Result<Account, DbError> {
		let now = Utc::now();

		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET login = ?, unique_id = ?, email = ?, first_name = ?, last_name = ?,
			    role = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&profile.login)
		.bind(&profile.unique_id)
		.bind(&profile.email)
		.bind(&profile.first_name)
		.bind(&profile.last_name)
		.bind(role.map(RoleId::as_str))
		.bind(now.to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("Login {} belongs to another account", profile.login))
			}
			_ => DbError::Sqlx(e),
		})?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Account {id}")));
		}

		self
			.get_account_by_id(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("Account {id}")))
	}
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

fn parse_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<Account, DbError> {
	let id_str: String = row.get("id");
	let role_str: Option<String> = row.get("role");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let id = Uuid::parse_str(&id_str)
		.map_err(|e| DbError::Internal(format!("Invalid account id UUID: {e}")))?;
	let role = role_str
		.map(|s| RoleId::new(s).map_err(|e| DbError::Internal(format!("Invalid role: {e}"))))
		.transpose()?;

	Ok(Account {
		id: AccountId::new(id),
		profile: Profile {
			login: row.get("login"),
			unique_id: row.get("unique_id"),
			email: row.get("email"),
			first_name: row.get("first_name"),
			last_name: row.get("last_name"),
		},
		role,
		created_at: parse_timestamp(&created_at_str, "created_at")?,
		updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
	})
}
