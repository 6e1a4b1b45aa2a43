// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Option table backing [`accred_settings::Settings`].
//!
//! Values are stored as JSON text keyed by `(scope, name)`.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{sqlite::SqlitePool, Row};

use accred_settings::{SettingsError, SettingsScope, SettingsStore};

use crate::error::DbError;

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
	async fn get_option(&self, scope: SettingsScope, name: &str) -> Result<Option<Value>, SettingsError> {
		Ok(self.get(scope, name).await?)
	}

	async fn set_option(&self, scope: SettingsScope, name: &str, value: Value) -> Result<(), SettingsError> {
		Ok(self.upsert(scope, name, &value).await?)
	}

	async fn delete_option(&self, scope: SettingsScope, name: &str) -> Result<bool, SettingsError> {
		Ok(self.delete(scope, name).await?)
	}
}

#[derive(Clone)]
pub struct SqliteSettingsStore {
	pool: SqlitePool,
}

impl SqliteSettingsStore {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(scope = %scope))]
	pub async fn get(&self, scope: SettingsScope, name: &str) -> Result<Option<Value>, DbError> {
		let row = sqlx::query("SELECT value FROM options WHERE scope = ? AND name = ?")
			.bind(scope.as_str())
			.bind(name)
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => {
				let text: String = row.get("value");
				Ok(Some(serde_json::from_str(&text)?))
			}
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self, value), fields(scope = %scope))]
	pub async fn upsert(&self, scope: SettingsScope, name: &str, value: &Value) -> Result<(), DbError> {
		let text = serde_json::to_string(value)?;

		sqlx::query(
			r#"
			INSERT INTO options (scope, name, value, updated_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT (scope, name) DO UPDATE SET
				value = excluded.value,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(scope.as_str())
		.bind(name)
		.bind(&text)
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(option = %name, "option saved");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(scope = %scope))]
	pub async fn delete(&self, scope: SettingsScope, name: &str) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM options WHERE scope = ? AND name = ?")
			.bind(scope.as_str())
			.bind(name)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use serde_json::json;

	#[tokio::test]
	async fn test_upsert_overwrites() {
		let store = SqliteSettingsStore::new(create_test_pool().await);
		store
			.upsert(SettingsScope::Site, "plugin:epfl-accred", &json!({"a": 1}))
			.await
			.unwrap();
		store
			.upsert(SettingsScope::Site, "plugin:epfl-accred", &json!({"a": 2}))
			.await
			.unwrap();

		assert_eq!(
			store.get(SettingsScope::Site, "plugin:epfl-accred").await.unwrap(),
			Some(json!({"a": 2}))
		);
	}

	#[tokio::test]
	async fn test_scopes_do_not_collide() {
		let store = SqliteSettingsStore::new(create_test_pool().await);
		store.upsert(SettingsScope::Site, "x", &json!("site")).await.unwrap();
		store.upsert(SettingsScope::Network, "x", &json!("network")).await.unwrap();

		assert_eq!(store.get(SettingsScope::Site, "x").await.unwrap(), Some(json!("site")));
		assert_eq!(
			store.get(SettingsScope::Network, "x").await.unwrap(),
			Some(json!("network"))
		);
	}

	#[tokio::test]
	async fn test_delete() {
		let store = SqliteSettingsStore::new(create_test_pool().await);
		store.upsert(SettingsScope::Site, "x", &json!(true)).await.unwrap();
		assert!(store.delete(SettingsScope::Site, "x").await.unwrap());
		assert!(!store.delete(SettingsScope::Site, "x").await.unwrap());
		assert_eq!(store.get(SettingsScope::Site, "x").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_corrupt_value_is_a_serialization_error() {
		let pool = create_test_pool().await;
		sqlx::query("INSERT INTO options (scope, name, value, updated_at) VALUES ('site', 'x', '{oops', '')")
			.execute(&pool)
			.await
			.unwrap();

		let store = SqliteSettingsStore::new(pool);
		let err = SettingsStore::get_option(&store, SettingsScope::Site, "x")
			.await
			.unwrap_err();
		assert!(matches!(err, SettingsError::Serialization(_)));
	}
}
