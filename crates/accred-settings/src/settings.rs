// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Slug-scoped settings objects.
//!
//! All settings of one integration live in a single JSON object stored under
//! one option name:
//!
//! | scope | option name |
//! |-------|-------------|
//! | site | `plugin:<slug>` |
//! | network | `plugin:<slug>:network` |
//!
//! The option group used by admin forms is `plugin:<slug>:group`.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SettingsError;
use crate::store::{SettingsScope, SettingsStore};

/// Settings values in the order of the defaults they were merged with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsValues(Vec<(String, Value)>);

impl SettingsValues {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(k, _)| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Merge a stored settings object with `defaults`.
///
/// Keys present in `defaults` but missing from `stored` take their default
/// value. Stored keys that `defaults` does not name are discarded. The result
/// follows the order of `defaults`.
pub fn merge_with_defaults(defaults: &[(String, Value)], stored: Option<&Map<String, Value>>) -> SettingsValues {
	SettingsValues(
		defaults
			.iter()
			.map(|(key, default)| {
				let value = stored
					.and_then(|s| s.get(key))
					.cloned()
					.unwrap_or_else(|| default.clone());
				(key.clone(), value)
			})
			.collect(),
	)
}

/// Settings of one integration, bound to a store and a scope.
#[derive(Clone)]
pub struct Settings {
	store: Arc<dyn SettingsStore>,
	slug: String,
	scope: SettingsScope,
}

impl Settings {
	pub fn new(store: Arc<dyn SettingsStore>, slug: impl Into<String>, scope: SettingsScope) -> Self {
		Self {
			store,
			slug: slug.into(),
			scope,
		}
	}

	pub fn slug(&self) -> &str {
		&self.slug
	}

	pub fn scope(&self) -> SettingsScope {
		self.scope
	}

	pub fn is_network(&self) -> bool {
		self.scope == SettingsScope::Network
	}

	pub fn option_name(&self) -> String {
		format!("plugin:{}", self.slug)
	}

	pub fn network_option_name(&self) -> String {
		format!("plugin:{}:network", self.slug)
	}

	pub fn option_group(&self) -> String {
		format!("plugin:{}:group", self.slug)
	}

	/// Name of the settings object for the active scope.
	pub fn active_option_name(&self) -> String {
		match self.scope {
			SettingsScope::Site => self.option_name(),
			SettingsScope::Network => self.network_option_name(),
		}
	}

	/// The whole settings object for the active scope, if one was ever saved.
	pub async fn get(&self) -> Result<Option<Value>, SettingsError> {
		self
			.store
			.get_option(self.scope, &self.active_option_name())
			.await
	}

	/// Like [`Settings::get`], merged with `defaults`.
	///
	/// A missing settings object yields the defaults unchanged. A stored value
	/// that is not a JSON object is an error.
	pub async fn get_with_defaults(
		&self,
		defaults: &[(String, Value)],
	) -> Result<SettingsValues, SettingsError> {
		match self.get().await? {
			None => Ok(merge_with_defaults(defaults, None)),
			Some(Value::Object(map)) => Ok(merge_with_defaults(defaults, Some(&map))),
			Some(_) => Err(SettingsError::NotAnObject(self.active_option_name())),
		}
	}

	/// Read an arbitrary option from the active scope's table.
	pub async fn get_option(&self, name: &str, default: Value) -> Result<Value, SettingsError> {
		Ok(self
			.store
			.get_option(self.scope, name)
			.await?
			.unwrap_or(default))
	}

	/// Replace the whole settings object.
	pub async fn set(&self, value: Map<String, Value>) -> Result<(), SettingsError> {
		let name = self.active_option_name();
		self
			.store
			.set_option(self.scope, &name, Value::Object(value))
			.await?;
		debug!(option = %name, scope = %self.scope, "settings saved");
		Ok(())
	}

	/// Set one field of the settings object, creating the object if needed.
	pub async fn set_field(&self, key: &str, value: Value) -> Result<(), SettingsError> {
		let mut object = match self.get().await? {
			None => Map::new(),
			Some(Value::Object(map)) => map,
			Some(_) => return Err(SettingsError::NotAnObject(self.active_option_name())),
		};
		object.insert(key.to_string(), value);
		self.set(object).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::MemorySettingsStore;
	use serde_json::json;

	fn settings(scope: SettingsScope) -> (Arc<MemorySettingsStore>, Settings) {
		let store = Arc::new(MemorySettingsStore::new());
		let settings = Settings::new(store.clone(), "epfl-accred", scope);
		(store, settings)
	}

	fn defaults() -> Vec<(String, Value)> {
		vec![
			("number".to_string(), json!(500)),
			("color".to_string(), json!("blue")),
			("long".to_string(), json!("")),
		]
	}

	#[test]
	fn test_option_names() {
		let (_, s) = settings(SettingsScope::Site);
		assert_eq!(s.option_name(), "plugin:epfl-accred");
		assert_eq!(s.network_option_name(), "plugin:epfl-accred:network");
		assert_eq!(s.option_group(), "plugin:epfl-accred:group");
		assert_eq!(s.active_option_name(), "plugin:epfl-accred");

		let (_, n) = settings(SettingsScope::Network);
		assert!(n.is_network());
		assert_eq!(n.active_option_name(), "plugin:epfl-accred:network");
	}

	#[tokio::test]
	async fn test_get_with_defaults_fills_and_discards() {
		let (store, s) = settings(SettingsScope::Site);
		store
			.set_option(
				SettingsScope::Site,
				"plugin:epfl-accred",
				json!({"color": "red", "shape": "square"}),
			)
			.await
			.unwrap();

		let values = s.get_with_defaults(&defaults()).await.unwrap();
		let keys: Vec<&str> = values.keys().collect();
		assert_eq!(keys, vec!["number", "color", "long"]);
		assert_eq!(values.get("number"), Some(&json!(500)));
		assert_eq!(values.get("color"), Some(&json!("red")));
		assert_eq!(values.get("shape"), None);
	}

	#[tokio::test]
	async fn test_get_with_defaults_when_missing() {
		let (_, s) = settings(SettingsScope::Site);
		let values = s.get_with_defaults(&defaults()).await.unwrap();
		assert_eq!(values.len(), 3);
		assert_eq!(values.get("color"), Some(&json!("blue")));
	}

	#[tokio::test]
	async fn test_get_with_defaults_rejects_scalar() {
		let (store, s) = settings(SettingsScope::Site);
		store
			.set_option(SettingsScope::Site, "plugin:epfl-accred", json!("oops"))
			.await
			.unwrap();
		let err = s.get_with_defaults(&defaults()).await.unwrap_err();
		assert!(matches!(err, SettingsError::NotAnObject(name) if name == "plugin:epfl-accred"));
	}

	#[tokio::test]
	async fn test_network_scope_reads_network_object() {
		let (store, n) = settings(SettingsScope::Network);
		store
			.set_option(SettingsScope::Site, "plugin:epfl-accred", json!({"color": "red"}))
			.await
			.unwrap();
		assert_eq!(n.get().await.unwrap(), None);

		n.set_field("color", json!("black")).await.unwrap();
		assert_eq!(
			store
				.get_option(SettingsScope::Network, "plugin:epfl-accred:network")
				.await
				.unwrap(),
			Some(json!({"color": "black"}))
		);
	}

	#[tokio::test]
	async fn test_get_option_default() {
		let (store, s) = settings(SettingsScope::Site);
		assert_eq!(s.get_option("missing", json!(false)).await.unwrap(), json!(false));
		store
			.set_option(SettingsScope::Site, "present", json!(7))
			.await
			.unwrap();
		assert_eq!(s.get_option("present", json!(false)).await.unwrap(), json!(7));
	}

	#[tokio::test]
	async fn test_set_field_preserves_other_fields() {
		let (_, s) = settings(SettingsScope::Site);
		s.set_field("a", json!("1")).await.unwrap();
		s.set_field("b", json!("2")).await.unwrap();
		assert_eq!(s.get().await.unwrap(), Some(json!({"a": "1", "b": "2"})));
	}
}
