// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::AccredConfigLayer;
use crate::sections::{DatabaseConfigLayer, LogFormat, LoggingConfigLayer, SettingsConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<AccredConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<AccredConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(AccredConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/accred/accred.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<AccredConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(AccredConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: AccredConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: ACCRED_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<AccredConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from `ACCRED_*` variables resolved through `lookup`.
pub(crate) fn layer_from_lookup<F>(lookup: F) -> Result<AccredConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());
	let flag = |name: &str| var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1");

	let format = match var("ACCRED_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| ConfigError::InvalidValue {
			key: "ACCRED_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};

	let busy_timeout_ms = match var("ACCRED_DATABASE_BUSY_TIMEOUT_MS") {
		Some(v) => Some(v.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
			key: "ACCRED_DATABASE_BUSY_TIMEOUT_MS".to_string(),
			message: e.to_string(),
		})?),
		None => None,
	};

	let roles = var("ACCRED_SETTINGS_ROLES").map(|v| {
		v.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string)
			.collect::<Vec<_>>()
	});

	Ok(AccredConfigLayer {
		database: Some(DatabaseConfigLayer {
			url: var("ACCRED_DATABASE_URL"),
			busy_timeout_ms,
		}),
		settings: Some(SettingsConfigLayer {
			slug: var("ACCRED_SETTINGS_SLUG"),
			network: flag("ACCRED_SETTINGS_NETWORK"),
			roles,
		}),
		logging: Some(LoggingConfigLayer {
			level: var("ACCRED_LOG_LEVEL"),
			format,
		}),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.database.is_none());
		assert!(layer.settings.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/accred.toml").load().unwrap();
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("accred.toml");
		std::fs::write(&path, "[database\nurl = 1").unwrap();
		let err = TomlSource::new(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_layer() {
		let layer = layer_from_lookup(lookup(&[
			("ACCRED_DATABASE_URL", "sqlite::memory:"),
			("ACCRED_DATABASE_BUSY_TIMEOUT_MS", "750"),
			("ACCRED_SETTINGS_NETWORK", "1"),
			("ACCRED_SETTINGS_ROLES", "owner, member,,guest"),
			("ACCRED_LOG_FORMAT", "json"),
			("ACCRED_LOG_LEVEL", ""),
		]))
		.unwrap();

		let database = layer.database.unwrap();
		assert_eq!(database.url.as_deref(), Some("sqlite::memory:"));
		assert_eq!(database.busy_timeout_ms, Some(750));
		let settings = layer.settings.unwrap();
		assert_eq!(settings.network, Some(true));
		assert_eq!(settings.slug, None);
		assert_eq!(
			settings.roles,
			Some(vec!["owner".to_string(), "member".to_string(), "guest".to_string()])
		);
		let logging = layer.logging.unwrap();
		assert_eq!(logging.format, Some(LogFormat::Json));
		assert_eq!(logging.level, None);
	}

	#[test]
	fn test_env_layer_rejects_unknown_format() {
		let err = layer_from_lookup(lookup(&[("ACCRED_LOG_FORMAT", "xml")])).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "ACCRED_LOG_FORMAT"));
	}

	#[test]
	fn test_env_layer_rejects_bad_busy_timeout() {
		let err = layer_from_lookup(lookup(&[("ACCRED_DATABASE_BUSY_TIMEOUT_MS", "soon")])).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "ACCRED_DATABASE_BUSY_TIMEOUT_MS"));
	}
}
