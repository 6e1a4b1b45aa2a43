// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the Accred tools.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`ACCRED_*`)
//!
//! # Usage
//!
//! ```ignore
//! use accred_config::load_config;
//!
//! let config = load_config()?;
//! println!("Reading settings from plugin:{}", config.settings.slug);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::AccredConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct AccredConfig {
	pub database: DatabaseConfig,
	pub settings: SettingsConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ACCRED_*`)
/// 2. Config file (`/etc/accred/accred.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<AccredConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<std::path::PathBuf>) -> Result<AccredConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<AccredConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = AccredConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: AccredConfigLayer) -> Result<AccredConfig, ConfigError> {
	let database = layer.database.unwrap_or_default().finalize();
	let settings = layer.settings.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		database = %database.url,
		slug = %settings.slug,
		scope = %settings.scope(),
		roles = settings.roles.len(),
		"configuration loaded"
	);

	Ok(AccredConfig {
		database,
		settings,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::layer_from_lookup;
	use accred_settings::SettingsScope;
	use std::io::Write;

	struct FixedSource(Precedence, AccredConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<AccredConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn write_toml(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config.database.url, "sqlite:./accred.db");
		assert_eq!(config.settings.slug, "epfl-accred");
		assert_eq!(config.logging.format, LogFormat::Pretty);
	}

	#[test]
	fn test_environment_overrides_file() {
		let file = write_toml(
			r#"
			[database]
			url = "sqlite:/from/file.db"

			[settings]
			slug = "file-slug"
			"#,
		);
		let env = layer_from_lookup(|name| match name {
			"ACCRED_DATABASE_URL" => Some("sqlite:/from/env.db".to_string()),
			"ACCRED_SETTINGS_NETWORK" => Some("true".to_string()),
			_ => None,
		})
		.unwrap();

		// Listed out of order on purpose: sources are sorted by precedence.
		let config = load_from_sources(vec![
			Box::new(FixedSource(Precedence::Environment, env)),
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.database.url, "sqlite:/from/env.db");
		assert_eq!(config.settings.slug, "file-slug");
		assert_eq!(config.settings.scope(), SettingsScope::Network);
	}

	#[test]
	fn test_invalid_roles_in_file_fail() {
		let file = write_toml(
			r#"
			[settings]
			roles = ["editor", "editor"]
			"#,
		);
		let result = load_from_sources(vec![Box::new(TomlSource::new(file.path()))]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}
}
