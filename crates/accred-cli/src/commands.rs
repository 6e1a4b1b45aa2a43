// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use accred_config::AccredConfig;
use accred_core::{GroupRoleMap, IdentityAssertion};
use accred_db::{create_pool, run_migrations, SqliteAccountRepository, SqliteSettingsStore};
use accred_provisioning::{ProvisioningEngine, SerializedProvisioner};
use accred_settings::{AccessConfigReader, Settings, SettingsAccessConfig};

/// Denied outcomes exit with this code so scripts can tell them from failures.
const EXIT_DENIED: u8 = 2;

pub struct App {
	access: SettingsAccessConfig,
	provisioner: SerializedProvisioner,
}

impl App {
	pub async fn connect(config: &AccredConfig) -> anyhow::Result<Self> {
		let pool = create_pool(&config.database.url, config.database.busy_timeout())
			.await
			.with_context(|| format!("opening database {}", config.database.url))?;
		run_migrations(&pool).await.context("running migrations")?;

		let settings = Settings::new(
			Arc::new(SqliteSettingsStore::new(pool.clone())),
			config.settings.slug.clone(),
			config.settings.scope(),
		);
		let access = SettingsAccessConfig::new(settings, config.settings.roles.clone());
		let engine = ProvisioningEngine::new(
			Arc::new(access.clone()),
			Arc::new(SqliteAccountRepository::new(pool)),
		);

		Ok(Self {
			access,
			provisioner: SerializedProvisioner::new(engine),
		})
	}
}

fn read_assertion(path: &Path) -> anyhow::Result<IdentityAssertion> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("reading assertion {}", path.display()))?;
	serde_json::from_str(&content).with_context(|| format!("parsing assertion {}", path.display()))
}

pub async fn sync(app: &App, path: &Path) -> anyhow::Result<ExitCode> {
	let assertion = read_assertion(path)?;
	let outcome = app
		.provisioner
		.provision(&assertion)
		.await
		.with_context(|| format!("provisioning {}", assertion.login))?;

	println!("{}", serde_json::to_string_pretty(&outcome)?);

	if let Some(reason) = outcome.denial_reason() {
		tracing::info!(login = %assertion.login, reason = ?reason, "sync denied");
		return Ok(ExitCode::from(EXIT_DENIED));
	}
	Ok(ExitCode::SUCCESS)
}

pub async fn resolve(app: &App, path: &Path) -> anyhow::Result<ExitCode> {
	let assertion = read_assertion(path)?;
	let access = app
		.provisioner
		.resolve(&assertion)
		.await
		.context("resolving access")?;

	println!("{}", serde_json::to_string_pretty(&access)?);
	Ok(ExitCode::SUCCESS)
}

pub async fn mapping_show(app: &App) -> anyhow::Result<ExitCode> {
	let policy = app.access.access_policy().await.context("reading access configuration")?;

	print!("{}", format_mapping(&policy.mapping));
	match &policy.default_role {
		Some(role) => println!("default: {role}"),
		None => println!("default: (none)"),
	}

	for duplicate in policy.mapping.duplicate_groups() {
		eprintln!(
			"warning: group '{}' is required by several roles, only '{}' can ever be granted",
			duplicate.group, duplicate.roles[0]
		);
	}
	Ok(ExitCode::SUCCESS)
}

pub async fn mapping_set(app: &App, role: &str, group: &str) -> anyhow::Result<ExitCode> {
	app
		.access
		.set_role_group(role, group)
		.await
		.with_context(|| format!("setting group for role {role}"))?;
	mapping_show(app).await
}

pub async fn mapping_default(app: &App, role: Option<&str>) -> anyhow::Result<ExitCode> {
	app
		.access
		.set_default_role(role)
		.await
		.context("setting default role")?;
	mapping_show(app).await
}

fn format_mapping(mapping: &GroupRoleMap) -> String {
	let width = mapping
		.entries()
		.iter()
		.map(|e| e.role.as_str().len())
		.max()
		.unwrap_or(0);

	let mut out = String::new();
	for (position, entry) in mapping.entries().iter().enumerate() {
		let group = if entry.is_inert() {
			"(unassigned)"
		} else {
			entry.required_group.as_str()
		};
		out.push_str(&format!(
			"{:>2}. {:<width$}  {}\n",
			position + 1,
			entry.role.as_str(),
			group
		));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use accred_core::RoleId;

	#[test]
	fn test_format_mapping() {
		let mapping = GroupRoleMap::from_pairs(vec![
			(RoleId::new("administrator").unwrap(), "web-admins"),
			(RoleId::new("author").unwrap(), ""),
		]);
		assert_eq!(
			format_mapping(&mapping),
			" 1. administrator  web-admins\n 2. author         (unassigned)\n"
		);
	}

	#[test]
	fn test_read_assertion() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("jdoe.json");
		std::fs::write(
			&path,
			r#"{"login": "jdoe", "uniqueId": "123456", "groups": ["web-admins"]}"#,
		)
		.unwrap();

		let assertion = read_assertion(&path).unwrap();
		assert_eq!(assertion.login, "jdoe");
		assert!(assertion.is_member_of("web-admins"));

		assert!(read_assertion(&dir.path().join("missing.json")).is_err());
	}
}
