// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Accred operator CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accred_config::{AccredConfig, LogFormat};

mod commands;

/// Synchronize local accounts and roles from SSO identity assertions.
#[derive(Parser, Debug)]
#[command(name = "accred", about = "SSO group to role provisioning", version)]
struct Args {
	/// Configuration file (defaults to /etc/accred/accred.toml)
	#[arg(long, global = true, env = "ACCRED_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Provision the account described by an identity assertion file
	Sync {
		/// JSON identity assertion
		assertion: PathBuf,
	},
	/// Show the access an assertion would be granted, without writing
	Resolve {
		/// JSON identity assertion
		assertion: PathBuf,
	},
	/// Inspect or edit the role to group mapping
	Mapping {
		#[command(subcommand)]
		command: MappingCommand,
	},
}

#[derive(Subcommand, Debug)]
enum MappingCommand {
	/// Print the mapping in precedence order
	Show,
	/// Require membership in GROUP for ROLE. An empty GROUP disables the role.
	Set { role: String, group: String },
	/// Set or clear the role granted when no group matches
	Default {
		role: Option<String>,
		#[arg(long, conflicts_with = "role")]
		clear: bool,
	},
}

fn init_tracing(config: &AccredConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());

	let (pretty, json) = match config.logging.format {
		LogFormat::Pretty => (
			Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
			None,
		),
		LogFormat::Json => (
			None,
			Some(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			),
		),
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(pretty)
		.with(json)
		.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => accred_config::load_config_with_file(path)
			.with_context(|| format!("loading configuration from {}", path.display()))?,
		None => accred_config::load_config().context("loading configuration")?,
	};

	init_tracing(&config);
	tracing::debug!(database = %config.database.url, "starting accred");

	let app = commands::App::connect(&config).await?;

	match args.command {
		Command::Sync { assertion } => commands::sync(&app, &assertion).await,
		Command::Resolve { assertion } => commands::resolve(&app, &assertion).await,
		Command::Mapping { command } => match command {
			MappingCommand::Show => commands::mapping_show(&app).await,
			MappingCommand::Set { role, group } => commands::mapping_set(&app, &role, &group).await,
			MappingCommand::Default { role, clear } => {
				if role.is_none() && !clear {
					anyhow::bail!("pass a role or --clear");
				}
				commands::mapping_default(&app, role.as_deref()).await
			}
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_sync() {
		let args = Args::try_parse_from(["accred", "sync", "jdoe.json"]).unwrap();
		assert!(matches!(args.command, Command::Sync { assertion } if assertion == PathBuf::from("jdoe.json")));
	}

	#[test]
	fn test_parse_global_config_after_subcommand() {
		let args =
			Args::try_parse_from(["accred", "mapping", "show", "--config", "/tmp/accred.toml"]).unwrap();
		assert_eq!(args.config, Some(PathBuf::from("/tmp/accred.toml")));
	}

	#[test]
	fn test_parse_mapping_default() {
		let args = Args::try_parse_from(["accred", "mapping", "default", "--clear"]).unwrap();
		assert!(matches!(
			args.command,
			Command::Mapping {
				command: MappingCommand::Default { role: None, clear: true }
			}
		));
		assert!(Args::try_parse_from(["accred", "mapping", "default", "editor", "--clear"]).is_err());
	}

	#[test]
	fn test_parse_mapping_set_empty_group() {
		let args = Args::try_parse_from(["accred", "mapping", "set", "author", ""]).unwrap();
		assert!(matches!(
			args.command,
			Command::Mapping {
				command: MappingCommand::Set { ref role, ref group }
			} if role == "author" && group.is_empty()
		));
	}
}
