// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer, SettingsConfigLayer};

/// One partial configuration, as produced by a single source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccredConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub settings: Option<SettingsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl AccredConfigLayer {
	/// Overlay `other` on top of `self`. Fields set in `other` win.
	pub fn merge(&mut self, other: AccredConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.settings, other.settings, SettingsConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(current: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	if let Some(other) = other {
		match current {
			Some(existing) => merge(existing, other),
			None => *current = Some(other),
		}
	}
}
