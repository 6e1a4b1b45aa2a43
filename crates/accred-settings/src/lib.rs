// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings persistence and the access configuration built on top of it.
//!
//! # Architecture
//!
//! - `store` - [`SettingsStore`] trait (key → JSON value, per scope) and an
//!   in-memory implementation
//! - `settings` - [`Settings`], which binds a store to a plugin slug and a
//!   site or network scope and knows the option naming scheme
//! - `access` - [`AccessConfigReader`], the capability the provisioning
//!   engine reads its role → group mapping through, and
//!   [`SettingsAccessConfig`], its settings-backed implementation
//!
//! Every read goes to the store. Nothing is cached, so a mapping changed by
//! an administrator is observed by the very next sync.

pub mod access;
pub mod error;
pub mod settings;
pub mod store;

pub use access::{
	group_key, AccessConfigReader, AccessPolicy, SettingsAccessConfig, StaticAccessConfig,
	DEFAULT_ROLE_KEY,
};
pub use error::SettingsError;
pub use settings::{Settings, SettingsValues};
pub use store::{MemorySettingsStore, SettingsScope, SettingsStore};
