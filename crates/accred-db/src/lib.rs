// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for Accred.
//!
//! Provides [`SqliteAccountRepository`] (an
//! [`AccountRepository`](accred_provisioning::AccountRepository)) and
//! [`SqliteSettingsStore`] (a [`SettingsStore`](accred_settings::SettingsStore))
//! over one pool created by [`create_pool`].

pub mod account;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod settings;
pub mod testing;

pub use account::SqliteAccountRepository;
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, DEFAULT_BUSY_TIMEOUT};
pub use settings::SqliteSettingsStore;
