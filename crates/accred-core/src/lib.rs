// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core domain types for Accred.
//!
//! This crate holds everything that is pure data or pure computation:
//!
//! - [`IdentityAssertion`]: the already-authenticated login payload handed
//!   over by the upstream single-sign-on service
//! - [`RoleId`] and [`RoleCatalog`]: deployment-defined roles, in precedence
//!   order
//! - [`GroupRoleMap`]: the administrator-configured role → required group table
//! - [`resolve`]: first-match access resolution producing a [`ResolvedAccess`]
//!
//! Nothing in here performs I/O. Reading the mapping from settings and
//! mutating accounts live in `accred-settings` and `accred-provisioning`.

pub mod error;
pub mod mapping;
pub mod resolve;
pub mod types;

pub use error::ConfigurationError;
pub use mapping::{DuplicateGroup, GroupRoleEntry, GroupRoleMap, RoleCatalog};
pub use resolve::{resolve, ResolvedAccess};
pub use types::{Account, AccountId, IdentityAssertion, Profile, RoleId};
