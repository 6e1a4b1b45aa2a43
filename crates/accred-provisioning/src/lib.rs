// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account provisioning for Accred.
//!
//! [`ProvisioningEngine`] reads the current access configuration, resolves the
//! access an identity assertion grants and creates, updates or revokes the
//! matching local account through an [`AccountRepository`].
//!
//! # Architecture
//!
//! - `repository` - the [`AccountRepository`] capability the engine writes
//!   through
//! - `engine` - the create / update / deny state machine
//! - `locks` - per-login serialization for callers that may receive several
//!   events for the same login at once
//! - `memory` - an in-memory repository for tests and dry runs

pub mod engine;
pub mod error;
pub mod locks;
pub mod memory;
pub mod repository;

pub use engine::{DenialReason, ProvisioningEngine, ProvisioningOutcome};
pub use error::{ProvisioningError, RepositoryError};
pub use locks::{LoginGuard, LoginLocks, SerializedProvisioner};
pub use memory::InMemoryAccountRepository;
pub use repository::AccountRepository;
