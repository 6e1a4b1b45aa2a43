// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-login serialization of sync events.
//!
//! The lookup → resolve → create/update sequence is not atomic, so two events
//! for the same login must never interleave. Events for different logins do
//! not contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use accred_core::{IdentityAssertion, ResolvedAccess};

use crate::engine::{ProvisioningEngine, ProvisioningOutcome};
use crate::error::ProvisioningError;

type LoginMutex = Arc<tokio::sync::Mutex<()>>;

/// Async mutexes keyed by login, created on demand and dropped once no event
/// holds or waits for them.
#[derive(Debug, Default)]
pub struct LoginLocks {
	locks: Mutex<HashMap<String, LoginMutex>>,
}

impl LoginLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wait until no other event holds `login`, then hold it until the guard
	/// is dropped.
	pub async fn lock(&self, login: &str) -> LoginGuard<'_> {
		let mutex = {
			let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
			locks.entry(login.to_string()).or_default().clone()
		};
		let mut held = LoginGuard {
			locks: self,
			login: login.to_string(),
			guard: None,
		};
		// Declared after `held`: a cancelled wait drops its mutex reference
		// before `held` tries to release the entry.
		let acquire = mutex.lock_owned();
		held.guard = Some(acquire.await);
		held
	}

	/// Number of logins currently locked or waited on.
	pub fn active(&self) -> usize {
		self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	fn release(&self, login: &str) {
		let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(mutex) = locks.get(login) {
			if Arc::strong_count(mutex) == 1 {
				locks.remove(login);
			}
		}
	}
}

/// Held for the duration of one sync event.
#[derive(Debug)]
pub struct LoginGuard<'a> {
	locks: &'a LoginLocks,
	login: String,
	guard: Option<OwnedMutexGuard<()>>,
}

impl LoginGuard<'_> {
	pub fn login(&self) -> &str {
		&self.login
	}
}

impl Drop for LoginGuard<'_> {
	fn drop(&mut self) {
		drop(self.guard.take());
		self.locks.release(&self.login);
	}
}

/// A [`ProvisioningEngine`] that serializes events per login.
pub struct SerializedProvisioner {
	engine: ProvisioningEngine,
	locks: LoginLocks,
}

impl SerializedProvisioner {
	pub fn new(engine: ProvisioningEngine) -> Self {
		Self {
			engine,
			locks: LoginLocks::new(),
		}
	}

	pub fn engine(&self) -> &ProvisioningEngine {
		&self.engine
	}

	pub fn locks(&self) -> &LoginLocks {
		&self.locks
	}

	pub async fn provision(
		&self,
		assertion: &IdentityAssertion,
	) -> Result<ProvisioningOutcome, ProvisioningError> {
		let _guard = self.locks.lock(&assertion.login).await;
		self.engine.provision(assertion).await
	}

	pub async fn resolve(&self, assertion: &IdentityAssertion) -> Result<ResolvedAccess, ProvisioningError> {
		Ok(self.engine.resolve(assertion).await?)
	}
}
