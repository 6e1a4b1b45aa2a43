// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The provisioning state machine.
//!
//! | existing account | resolved access | action | outcome |
//! |---|---|---|---|
//! | absent | no access | none | `Denied(UnknownUser)` |
//! | absent | role `r` | create with `r` | `Provisioned` |
//! | present | role `r` | update with `r` | `Updated` |
//! | present | no access | update with no role | `Denied(AccessRevoked)` |
//!
//! In the last row the cleared role is persisted before the denial is
//! returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use accred_core::{resolve, Account, ConfigurationError, IdentityAssertion, ResolvedAccess};
use accred_settings::AccessConfigReader;

use crate::error::ProvisioningError;
use crate::repository::AccountRepository;

/// Why a sync was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
	/// No local account and no role: nothing to provision.
	UnknownUser,
	/// A known account lost its role. The role has already been cleared.
	AccessRevoked,
}

/// Result of one provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProvisioningOutcome {
	Provisioned {
		account: Account,
		access: ResolvedAccess,
	},
	Updated {
		account: Account,
		access: ResolvedAccess,
	},
	Denied {
		reason: DenialReason,
		/// The revoked account, for [`DenialReason::AccessRevoked`].
		account: Option<Account>,
		access: ResolvedAccess,
	},
}

impl ProvisioningOutcome {
	pub fn account(&self) -> Option<&Account> {
		match self {
			ProvisioningOutcome::Provisioned { account, .. } => Some(account),
			ProvisioningOutcome::Updated { account, .. } => Some(account),
			ProvisioningOutcome::Denied { account, .. } => account.as_ref(),
		}
	}

	pub fn access(&self) -> &ResolvedAccess {
		match self {
			ProvisioningOutcome::Provisioned { access, .. }
			| ProvisioningOutcome::Updated { access, .. }
			| ProvisioningOutcome::Denied { access, .. } => access,
		}
	}

	pub fn is_denied(&self) -> bool {
		matches!(self, ProvisioningOutcome::Denied { .. })
	}

	pub fn denial_reason(&self) -> Option<DenialReason> {
		match self {
			ProvisioningOutcome::Denied { reason, .. } => Some(*reason),
			_ => None,
		}
	}
}

/// Drives account creation, update and revocation from identity assertions.
///
/// Holds no state between calls. Events for the same login must not run
/// concurrently; see [`SerializedProvisioner`](crate::SerializedProvisioner).
#[derive(Clone)]
pub struct ProvisioningEngine {
	config: Arc<dyn AccessConfigReader>,
	accounts: Arc<dyn AccountRepository>,
}

impl ProvisioningEngine {
	pub fn new(config: Arc<dyn AccessConfigReader>, accounts: Arc<dyn AccountRepository>) -> Self {
		Self { config, accounts }
	}

	/// Access `assertion` would be granted right now, default role included.
	/// Performs no repository call.
	pub async fn resolve(&self, assertion: &IdentityAssertion) -> Result<ResolvedAccess, ConfigurationError> {
		let policy = self.config.access_policy().await?;
		Ok(resolve(assertion, &policy.mapping).or_default(policy.default_role))
	}

	/// Run one sync event.
	#[tracing::instrument(skip(self, assertion), fields(login = %assertion.login))]
	pub async fn provision(
		&self,
		assertion: &IdentityAssertion,
	) -> Result<ProvisioningOutcome, ProvisioningError> {
		let access = self.resolve(assertion).await?;
		let existing = self.accounts.find_by_login(&assertion.login).await?;
		let profile = assertion.profile();

		let outcome = match (existing, access.role().cloned()) {
			(None, None) => {
				debug!("no account and no matching group, denying");
				ProvisioningOutcome::Denied {
					reason: DenialReason::UnknownUser,
					account: None,
					access,
				}
			}
			(None, Some(role)) => {
				let account = self.accounts.create(&profile, &role).await?;
				info!(account_id = %account.id, role = %role, "account provisioned");
				ProvisioningOutcome::Provisioned { account, access }
			}
			(Some(existing), Some(role)) => {
				let account = self
					.accounts
					.update(&existing.id, &profile, Some(&role))
					.await?;
				debug!(account_id = %account.id, role = %role, "account updated");
				ProvisioningOutcome::Updated { account, access }
			}
			(Some(existing), None) => {
				let account = self.accounts.update(&existing.id, &profile, None).await?;
				warn!(
					account_id = %account.id,
					previous_role = ?existing.role,
					"access revoked"
				);
				ProvisioningOutcome::Denied {
					reason: DenialReason::AccessRevoked,
					account: Some(account),
					access,
				}
			}
		};

		Ok(outcome)
	}
}
