//! User account and identity types.
//!
//! Authentication (credential verification, session token issuance) is the
//! Identity Provider's job. The core only ever sees a [`Principal`] — an
//! already-verified identity — on every mutating operation. Token balances
//! on [`UserAccount`] are mutated exclusively by the token ledger, never
//! directly from client input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// The opaque verified identity a request acts as.
///
/// Constructed by the Identity Provider after credential verification;
/// the core treats it as proof of "who is asking".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(UserId);

impl Principal {
    /// Wrap a verified user id. Only the Identity Provider boundary should
    /// call this.
    #[must_use]
    pub fn verified(user_id: UserId) -> Self {
        Self(user_id)
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub display_name: String,
    /// Unique across all accounts.
    pub email: String,
    /// Opaque credential hash, owned by the Identity Provider.
    pub credential_hash: String,
    /// Token balance. Non-negative by construction; written only by the
    /// token ledger.
    pub tokens: u64,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// A fresh account with a zero token balance (the welcome bonus is a
    /// separate ledger operation).
    #[must_use]
    pub fn new(display_name: impl Into<String>, email: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            display_name: display_name.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            tokens: 0,
            created_at: Utc::now(),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl UserAccount {
    pub fn dummy(name: &str) -> Self {
        Self::new(name, format!("{name}@example.com"), "$2b$10$hash")
    }
}
