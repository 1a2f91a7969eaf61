//! Token purchase records.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  payment ok    ┌───────────┐
//!   │ PENDING ├───────────────▶│ COMPLETED │
//!   └────┬────┘                └───────────┘
//!        │ payment declined
//!        ▼
//!   ┌────────┐
//!   │ FAILED │
//!   └────────┘
//! ```
//!
//! Transitions are one-way: a completed or failed purchase never changes
//! again. Payment itself is simulated — the ledger marks purchases
//! COMPLETED immediately — but the FAILED path is part of the record
//! format so a real payment integration needs no schema change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BidhallError, PurchaseId, Result, UserId};

/// Lifecycle state of a token purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// A token purchase: `amount` tokens granted for `price` paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPurchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    /// Tokens granted by this purchase.
    pub amount: u64,
    /// Price paid.
    pub price: Decimal,
    /// Identifier assigned by the (simulated) external payment processor.
    pub transaction_id: String,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

impl TokenPurchase {
    /// A new purchase in PENDING state with a fresh external transaction id.
    #[must_use]
    pub fn new(user_id: UserId, amount: u64, price: Decimal) -> Self {
        Self {
            id: PurchaseId::new(),
            user_id,
            amount,
            price,
            transaction_id: Uuid::new_v4().to_string(),
            status: PurchaseStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// PENDING → COMPLETED.
    ///
    /// # Errors
    /// Returns [`BidhallError::PurchaseNotPending`] from any other state.
    pub fn mark_completed(&mut self) -> Result<()> {
        if self.status != PurchaseStatus::Pending {
            return Err(BidhallError::PurchaseNotPending {
                id: self.id,
                status: self.status,
            });
        }
        self.status = PurchaseStatus::Completed;
        Ok(())
    }

    /// PENDING → FAILED.
    ///
    /// # Errors
    /// Returns [`BidhallError::PurchaseNotPending`] from any other state.
    pub fn mark_failed(&mut self) -> Result<()> {
        if self.status != PurchaseStatus::Pending {
            return Err(BidhallError::PurchaseNotPending {
                id: self.id,
                status: self.status,
            });
        }
        self.status = PurchaseStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_purchase_is_pending() {
        let p = TokenPurchase::new(UserId::new(), 500, Decimal::new(4500, 2));
        assert_eq!(p.status, PurchaseStatus::Pending);
        assert_eq!(p.amount, 500);
        assert!(!p.transaction_id.is_empty());
    }

    #[test]
    fn mark_completed_from_pending() {
        let mut p = TokenPurchase::new(UserId::new(), 100, Decimal::TEN);
        assert!(p.mark_completed().is_ok());
        assert_eq!(p.status, PurchaseStatus::Completed);
    }

    #[test]
    fn completed_cannot_transition_again() {
        let mut p = TokenPurchase::new(UserId::new(), 100, Decimal::TEN);
        p.mark_completed().unwrap();
        assert!(p.mark_completed().is_err(), "COMPLETED → COMPLETED must fail");
        assert!(p.mark_failed().is_err(), "COMPLETED → FAILED must fail");
    }

    #[test]
    fn failed_cannot_transition_again() {
        let mut p = TokenPurchase::new(UserId::new(), 100, Decimal::TEN);
        p.mark_failed().unwrap();
        assert_eq!(p.status, PurchaseStatus::Failed);
        assert!(p.mark_completed().is_err(), "FAILED → COMPLETED must fail");
    }

    #[test]
    fn transaction_ids_are_unique() {
        let a = TokenPurchase::new(UserId::new(), 1, Decimal::ONE);
        let b = TokenPurchase::new(UserId::new(), 1, Decimal::ONE);
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[test]
    fn purchase_serde_roundtrip() {
        let p = TokenPurchase::new(UserId::new(), 500, Decimal::new(4500, 2));
        let json = serde_json::to_string(&p).unwrap();
        let back: TokenPurchase = serde_json::from_str(&json).unwrap();
        assert_eq!(p.id, back.id);
        assert_eq!(p.amount, back.amount);
        assert_eq!(p.status, back.status);
    }
}
