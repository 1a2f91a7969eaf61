//! # bidhall-ledger
//!
//! **Token Ledger plane**: the sole writer of user token balances.
//!
//! ## Invariants
//!
//! - A balance never goes negative (checked debits; `u64` by type)
//! - Every mutation is atomic relative to concurrent debits/credits on the
//!   same user: each account sits behind its own mutex, acquired with a
//!   bounded timeout
//! - Balances change only through: the one-time welcome grant, a completed
//!   token purchase, and bid token debits
//!
//! ## Balance Flow
//!
//! ```text
//! register → grant_welcome_bonus (exactly once, +100)
//! purchase_tokens → PENDING → COMPLETED → credit(amount)
//! place_bid → debit(tokens_to_commit)   (fails before any state changes)
//! ```

pub mod ledger;

pub use ledger::{PurchaseReceipt, TokenLedger};
