//! # bidhall-engine
//!
//! **Auction Engine plane**: owns auction state transitions and bid
//! validation/application.
//!
//! ## Architecture
//!
//! The engine sits between the API layer and the other planes:
//! 1. **LedgerStore**: per-document-atomic listing/bid storage; each
//!    listing's mutex is the per-auction transactional scope
//! 2. **TokenLedger** (bidhall-ledger): the balance gate — debits are the
//!    authoritative "enough tokens" check
//! 3. **BroadcastHub** (bidhall-hub): fire-and-forget fan-out of accepted
//!    bids to live viewers
//!
//! ## Bid Flow
//!
//! ```text
//! API → validate request → lock auction → checks 1..5 → debit tokens
//!     → append Bid + raise current price (atomic unit) → publish NewBid
//! ```
//!
//! Two bids can never both win against a stale price: every check runs
//! under the auction's lock, and a failed bid leaves all state unchanged.

pub mod engine;
pub mod store;

pub use engine::{AuctionDetail, AuctionEngine, BidReceipt, PlacedBid};
pub use store::LedgerStore;
