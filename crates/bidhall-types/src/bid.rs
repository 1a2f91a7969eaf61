//! Bid types — the immutable record of an accepted bid.
//!
//! Bids form an append-only log: a [`Bid`] is created only as the side
//! effect of a successful `place_bid`, and is never edited or deleted.
//! At the instant of acceptance its `amount` strictly exceeded the
//! auction's then-current price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionId, BidId, UserId};

/// An accepted bid on an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub auction_id: AuctionId,
    pub bidder: UserId,
    /// Bid amount; became the auction's current price on acceptance.
    pub amount: Decimal,
    /// Tokens the bidder committed alongside this bid. Recorded as a
    /// priority signal; the engine defines no outcome semantics for it.
    pub tokens_committed: u64,
    pub placed_at: DateTime<Utc>,
}

impl Bid {
    #[must_use]
    pub fn new(auction_id: AuctionId, bidder: UserId, amount: Decimal, tokens_committed: u64) -> Self {
        Self {
            id: BidId::new(),
            auction_id,
            bidder,
            amount,
            tokens_committed,
            placed_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bid[{}] {} on {} @ {} ({} tokens)",
            self.id, self.bidder, self.auction_id, self.amount, self.tokens_committed,
        )
    }
}
