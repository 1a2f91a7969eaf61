//! Domain events fanned out by the broadcast hub.
//!
//! Events are best-effort live updates for connected subscribers — there is
//! no persistence or replay. A subscriber joining after an event was
//! published simply misses it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionId, Bid};

/// A state change on one auction, delivered to that auction's channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuctionEvent {
    /// A bid was accepted and the current price moved.
    NewBid {
        auction_id: AuctionId,
        bid: Bid,
        new_price: Decimal,
    },
}

impl AuctionEvent {
    /// The auction whose channel this event belongs to.
    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        match self {
            Self::NewBid { auction_id, .. } => *auction_id,
        }
    }
}
