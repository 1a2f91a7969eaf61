//! Listing types — fixed-price listings and their auction specialization.
//!
//! An auction is a [`Listing`] with `kind == Auction` and a deadline.
//! Invariants held here:
//!
//! - `current_price >= starting_price`, always
//! - `current_price` is monotonically non-decreasing while the listing is open
//! - once `status` leaves [`ListingStatus::Active`], no bid may move the price
//!
//! Lifecycle transitions are **monotonic** (never go backwards):
//! `Active → Sold` (explicit finalization) or `Active → Expired` (deadline
//! passed with no qualifying close).

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AuctionId, BidhallError, Result, UserId};

/// Whether a listing sells at a fixed price or by auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingKind {
    FixedPrice,
    Auction,
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedPrice => write!(f, "FIXED_PRICE"),
            Self::Auction => write!(f, "AUCTION"),
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Sold,
    Expired,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Sold => write!(f, "SOLD"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// A marketplace listing. Auctions carry a deadline in `ends_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: AuctionId,
    pub title: String,
    pub description: String,
    /// Opaque image reference (URL or storage key).
    pub image: String,
    pub starting_price: Decimal,
    /// Highest accepted bid so far, or `starting_price` if none.
    pub current_price: Decimal,
    pub seller: UserId,
    pub category: String,
    pub kind: ListingKind,
    /// Bidding deadline. `Some` for auctions, `None` for fixed-price listings.
    pub ends_at: Option<DateTime<Utc>>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    #[must_use]
    pub fn is_auction(&self) -> bool {
        self.kind == ListingKind::Auction
    }

    /// Whether bids may still be accepted at `now`.
    ///
    /// The deadline comparison is strict: a bid arriving at exactly
    /// `ends_at` is already too late.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != ListingStatus::Active {
            return false;
        }
        match self.ends_at {
            Some(ends_at) => now < ends_at,
            None => true,
        }
    }

    /// Move the current price up to an accepted bid amount.
    ///
    /// # Errors
    /// Returns [`BidhallError::BidTooLow`] unless `amount` strictly exceeds
    /// the current price — the price never moves down or sideways.
    pub fn raise_current_price(&mut self, amount: Decimal) -> Result<()> {
        if amount <= self.current_price {
            return Err(BidhallError::BidTooLow {
                bid: amount,
                current: self.current_price,
            });
        }
        self.current_price = amount;
        Ok(())
    }

    /// Leave the ACTIVE state.
    ///
    /// Finalization (picking a winner, settling) is not defined here; this
    /// is only the one-way status transition the future mechanism will use.
    ///
    /// # Errors
    /// - [`BidhallError::Validation`] if `status` is `Active`
    /// - [`BidhallError::ListingAlreadyClosed`] if already closed
    pub fn close(&mut self, status: ListingStatus) -> Result<()> {
        if status == ListingStatus::Active {
            return Err(BidhallError::Validation {
                reason: "cannot close a listing to ACTIVE".to_string(),
            });
        }
        if self.status != ListingStatus::Active {
            return Err(BidhallError::ListingAlreadyClosed {
                id: self.id,
                status: self.status,
            });
        }
        self.status = status;
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Listing {
    pub fn dummy_auction(seller: UserId, starting_price: Decimal, duration_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: AuctionId::new(),
            title: "Vintage camera".to_string(),
            description: "A well-kept vintage camera".to_string(),
            image: "https://img.example.com/camera.jpg".to_string(),
            starting_price,
            current_price: starting_price,
            seller,
            category: "collectibles".to_string(),
            kind: ListingKind::Auction,
            ends_at: Some(now + Duration::hours(duration_hours)),
            status: ListingStatus::Active,
            created_at: now,
        }
    }

    pub fn dummy_fixed(seller: UserId, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: AuctionId::new(),
            title: "Desk lamp".to_string(),
            description: "Fixed-price desk lamp".to_string(),
            image: "https://img.example.com/lamp.jpg".to_string(),
            starting_price: price,
            current_price: price,
            seller,
            category: "home".to_string(),
            kind: ListingKind::FixedPrice,
            ends_at: None,
            status: ListingStatus::Active,
            created_at: now,
        }
    }
}
