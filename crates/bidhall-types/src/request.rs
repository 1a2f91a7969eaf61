//! Strongly-typed request payloads.
//!
//! Every mutating operation takes one of these structs; `validate()` runs
//! before any domain logic and fails fast with [`BidhallError::Validation`].
//! Field constraints (types, positivity, ranges) live here so the engine
//! and ledger only ever see well-formed input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AuctionId, BidhallError, Listing, ListingKind, ListingStatus, Result};

/// Request to create a listing (fixed-price or auction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub starting_price: Decimal,
    pub kind: ListingKind,
    /// Required (and positive) when `kind == Auction`; ignored otherwise.
    pub duration_hours: Option<i64>,
}

impl CreateListingRequest {
    /// Convenience constructor for an auction listing.
    #[must_use]
    pub fn auction(
        title: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        category: impl Into<String>,
        starting_price: Decimal,
        duration_hours: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: image.into(),
            category: category.into(),
            starting_price,
            kind: ListingKind::Auction,
            duration_hours: Some(duration_hours),
        }
    }

    /// Convenience constructor for a fixed-price listing.
    #[must_use]
    pub fn fixed_price(
        title: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: image.into(),
            category: category.into(),
            starting_price: price,
            kind: ListingKind::FixedPrice,
            duration_hours: None,
        }
    }

    /// # Errors
    /// Returns [`BidhallError::Validation`] naming the first failing field.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(validation("title must not be empty"));
        }
        if self.title.len() > constants::MAX_TITLE_LEN {
            return Err(validation("title too long"));
        }
        if self.description.trim().is_empty() {
            return Err(validation("description must not be empty"));
        }
        if self.description.len() > constants::MAX_DESCRIPTION_LEN {
            return Err(validation("description too long"));
        }
        if self.image.trim().is_empty() {
            return Err(validation("image must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(validation("category must not be empty"));
        }
        if self.starting_price <= Decimal::ZERO {
            return Err(validation("starting price must be positive"));
        }
        if self.kind == ListingKind::Auction {
            match self.duration_hours {
                None => return Err(validation("auction requires a duration")),
                Some(h) if h <= 0 => return Err(validation("duration must be positive")),
                Some(h) if h > constants::MAX_AUCTION_DURATION_HOURS => {
                    return Err(validation("duration exceeds maximum"));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Request to place a bid on an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBidRequest {
    pub auction_id: AuctionId,
    pub amount: Decimal,
    /// Tokens to commit as a priority signal. Zero is allowed.
    pub tokens_to_commit: u64,
}

impl PlaceBidRequest {
    #[must_use]
    pub fn new(auction_id: AuctionId, amount: Decimal, tokens_to_commit: u64) -> Self {
        Self {
            auction_id,
            amount,
            tokens_to_commit,
        }
    }

    /// # Errors
    /// Returns [`BidhallError::Validation`] for a non-positive amount.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(validation("bid amount must be positive"));
        }
        Ok(())
    }
}

/// Request to purchase tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseTokensRequest {
    /// Tokens to credit. Bonus tokens from a package are already folded in
    /// by the caller — the ledger credits exactly this amount.
    pub amount: u64,
    /// Price the caller-selected package charges.
    pub price: Decimal,
    /// Opaque payment method label (payment processing is simulated).
    pub payment_method: String,
}

impl PurchaseTokensRequest {
    #[must_use]
    pub fn new(amount: u64, price: Decimal, payment_method: impl Into<String>) -> Self {
        Self {
            amount,
            price,
            payment_method: payment_method.into(),
        }
    }

    /// A purchase at the flat list price (no package discount or bonus).
    #[must_use]
    pub fn at_list_price(amount: u64, payment_method: impl Into<String>) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let price = Decimal::new(amount as i64 * constants::TOKEN_UNIT_PRICE_CENTS, 2);
        Self::new(amount, price, payment_method)
    }

    /// # Errors
    /// Returns [`BidhallError::Validation`] for a zero amount, negative
    /// price, or missing payment method.
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(validation("token amount must be a positive integer"));
        }
        if self.price < Decimal::ZERO {
            return Err(validation("price must not be negative"));
        }
        if self.payment_method.trim().is_empty() {
            return Err(validation("payment method must not be empty"));
        }
        Ok(())
    }
}

/// Optional filters for listing queries.
///
/// `status` defaults to [`ListingStatus::Active`] when unspecified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub kind: Option<ListingKind>,
    pub status: Option<ListingStatus>,
}

impl ListingFilter {
    /// Active listings of any kind and category.
    #[must_use]
    pub fn active() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ListingKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a listing passes this filter.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let status = self.status.unwrap_or(ListingStatus::Active);
        if listing.status != status {
            return false;
        }
        if let Some(kind) = self.kind {
            if listing.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &listing.category != category {
                return false;
            }
        }
        true
    }
}

fn validation(reason: &str) -> BidhallError {
    BidhallError::Validation {
        reason: reason.to_string(),
    }
}
