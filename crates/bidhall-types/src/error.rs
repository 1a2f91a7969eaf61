//! Error types for the BidHall marketplace core.
//!
//! All errors use the `BH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing / auction lifecycle errors
//! - 2xx: Bid errors
//! - 3xx: Token ledger errors
//! - 4xx: Validation / identity errors
//! - 5xx: Transient errors (safe to retry)
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AuctionId, ListingStatus, PurchaseId, PurchaseStatus, UserId};

/// Central error enum for all BidHall operations.
///
/// Every rejection a caller can observe is a distinct variant — nothing is
/// coerced into a generic failure. [`BidhallError::kind`] maps variants onto
/// the coarse taxonomy for callers that match on class rather than variant.
#[derive(Debug, Error)]
pub enum BidhallError {
    // =================================================================
    // Listing / Auction Errors (1xx)
    // =================================================================
    /// The referenced listing does not exist.
    #[error("BH_ERR_100: Listing not found: {0}")]
    ListingNotFound(AuctionId),

    /// The listing exists but is a fixed-price listing, not an auction.
    #[error("BH_ERR_101: Not an auction: listing {0} is fixed-price")]
    NotAnAuction(AuctionId),

    /// The auction's bidding window has elapsed (or it was finalized).
    #[error("BH_ERR_102: Auction closed: {0}")]
    AuctionClosed(AuctionId),

    /// The listing has already left the ACTIVE state.
    #[error("BH_ERR_103: Listing {id} is {status}, cannot transition")]
    ListingAlreadyClosed { id: AuctionId, status: ListingStatus },

    // =================================================================
    // Bid Errors (2xx)
    // =================================================================
    /// The bid does not strictly exceed the auction's current price.
    #[error("BH_ERR_200: Bid too low: {bid} must exceed current price {current}")]
    BidTooLow { bid: Decimal, current: Decimal },

    // =================================================================
    // Token Ledger Errors (3xx)
    // =================================================================
    /// Not enough tokens to cover the requested debit.
    #[error("BH_ERR_300: Insufficient tokens: need {needed}, have {available}")]
    InsufficientTokens { needed: u64, available: u64 },

    /// The referenced user account does not exist.
    #[error("BH_ERR_301: Account not found: {0}")]
    AccountNotFound(UserId),

    /// An account with this id or email already exists.
    #[error("BH_ERR_302: Duplicate account: {reason}")]
    DuplicateAccount { reason: String },

    /// The welcome bonus is granted exactly once per account.
    #[error("BH_ERR_303: Welcome bonus already granted: {0}")]
    BonusAlreadyGranted(UserId),

    /// The referenced token purchase does not exist.
    #[error("BH_ERR_304: Purchase not found: {0}")]
    PurchaseNotFound(PurchaseId),

    /// A purchase status transition was attempted from a terminal state.
    #[error("BH_ERR_305: Purchase {id} is {status}, not PENDING")]
    PurchaseNotPending {
        id: PurchaseId,
        status: PurchaseStatus,
    },

    // =================================================================
    // Validation / Identity Errors (4xx)
    // =================================================================
    /// Malformed or out-of-range input, rejected before any domain logic ran.
    #[error("BH_ERR_400: Validation failed: {reason}")]
    Validation { reason: String },

    /// No verified identity was supplied (Identity Provider contract).
    #[error("BH_ERR_401: Unauthenticated")]
    Unauthenticated,

    /// The identity is valid but not permitted to perform this operation.
    #[error("BH_ERR_403: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Transient Errors (5xx)
    // =================================================================
    /// Transient storage/lock contention — the only kind safe to retry.
    #[error("BH_ERR_500: Unavailable: {reason}")]
    Unavailable { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("BH_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Coarse error classes, matching the external error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidOperation,
    AuctionClosed,
    BidTooLow,
    InsufficientTokens,
    Validation,
    Unauthenticated,
    Unauthorized,
    Unavailable,
    Internal,
}

impl BidhallError {
    /// The coarse class this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ListingNotFound(_) | Self::AccountNotFound(_) | Self::PurchaseNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NotAnAuction(_)
            | Self::ListingAlreadyClosed { .. }
            | Self::DuplicateAccount { .. }
            | Self::BonusAlreadyGranted(_)
            | Self::PurchaseNotPending { .. } => ErrorKind::InvalidOperation,
            Self::AuctionClosed(_) => ErrorKind::AuctionClosed,
            Self::BidTooLow { .. } => ErrorKind::BidTooLow,
            Self::InsufficientTokens { .. } => ErrorKind::InsufficientTokens,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a caller may automatically retry (with backoff, bounded attempts).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BidhallError>;
