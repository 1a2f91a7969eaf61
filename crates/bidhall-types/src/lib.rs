//! # bidhall-types
//!
//! Shared types, errors, and configuration for the **BidHall** auction
//! marketplace core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`UserId`], [`BidId`], [`PurchaseId`], [`SubscriberId`]
//! - **Identity**: [`Principal`] (the opaque verified identity a request acts as)
//! - **Listing model**: [`Listing`], [`ListingKind`], [`ListingStatus`]
//! - **Bid model**: [`Bid`] (append-only, immutable once created)
//! - **Token model**: [`TokenPurchase`], [`PurchaseStatus`], [`UserAccount`]
//! - **Events**: [`AuctionEvent`] fanned out by the broadcast hub
//! - **Requests**: [`CreateListingRequest`], [`PlaceBidRequest`],
//!   [`PurchaseTokensRequest`], [`ListingFilter`]
//! - **Configuration**: [`EngineConfig`], [`HubConfig`]
//! - **Errors**: [`BidhallError`] with `BH_ERR_` prefix codes
//! - **Locking**: [`locking::lock_with_timeout`] — bounded mutex acquisition
//! - **Constants**: system-wide limits and defaults

pub mod account;
pub mod bid;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod listing;
pub mod locking;
pub mod purchase;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use bidhall_types::{Listing, Bid, BidhallError, ...};

pub use account::*;
pub use bid::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use listing::*;
pub use purchase::*;
pub use request::*;

// Constants are accessed via `bidhall_types::constants::FOO`
// (not re-exported to avoid name collisions).
