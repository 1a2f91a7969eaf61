//! # bidhall-hub
//!
//! **Broadcast plane**: fans auction state changes out to live viewers.
//!
//! ## Model
//!
//! Each auction has its own channel; subscribers join and leave it by id.
//! Publishing a [`bidhall_types::AuctionEvent`] delivers it to every
//! current member of that auction's channel:
//!
//! - **Best-effort, at-least-once** for connected subscribers — no
//!   persistence, no replay; join after an event and you miss it
//! - **Per-auction ordering**: events for one auction arrive in publish
//!   order (cross-auction ordering is not guaranteed)
//! - **Idempotent membership**: repeated join/leave changes nothing
//! - **Never blocks the publisher**: slow subscribers lag on a ring
//!   buffer; their failures are swallowed, never surfaced to the bidder

pub mod hub;

pub use hub::{BroadcastHub, LiveFeed};
