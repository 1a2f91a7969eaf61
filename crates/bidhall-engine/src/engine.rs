//! The auction engine — bid validation, atomic application, fan-out.
//!
//! `place_bid` is the heart of the system. Its preconditions run in a fixed
//! order, each with its own rejection, and everything — validation and
//! apply — happens inside the auction's lock so two bids can never both
//! pass against a stale current price. Token debit happens through the
//! ledger's own per-user lock, so concurrent bids by one bidder across
//! different auctions cannot jointly overdraw.

use std::sync::Arc;

use bidhall_ledger::TokenLedger;
use bidhall_hub::BroadcastHub;
use bidhall_types::locking::lock_with_timeout;
use bidhall_types::{
    AuctionEvent, AuctionId, Bid, BidhallError, CreateListingRequest, EngineConfig, Listing,
    ListingFilter, ListingKind, ListingStatus, PlaceBidRequest, Principal, Result,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::LedgerStore;

/// Confirmation returned to a successful bidder.
#[derive(Debug, Clone, Serialize)]
pub struct BidReceipt {
    pub bid: Bid,
    pub new_price: Decimal,
    /// The bidder's token balance after the debit.
    pub token_balance: u64,
}

/// A listing plus its bid history, newest bid first.
#[derive(Debug, Clone, Serialize)]
pub struct AuctionDetail {
    pub listing: Listing,
    pub bids: Vec<Bid>,
}

/// One of a user's bids, carrying a snapshot of its auction.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedBid {
    pub bid: Bid,
    pub auction: Listing,
}

/// Owns auction lifecycle and bid validation/application.
pub struct AuctionEngine {
    store: LedgerStore,
    ledger: Arc<TokenLedger>,
    hub: Arc<BroadcastHub>,
    config: EngineConfig,
}

impl AuctionEngine {
    #[must_use]
    pub fn new(ledger: Arc<TokenLedger>, hub: Arc<BroadcastHub>) -> Self {
        Self::with_config(ledger, hub, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(
        ledger: Arc<TokenLedger>,
        hub: Arc<BroadcastHub>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store: LedgerStore::new(config.lock_timeout),
            ledger,
            hub,
            config,
        }
    }

    /// Create a listing of either kind.
    ///
    /// # Errors
    /// - `Validation` for malformed fields (non-positive price or duration,
    ///   empty required fields)
    /// - `AccountNotFound` if the seller has no account
    pub fn create_listing(
        &self,
        seller: Principal,
        request: &CreateListingRequest,
    ) -> Result<Listing> {
        request.validate()?;
        // The principal is verified, but the account must exist in the ledger.
        self.ledger.balance(seller.user_id())?;

        let now = Utc::now();
        let ends_at = match request.kind {
            ListingKind::Auction => request
                .duration_hours
                .map(|hours| now + Duration::hours(hours)),
            ListingKind::FixedPrice => None,
        };
        let listing = Listing {
            id: AuctionId::new(),
            title: request.title.clone(),
            description: request.description.clone(),
            image: request.image.clone(),
            starting_price: request.starting_price,
            current_price: request.starting_price,
            seller: seller.user_id(),
            category: request.category.clone(),
            kind: request.kind,
            ends_at,
            status: ListingStatus::Active,
            created_at: now,
        };
        self.store.insert_listing(listing.clone())?;

        tracing::info!(
            listing = %listing.id,
            seller = %seller.user_id(),
            kind = %listing.kind,
            starting_price = %listing.starting_price,
            "listing created"
        );
        Ok(listing)
    }

    /// Create an auction listing.
    ///
    /// # Errors
    /// As [`AuctionEngine::create_listing`], plus `Validation` if the
    /// request is not an auction request.
    pub fn create_auction(
        &self,
        seller: Principal,
        request: &CreateListingRequest,
    ) -> Result<Listing> {
        if request.kind != ListingKind::Auction {
            return Err(BidhallError::Validation {
                reason: "create_auction requires an auction request".to_string(),
            });
        }
        self.create_listing(seller, request)
    }

    /// Validate and apply a bid as one atomic unit, then fan it out.
    ///
    /// Preconditions, in order, each with its own rejection:
    /// 1. auction exists — `ListingNotFound`
    /// 2. listing is an auction — `NotAnAuction`
    /// 3. bidding window is open — `AuctionClosed` (a bid at exactly the
    ///    deadline is already too late)
    /// 4. amount strictly exceeds the current price — `BidTooLow`
    /// 5. bidder can cover the committed tokens — `InsufficientTokens`
    ///    (enforced by the ledger debit itself)
    ///
    /// On success the bid is appended, the current price raised, and the
    /// committed tokens debited; any rejection leaves all state unchanged.
    /// The `NewBid` event is published after commit, fire-and-forget — a
    /// slow or disconnected viewer never delays the bidder's confirmation.
    ///
    /// # Errors
    /// The rejections above, `Validation` for a malformed request, or
    /// `Unavailable` on lock contention (safe to retry).
    pub fn place_bid(&self, bidder: Principal, request: &PlaceBidRequest) -> Result<BidReceipt> {
        request.validate()?;

        let slot = self.store.listing(request.auction_id)?;
        let mut listing = lock_with_timeout(&slot, self.config.lock_timeout)?;

        if !listing.is_auction() {
            return Err(BidhallError::NotAnAuction(listing.id));
        }
        if !listing.is_open_at(Utc::now()) {
            return Err(BidhallError::AuctionClosed(listing.id));
        }
        if request.amount <= listing.current_price {
            return Err(BidhallError::BidTooLow {
                bid: request.amount,
                current: listing.current_price,
            });
        }

        // Last fallible step: the ledger's per-user lock makes the debit the
        // authoritative balance check. After it succeeds the apply below
        // cannot fail, so no partial state is ever observable.
        let token_balance = self
            .ledger
            .debit(bidder.user_id(), request.tokens_to_commit)?;

        let bid = Bid::new(
            request.auction_id,
            bidder.user_id(),
            request.amount,
            request.tokens_to_commit,
        );
        listing.raise_current_price(request.amount)?;
        self.store.append_bid(bid.clone())?;
        let new_price = listing.current_price;
        drop(listing);

        self.hub.publish(AuctionEvent::NewBid {
            auction_id: request.auction_id,
            bid: bid.clone(),
            new_price,
        });

        tracing::info!(
            auction = %request.auction_id,
            bid = %bid.id,
            bidder = %bidder.user_id(),
            amount = %new_price,
            tokens = bid.tokens_committed,
            "bid accepted"
        );
        Ok(BidReceipt {
            bid,
            new_price,
            token_balance,
        })
    }

    /// Direct access to the listing/bid store, for collaborators that
    /// manage listing lifecycle outside the bid path (e.g. a finalizer).
    #[must_use]
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Listings passing `filter` (status defaults to ACTIVE), newest first.
    ///
    /// # Errors
    /// Returns `Unavailable` on lock contention.
    pub fn list_auctions(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        self.store.listings_matching(filter)
    }

    /// One listing with its bid history, newest bid first.
    ///
    /// # Errors
    /// Returns `ListingNotFound` if absent.
    pub fn get_auction(&self, id: AuctionId) -> Result<AuctionDetail> {
        let listing = self.store.snapshot(id)?;
        let bids = self.store.bids_for_auction(id)?;
        Ok(AuctionDetail { listing, bids })
    }

    /// All bids placed by `bidder`, newest first, each with its auction.
    ///
    /// # Errors
    /// Returns `Unavailable` on lock contention.
    pub fn bids_by(&self, bidder: Principal) -> Result<Vec<PlacedBid>> {
        let bids = self.store.bids_by_bidder(bidder.user_id())?;
        let mut placed = Vec::with_capacity(bids.len());
        for bid in bids {
            let auction = self.store.snapshot(bid.auction_id)?;
            placed.push(PlacedBid { bid, auction });
        }
        Ok(placed)
    }
}
