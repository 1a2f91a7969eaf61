//! In-memory listing and bid storage.
//!
//! Stands in for the external Ledger Store collaborator, which guarantees
//! at least per-document atomic update. Each listing sits behind its own
//! mutex — holding it serializes the validate-then-apply sequence for that
//! auction (the per-auction transactional scope). Bids are an append-only
//! log, never edited or deleted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use bidhall_types::locking::lock_with_timeout;
use bidhall_types::{AuctionId, Bid, BidhallError, Listing, ListingFilter, Result, UserId};

/// Listing and bid storage with per-document locking.
pub struct LedgerStore {
    listings: RwLock<HashMap<AuctionId, Arc<Mutex<Listing>>>>,
    /// Append-only bid log.
    bids: RwLock<Vec<Bid>>,
    /// Budget for acquiring a per-listing lock.
    lock_timeout: Duration,
}

impl LedgerStore {
    #[must_use]
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            listings: RwLock::new(HashMap::new()),
            bids: RwLock::new(Vec::new()),
            lock_timeout,
        }
    }

    /// Insert a freshly created listing.
    ///
    /// # Errors
    /// Returns `Internal` on an id collision — ids are generated, never
    /// caller-supplied, so a collision is a bug.
    pub fn insert_listing(&self, listing: Listing) -> Result<()> {
        let mut listings = self.write_listings()?;
        if listings.contains_key(&listing.id) {
            return Err(BidhallError::Internal(format!(
                "listing id collision: {}",
                listing.id
            )));
        }
        listings.insert(listing.id, Arc::new(Mutex::new(listing)));
        Ok(())
    }

    /// The lockable document for one listing. Callers lock it with
    /// [`lock_with_timeout`] to enter that auction's transactional scope.
    ///
    /// # Errors
    /// Returns `ListingNotFound` if absent.
    pub fn listing(&self, id: AuctionId) -> Result<Arc<Mutex<Listing>>> {
        self.read_listings()?
            .get(&id)
            .cloned()
            .ok_or(BidhallError::ListingNotFound(id))
    }

    /// A point-in-time copy of one listing.
    ///
    /// # Errors
    /// - `ListingNotFound` if absent
    /// - `Unavailable` on lock timeout
    pub fn snapshot(&self, id: AuctionId) -> Result<Listing> {
        let slot = self.listing(id)?;
        let listing = lock_with_timeout(&slot, self.lock_timeout)?;
        Ok(listing.clone())
    }

    /// Listings passing `filter`, newest creation first.
    ///
    /// # Errors
    /// Returns `Unavailable` if any listing's lock can't be acquired in time.
    pub fn listings_matching(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        let slots: Vec<Arc<Mutex<Listing>>> =
            self.read_listings()?.values().cloned().collect();

        let mut matching = Vec::new();
        for slot in slots {
            let listing = lock_with_timeout(&slot, self.lock_timeout)?;
            if filter.matches(&listing) {
                matching.push(listing.clone());
            }
        }
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    /// Append an accepted bid. Only ever called inside the bid's auction
    /// lock, so per-auction log order matches acceptance order.
    ///
    /// # Errors
    /// Returns `Internal` if the bid log is poisoned.
    pub fn append_bid(&self, bid: Bid) -> Result<()> {
        self.write_bids()?.push(bid);
        Ok(())
    }

    /// Bids on one auction, newest first.
    ///
    /// # Errors
    /// Returns `Internal` if the bid log is poisoned.
    pub fn bids_for_auction(&self, id: AuctionId) -> Result<Vec<Bid>> {
        let mut bids: Vec<Bid> = self
            .read_bids()?
            .iter()
            .filter(|b| b.auction_id == id)
            .cloned()
            .collect();
        bids.reverse(); // log order is acceptance order
        Ok(bids)
    }

    /// Bids placed by one user, newest first.
    ///
    /// # Errors
    /// Returns `Internal` if the bid log is poisoned.
    pub fn bids_by_bidder(&self, bidder: UserId) -> Result<Vec<Bid>> {
        let mut bids: Vec<Bid> = self
            .read_bids()?
            .iter()
            .filter(|b| b.bidder == bidder)
            .cloned()
            .collect();
        bids.reverse();
        Ok(bids)
    }

    /// Number of stored listings.
    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.read().map_or(0, |l| l.len())
    }

    /// Number of bids across all auctions.
    #[must_use]
    pub fn bid_count(&self) -> usize {
        self.bids.read().map_or(0, |b| b.len())
    }

    fn read_listings(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<AuctionId, Arc<Mutex<Listing>>>>> {
        self.listings
            .read()
            .map_err(|_| BidhallError::Internal("listing store poisoned".to_string()))
    }

    fn write_listings(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<AuctionId, Arc<Mutex<Listing>>>>> {
        self.listings
            .write()
            .map_err(|_| BidhallError::Internal("listing store poisoned".to_string()))
    }

    fn read_bids(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Bid>>> {
        self.bids
            .read()
            .map_err(|_| BidhallError::Internal("bid log poisoned".to_string()))
    }

    fn write_bids(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Bid>>> {
        self.bids
            .write()
            .map_err(|_| BidhallError::Internal("bid log poisoned".to_string()))
    }
}
