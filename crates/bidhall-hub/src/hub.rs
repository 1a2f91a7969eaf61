//! Per-auction broadcast channels with explicit membership.
//!
//! The hub owns one `tokio::sync::broadcast` channel per auction plus an
//! explicit subscriber set — membership lifecycle is tied to join / leave /
//! disconnect calls, never to ambient global state. Dispatch is
//! fire-and-forget relative to the bid path: `publish` never waits on a
//! receiver and never reports delivery failures to its caller.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use bidhall_types::{AuctionEvent, AuctionId, BidhallError, HubConfig, Result, SubscriberId};
use tokio::sync::broadcast;

/// One auction's channel: the sender plus who is currently joined.
struct AuctionChannel {
    tx: broadcast::Sender<AuctionEvent>,
    members: HashSet<SubscriberId>,
}

/// A subscriber's handle on one auction's live updates.
///
/// Dropping the feed stops delivery to this subscriber; call
/// [`BroadcastHub::leave`] as well to release the membership slot.
pub struct LiveFeed {
    pub auction_id: AuctionId,
    pub subscriber: SubscriberId,
    rx: broadcast::Receiver<AuctionEvent>,
}

impl LiveFeed {
    /// Next event if one is ready, without waiting.
    ///
    /// A lagged feed (ring buffer overrun) skips to the oldest event still
    /// retained — the at-least-once, no-replay contract.
    pub fn try_next(&mut self) -> Option<AuctionEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        auction = %self.auction_id,
                        subscriber = %self.subscriber,
                        skipped,
                        "live feed lagged"
                    );
                }
                Err(
                    broadcast::error::TryRecvError::Empty
                    | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }

    /// Wait for the next event. Returns `None` once the channel is gone
    /// (auction torn down and backlog drained).
    pub async fn next(&mut self) -> Option<AuctionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        auction = %self.auction_id,
                        subscriber = %self.subscriber,
                        skipped,
                        "live feed lagged"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Fans auction events out to per-auction subscriber channels.
pub struct BroadcastHub {
    channels: RwLock<HashMap<AuctionId, AuctionChannel>>,
    capacity: usize,
}

impl BroadcastHub {
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: config.channel_capacity,
        }
    }

    /// Join an auction's channel and get a live feed.
    ///
    /// Idempotent on membership: a subscriber joining twice occupies one
    /// membership slot. The returned feed supersedes any feed from an
    /// earlier join.
    ///
    /// # Errors
    /// Returns `Internal` only if the channel registry is poisoned.
    pub fn join(&self, auction_id: AuctionId, subscriber: SubscriberId) -> Result<LiveFeed> {
        let mut channels = self.write_channels()?;
        let channel = channels.entry(auction_id).or_insert_with(|| {
            let (tx, _rx) = broadcast::channel(self.capacity);
            AuctionChannel {
                tx,
                members: HashSet::new(),
            }
        });
        channel.members.insert(subscriber);
        tracing::debug!(
            auction = %auction_id,
            subscriber = %subscriber,
            members = channel.members.len(),
            "subscriber joined"
        );
        Ok(LiveFeed {
            auction_id,
            subscriber,
            rx: channel.tx.subscribe(),
        })
    }

    /// Leave an auction's channel. Idempotent: leaving a channel the
    /// subscriber is not in (or that doesn't exist) is a no-op.
    ///
    /// # Errors
    /// Returns `Internal` only if the channel registry is poisoned.
    pub fn leave(&self, auction_id: AuctionId, subscriber: SubscriberId) -> Result<()> {
        let mut channels = self.write_channels()?;
        if let Some(channel) = channels.get_mut(&auction_id) {
            channel.members.remove(&subscriber);
            if channel.members.is_empty() {
                // Last member out tears the channel down; lingering feeds
                // drain their backlog and then see Closed.
                channels.remove(&auction_id);
            }
        }
        Ok(())
    }

    /// Remove a subscriber from every channel (connection closed).
    ///
    /// # Errors
    /// Returns `Internal` only if the channel registry is poisoned.
    pub fn disconnect(&self, subscriber: SubscriberId) -> Result<()> {
        let mut channels = self.write_channels()?;
        channels.retain(|_, channel| {
            channel.members.remove(&subscriber);
            !channel.members.is_empty()
        });
        Ok(())
    }

    /// Publish an event to its auction's channel. Best-effort: a missing
    /// channel or absent receivers is logged and swallowed — delivery
    /// problems never reach the bidder's response path.
    pub fn publish(&self, event: AuctionEvent) {
        let auction_id = event.auction_id();
        let Ok(channels) = self.channels.read() else {
            tracing::warn!(auction = %auction_id, "channel registry poisoned, event dropped");
            return;
        };
        match channels.get(&auction_id) {
            Some(channel) => match channel.tx.send(event) {
                Ok(receivers) => {
                    tracing::debug!(auction = %auction_id, receivers, "event published");
                }
                Err(_) => {
                    tracing::debug!(auction = %auction_id, "no live receivers, event dropped");
                }
            },
            None => {
                tracing::debug!(auction = %auction_id, "no channel, event dropped");
            }
        }
    }

    /// Current member count of an auction's channel.
    #[must_use]
    pub fn member_count(&self, auction_id: AuctionId) -> usize {
        self.channels
            .read()
            .map_or(0, |channels| {
                channels.get(&auction_id).map_or(0, |c| c.members.len())
            })
    }

    /// Number of auctions with at least one subscriber.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.read().map_or(0, |channels| channels.len())
    }

    fn write_channels(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<AuctionId, AuctionChannel>>> {
        self.channels
            .write()
            .map_err(|_| BidhallError::Internal("channel registry poisoned".to_string()))
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
