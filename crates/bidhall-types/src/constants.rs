//! System-wide constants for the BidHall marketplace core.

/// Tokens granted exactly once at registration.
pub const WELCOME_BONUS_TOKENS: u64 = 100;

/// List price per token in cents (USD). Packages may add bonus tokens on
/// top; the ledger itself credits exactly what it is asked to.
pub const TOKEN_UNIT_PRICE_CENTS: i64 = 10;

/// Default budget for acquiring a per-auction or per-account lock before
/// the operation fails with `Unavailable`.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 250;

/// Sleep between lock acquisition attempts (microseconds).
pub const LOCK_RETRY_SLEEP_US: u64 = 50;

/// Default ring-buffer capacity of a per-auction broadcast channel.
/// Slow subscribers past this depth lag (drop oldest), never block.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Maximum listing title length.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum listing description length.
pub const MAX_DESCRIPTION_LEN: usize = 5_000;

/// Maximum auction duration in hours (30 days).
pub const MAX_AUCTION_DURATION_HOURS: i64 = 720;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "BidHall";
