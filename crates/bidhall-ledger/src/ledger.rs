//! Token ledger — balance management for the marketplace.
//!
//! The `TokenLedger` is the source of truth for all token balance state.
//! All mutations are atomic: either the full operation succeeds or the
//! balance is unchanged. Per-user serialization comes from a dedicated
//! mutex per account, so concurrent debits by the same user (bids on
//! different auctions) can never jointly overdraw.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use bidhall_types::locking::lock_with_timeout;
use bidhall_types::{
    constants, BidhallError, PurchaseId, PurchaseTokensRequest, Result, TokenPurchase,
    UserAccount, UserId,
};

/// One account behind its per-user mutex.
struct AccountSlot {
    profile: UserAccount,
    /// The welcome bonus is granted exactly once.
    welcome_granted: bool,
}

/// Registry of accounts plus the email uniqueness index.
#[derive(Default)]
struct Registry {
    by_id: HashMap<UserId, Arc<Mutex<AccountSlot>>>,
    emails: HashSet<String>,
}

/// Result of a completed token purchase.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub purchase: TokenPurchase,
    pub new_balance: u64,
}

/// Manages user accounts and token balances.
///
/// The ledger is the only component allowed to write `UserAccount::tokens`.
pub struct TokenLedger {
    registry: RwLock<Registry>,
    /// Append-only purchase log.
    purchases: RwLock<Vec<TokenPurchase>>,
    /// Budget for acquiring any per-account lock.
    lock_timeout: Duration,
}

impl TokenLedger {
    /// Create an empty ledger with the default lock budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lock_timeout(Duration::from_millis(constants::DEFAULT_LOCK_TIMEOUT_MS))
    }

    /// Create an empty ledger with a caller-supplied lock budget.
    #[must_use]
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            purchases: RwLock::new(Vec::new()),
            lock_timeout,
        }
    }

    /// Open an account. Balances always start at zero — the welcome bonus
    /// is a separate ledger operation.
    ///
    /// # Errors
    /// Returns `DuplicateAccount` if the id or email is already registered.
    pub fn open_account(&self, mut profile: UserAccount) -> Result<()> {
        let mut registry = self.write_registry()?;
        if registry.by_id.contains_key(&profile.id) {
            return Err(BidhallError::DuplicateAccount {
                reason: format!("user id {} already registered", profile.id),
            });
        }
        if registry.emails.contains(&profile.email) {
            return Err(BidhallError::DuplicateAccount {
                reason: format!("email {} already registered", profile.email),
            });
        }

        profile.tokens = 0;
        registry.emails.insert(profile.email.clone());
        registry.by_id.insert(
            profile.id,
            Arc::new(Mutex::new(AccountSlot {
                profile,
                welcome_granted: false,
            })),
        );
        Ok(())
    }

    /// Registration path: open the account and grant the welcome bonus.
    /// Returns the resulting balance.
    ///
    /// # Errors
    /// See [`TokenLedger::open_account`] and [`TokenLedger::grant_welcome_bonus`].
    pub fn register(&self, profile: UserAccount) -> Result<u64> {
        let user_id = profile.id;
        self.open_account(profile)?;
        self.grant_welcome_bonus(user_id)
    }

    /// Credit the fixed welcome bonus, exactly once per account.
    ///
    /// # Errors
    /// - `AccountNotFound` if the account doesn't exist
    /// - `BonusAlreadyGranted` on a repeat grant
    pub fn grant_welcome_bonus(&self, user_id: UserId) -> Result<u64> {
        let slot = self.slot(user_id)?;
        let mut account = lock_with_timeout(&slot, self.lock_timeout)?;

        if account.welcome_granted {
            return Err(BidhallError::BonusAlreadyGranted(user_id));
        }
        account.welcome_granted = true;
        account.profile.tokens += constants::WELCOME_BONUS_TOKENS;

        tracing::info!(
            user = %user_id,
            granted = constants::WELCOME_BONUS_TOKENS,
            balance = account.profile.tokens,
            "welcome bonus granted"
        );
        Ok(account.profile.tokens)
    }

    /// Purchase tokens: record the purchase, run the (simulated) payment,
    /// and credit the tokens.
    ///
    /// The ledger credits exactly `request.amount` — package bonus tokens
    /// are folded into the request by the caller.
    ///
    /// # Errors
    /// - `Validation` for a malformed request
    /// - `AccountNotFound` if the account doesn't exist
    /// - `Unavailable` on lock timeout
    pub fn purchase_tokens(
        &self,
        user_id: UserId,
        request: &PurchaseTokensRequest,
    ) -> Result<PurchaseReceipt> {
        request.validate()?;
        let slot = self.slot(user_id)?;

        let mut purchase = TokenPurchase::new(user_id, request.amount, request.price);
        // Payment integration is simulated: the processor always approves.
        purchase.mark_completed()?;

        let new_balance = {
            let mut account = lock_with_timeout(&slot, self.lock_timeout)?;
            account.profile.tokens += purchase.amount;
            account.profile.tokens
        };

        self.write_purchases()?.push(purchase.clone());

        tracing::info!(
            user = %user_id,
            purchase = %purchase.id,
            amount = purchase.amount,
            price = %purchase.price,
            balance = new_balance,
            "token purchase completed"
        );
        Ok(PurchaseReceipt {
            purchase,
            new_balance,
        })
    }

    /// Debit tokens. Fails without touching the balance if it would go
    /// negative.
    ///
    /// # Errors
    /// - `AccountNotFound` if the account doesn't exist
    /// - `InsufficientTokens` if balance < `amount`
    /// - `Unavailable` on lock timeout
    pub fn debit(&self, user_id: UserId, amount: u64) -> Result<u64> {
        let slot = self.slot(user_id)?;
        let mut account = lock_with_timeout(&slot, self.lock_timeout)?;

        if account.profile.tokens < amount {
            return Err(BidhallError::InsufficientTokens {
                needed: amount,
                available: account.profile.tokens,
            });
        }
        account.profile.tokens -= amount;
        Ok(account.profile.tokens)
    }

    /// Credit tokens unconditionally.
    ///
    /// # Errors
    /// - `AccountNotFound` if the account doesn't exist
    /// - `Unavailable` on lock timeout
    pub fn credit(&self, user_id: UserId, amount: u64) -> Result<u64> {
        let slot = self.slot(user_id)?;
        let mut account = lock_with_timeout(&slot, self.lock_timeout)?;
        account.profile.tokens += amount;
        Ok(account.profile.tokens)
    }

    /// Current token balance.
    ///
    /// # Errors
    /// Returns `AccountNotFound` if the account doesn't exist.
    pub fn balance(&self, user_id: UserId) -> Result<u64> {
        let slot = self.slot(user_id)?;
        let account = lock_with_timeout(&slot, self.lock_timeout)?;
        Ok(account.profile.tokens)
    }

    /// Snapshot of the account profile, including the live balance.
    ///
    /// # Errors
    /// Returns `AccountNotFound` if the account doesn't exist.
    pub fn profile(&self, user_id: UserId) -> Result<UserAccount> {
        let slot = self.slot(user_id)?;
        let account = lock_with_timeout(&slot, self.lock_timeout)?;
        Ok(account.profile.clone())
    }

    /// Purchases made by a user, newest first.
    ///
    /// # Errors
    /// Returns `Internal` if the purchase log is poisoned.
    pub fn purchases_for(&self, user_id: UserId) -> Result<Vec<TokenPurchase>> {
        let log = self.read_purchases()?;
        let mut purchases: Vec<TokenPurchase> = log
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(purchases)
    }

    /// Look up a purchase record.
    ///
    /// # Errors
    /// Returns `PurchaseNotFound` if no such record exists.
    pub fn purchase(&self, purchase_id: PurchaseId) -> Result<TokenPurchase> {
        self.read_purchases()?
            .iter()
            .find(|p| p.id == purchase_id)
            .cloned()
            .ok_or(BidhallError::PurchaseNotFound(purchase_id))
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.registry.read().map_or(0, |r| r.by_id.len())
    }

    fn slot(&self, user_id: UserId) -> Result<Arc<Mutex<AccountSlot>>> {
        self.read_registry()?
            .by_id
            .get(&user_id)
            .cloned()
            .ok_or(BidhallError::AccountNotFound(user_id))
    }

    fn read_registry(&self) -> Result<std::sync::RwLockReadGuard<'_, Registry>> {
        self.registry
            .read()
            .map_err(|_| BidhallError::Internal("account registry poisoned".to_string()))
    }

    fn write_registry(&self) -> Result<std::sync::RwLockWriteGuard<'_, Registry>> {
        self.registry
            .write()
            .map_err(|_| BidhallError::Internal("account registry poisoned".to_string()))
    }

    fn read_purchases(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<TokenPurchase>>> {
        self.purchases
            .read()
            .map_err(|_| BidhallError::Internal("purchase log poisoned".to_string()))
    }

    fn write_purchases(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<TokenPurchase>>> {
        self.purchases
            .write()
            .map_err(|_| BidhallError::Internal("purchase log poisoned".to_string()))
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new()
    }
}
