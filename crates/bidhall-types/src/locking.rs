//! Bounded mutex acquisition.
//!
//! Every per-auction and per-account lock in the workspace goes through
//! [`lock_with_timeout`]: no operation blocks indefinitely. When the budget
//! is exhausted the caller gets [`BidhallError::Unavailable`] — the one
//! error kind that is safe to retry.

use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use crate::{constants, BidhallError, Result};

/// Acquire `lock` within `timeout`, retrying with a short sleep between
/// attempts.
///
/// # Errors
/// - [`BidhallError::Unavailable`] when the deadline passes under contention
/// - [`BidhallError::Internal`] if the lock was poisoned by a panicked holder
pub fn lock_with_timeout<T>(lock: &Mutex<T>, timeout: Duration) -> Result<MutexGuard<'_, T>> {
    let deadline = Instant::now() + timeout;
    loop {
        match lock.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::WouldBlock) => {
                if Instant::now() >= deadline {
                    return Err(BidhallError::Unavailable {
                        reason: format!("lock not acquired within {}ms", timeout.as_millis()),
                    });
                }
                thread::sleep(Duration::from_micros(constants::LOCK_RETRY_SLEEP_US));
            }
            Err(TryLockError::Poisoned(_)) => {
                return Err(BidhallError::Internal(
                    "lock poisoned by a panicked holder".to_string(),
                ));
            }
        }
    }
}
