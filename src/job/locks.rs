//! Per-device exclusive acquisition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per device key. A second job for the same device waits
/// until the first has released it.
#[derive(Clone, Default)]
pub struct DeviceLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl DeviceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `key`. Released when the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody holds or waits on are dropped
            locks.retain(|k, lock| k == key || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Whether a job currently holds `key`.
    pub fn is_held(&self, key: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.get(key).is_some_and(|lock| lock.try_lock().is_err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = DeviceLocks::new();
        let guard = locks.acquire("/dev/ttyUSB0").await;
        assert!(locks.is_held("/dev/ttyUSB0"));

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("/dev/ttyUSB0").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!locks.is_held("/dev/ttyUSB0"));
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = DeviceLocks::new();
        let _a = locks.acquire("usb:04b8:0202").await;
        let _b = locks.acquire("/dev/ttyUSB0").await;
        assert!(locks.is_held("usb:04b8:0202"));
        assert!(locks.is_held("/dev/ttyUSB0"));
    }
}
