use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStore, StoreError};
use crate::linked_data::Cid;

/// Bounded retry schedule with linearly increasing delay.
///
/// Attempt `n` (1-based) that fails waits `(n - 1) * base_delay` before
///  attempt `n + 1`. After `max_attempts` failures the last error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            base_delay: Duration::from_millis(125),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the given failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    ///  attempts run out. Dropping the returned future cancels
    ///  any pending retry.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_not_found() => return Err(err),
                Err(err) if attempt < self.max_attempts => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}), will retry: {}",
                        what,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    tokio::time::sleep(self.delay_after(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!("{} failed {} times, giving up: {}", what, attempt, err);
                    return Err(err);
                }
            }
        }
    }
}

/// Decorator that retries transient store failures.
///  `NotFound` is an answer, not a failure, and is never retried.
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: ObjectStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for RetryingStore<S> {
    async fn get(&self, cid: &Cid) -> Result<Bytes, StoreError> {
        let inner = &self.inner;
        self.policy.run("store get", move || inner.get(cid)).await
    }

    async fn put(&self, codec: u64, data: Vec<u8>) -> Result<Cid, StoreError> {
        let inner = &self.inner;
        self.policy
            .run("store put", move || inner.put(codec, data.clone()))
            .await
    }

    async fn has(&self, cid: &Cid) -> Result<bool, StoreError> {
        let inner = &self.inner;
        self.policy.run("store has", move || inner.has(cid)).await
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::linked_data::{cid_for, LD_RAW_CODEC};
    use crate::store::MemoryStore;

    /// Fails the first `failures` calls of every kind
    #[derive(Debug, Clone)]
    struct FlakyStore {
        inner: MemoryStore,
        remaining: Arc<AtomicU32>,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                remaining: Arc::new(AtomicU32::new(failures)),
            }
        }

        fn trip(&self) -> Result<(), StoreError> {
            let left = self.remaining.load(Ordering::SeqCst);
            if left > 0 {
                self.remaining.store(left - 1, Ordering::SeqCst);
                return Err(anyhow::anyhow!("connection reset").into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStore for FlakyStore {
        async fn get(&self, cid: &Cid) -> Result<Bytes, StoreError> {
            self.trip()?;
            self.inner.get(cid).await
        }
        async fn put(&self, codec: u64, data: Vec<u8>) -> Result<Cid, StoreError> {
            self.trip()?;
            self.inner.put(codec, data).await
        }
        async fn has(&self, cid: &Cid) -> Result<bool, StoreError> {
            self.trip()?;
            self.inner.has(cid).await
        }
    }

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn test_delay_grows_linearly() {
        let policy = RetryPolicy::new(5, Duration::from_millis(125));
        assert_eq!(policy.delay_after(1), Duration::ZERO);
        assert_eq!(policy.delay_after(2), Duration::from_millis(125));
        assert_eq!(policy.delay_after(4), Duration::from_millis(375));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let store = RetryingStore::new(FlakyStore::new(2), fast(5));
        let cid = store.put(LD_RAW_CODEC, b"data".to_vec()).await.unwrap();
        assert_eq!(store.get(&cid).await.unwrap().as_ref(), b"data");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = RetryingStore::new(FlakyStore::new(10), fast(3));
        let result = store.put(LD_RAW_CODEC, b"data".to_vec()).await;
        assert!(matches!(result, Err(StoreError::Default(_))));
        // three attempts consumed three failures
        assert_eq!(store.inner().remaining.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let store = RetryingStore::new(MemoryStore::new(), fast(50));
        let cid = cid_for(LD_RAW_CODEC, b"absent");
        assert!(store.get(&cid).await.unwrap_err().is_not_found());
    }
}
