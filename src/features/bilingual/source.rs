use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::data::models::{CatalogError, PromptRecord, ResolvedContent};
use crate::data::repositories::{BILINGUAL_FILE, JsonFetcher};
use crate::features::bilingual::resolver;

type SourceFuture = Shared<BoxFuture<'static, Arc<Value>>>;

/// Lazily fetched and cached `rules_bilingual.json`.
#[derive(Clone)]
pub struct BilingualSource {
    inner: Arc<SourceInner>,
}

struct SourceInner {
    fetcher: Arc<dyn JsonFetcher>,
    timeout: Duration,
    cached: RwLock<Option<Arc<Value>>>,
    in_flight: Mutex<Option<SourceFuture>>,
}

impl BilingualSource {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, timeout: Duration) -> Self {
        BilingualSource {
            inner: Arc::new(SourceInner {
                fetcher,
                timeout,
                cached: RwLock::new(None),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Current dataset. Concurrent callers on a cold cache share one fetch.
    /// Failures are not cached and yield `Value::Null`, which the resolver
    /// treats as a malformed source.
    pub async fn get(&self) -> Arc<Value> {
        if let Some(cached) = self.inner.cached.read().clone() {
            return cached;
        }

        let shared = {
            let mut slot = self.inner.in_flight.lock();
            // A fetch may have finished while we waited for the slot
            if let Some(cached) = self.inner.cached.read().clone() {
                return cached;
            }
            match slot.as_ref() {
                Some(running) => running.clone(),
                None => {
                    let inner = self.inner.clone();
                    let fut = async move {
                        let value = inner.fetch_and_cache().await;
                        inner.in_flight.lock().take();
                        value
                    }
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        shared.await
    }

    pub async fn resolve(&self, record: &PromptRecord) -> ResolvedContent {
        let source = self.get().await;
        resolver::resolve(record, &source)
    }

    pub fn refresh(&self) {
        self.inner.cached.write().take();
    }
}

impl SourceInner {
    async fn fetch_and_cache(&self) -> Arc<Value> {
        match self.fetch().await {
            Ok(value) => {
                if !value.is_array() {
                    log::warn!("{} is not an array; falling back to auto-translation", BILINGUAL_FILE);
                }
                let value = Arc::new(value);
                *self.cached.write() = Some(value.clone());
                value
            }
            Err(e) => {
                log::error!("Failed to load bilingual source: {}", e);
                Arc::new(Value::Null)
            }
        }
    }

    async fn fetch(&self) -> Result<Value, CatalogError> {
        tokio::time::timeout(self.timeout, self.fetcher.fetch_json(BILINGUAL_FILE))
            .await
            .map_err(|_| {
                CatalogError::FetchFailure(format!(
                    "{}: timed out after {:?}",
                    BILINGUAL_FILE, self.timeout
                ))
            })?
    }
}
