use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::data::models::{CatalogError, LoadingStatus};
use crate::data::repositories::{JsonFetcher, PROMPTS_FILE};
use crate::features::catalog::index::CatalogIndex;

type LoadFuture = Shared<BoxFuture<'static, Result<usize, CatalogError>>>;

/// Small built-in dataset installed when the very first load fails.
const FALLBACK_PROMPTS: &str = r#"[
    {"id": 1, "title": "Writing Assistant", "category": "Writing",
     "content": "你是一位专业的写作助手，请帮我润色下面这段文字，使其更加流畅自然。",
     "content_en": "You are a professional writing assistant. Polish the following text so it reads fluently and naturally."},
    {"id": 2, "title": "Code Reviewer", "category": "Programming",
     "content": "请作为资深工程师审查以下代码，指出潜在的缺陷并给出改进建议。",
     "content_en": "Act as a senior engineer and review the following code. Point out potential defects and suggest improvements."},
    {"id": 3, "title": "Translator", "categories": ["Language", "Writing"],
     "content": "请将以下内容翻译成英文，保持原文的语气和风格。",
     "content_en": "Translate the following content into English while keeping the tone and style of the original."}
]"#;

/// Owns the catalog index and serializes loads into it.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    fetcher: Arc<dyn JsonFetcher>,
    timeout: Duration,
    index: RwLock<Arc<CatalogIndex>>,
    status: RwLock<LoadingStatus>,
    in_flight: Mutex<Option<LoadFuture>>,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, timeout: Duration) -> Self {
        CatalogService {
            inner: Arc::new(CatalogInner {
                fetcher,
                timeout,
                index: RwLock::new(Arc::new(CatalogIndex::new())),
                status: RwLock::new(LoadingStatus::default()),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Snapshot of the current index; later loads never mutate it.
    pub fn index(&self) -> Arc<CatalogIndex> {
        self.inner.index.read().clone()
    }

    pub fn status(&self) -> LoadingStatus {
        self.inner.status.read().clone()
    }

    /// Fetches `prompts.json` and replaces the catalog. Callers arriving while
    /// a load is running wait for that load instead of starting another.
    pub async fn load(&self) -> Result<usize, CatalogError> {
        let shared = {
            let mut slot = self.inner.in_flight.lock();
            match slot.as_ref() {
                Some(running) => running.clone(),
                None => {
                    let inner = self.inner.clone();
                    let fut = async move {
                        let result = inner.load_once().await;
                        inner.in_flight.lock().take();
                        result
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
}

impl CatalogInner {
    async fn load_once(&self) -> Result<usize, CatalogError> {
        self.status.write().is_loading = true;

        let result = self.fetch_records().await;
        let mut status = self.status.write();
        status.is_loading = false;

        match result {
            Ok(records) => {
                let index = CatalogIndex::from_raw(&records);
                let count = index.len();
                status.error = None;
                status.last_updated = Some(Utc::now());
                status.prompt_count = count;
                status.category_count = index.categories().len();
                status.using_fallback = false;
                *self.index.write() = Arc::new(index);
                log::info!("Loaded {} prompts", count);
                Ok(count)
            }
            Err(e) => {
                log::error!("Failed to load prompts: {}", e);
                status.error = Some(e.to_string());
                if self.index.read().is_empty() {
                    let index = fallback_index();
                    log::warn!("Using built-in fallback catalog ({} prompts)", index.len());
                    status.prompt_count = index.len();
                    status.category_count = index.categories().len();
                    status.using_fallback = true;
                    *self.index.write() = Arc::new(index);
                }
                Err(e)
            }
        }
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, CatalogError> {
        let body = tokio::time::timeout(self.timeout, self.fetcher.fetch_json(PROMPTS_FILE))
            .await
            .map_err(|_| {
                CatalogError::FetchFailure(format!(
                    "{}: timed out after {:?}",
                    PROMPTS_FILE, self.timeout
                ))
            })??;
        extract_records(body)
    }
}

/// Accepts a bare array or `{ "prompts": [...] }`.
pub fn extract_records(body: Value) -> Result<Vec<Value>, CatalogError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("prompts") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(CatalogError::MalformedData(
                "expected a \"prompts\" array".to_string(),
            )),
        },
        _ => Err(CatalogError::MalformedData(
            "expected an array of prompts".to_string(),
        )),
    }
}

fn fallback_index() -> CatalogIndex {
    let records: Vec<Value> = serde_json::from_str(FALLBACK_PROMPTS).unwrap_or_default();
    CatalogIndex::from_raw(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays queued responses, sleeping `delay` before each.
    struct ScriptedFetcher {
        calls: AtomicUsize,
        delay: Duration,
        responses: Mutex<Vec<Result<Value, CatalogError>>>,
    }

    impl ScriptedFetcher {
        fn new(delay: Duration, mut responses: Vec<Result<Value, CatalogError>>) -> Arc<Self> {
            responses.reverse();
            Arc::new(ScriptedFetcher {
                calls: AtomicUsize::new(0),
                delay,
                responses: Mutex::new(responses),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JsonFetcher for ScriptedFetcher {
        async fn fetch_json(&self, _name: &str) -> Result<Value, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.responses
                .lock()
                .pop()
                .unwrap_or_else(|| Err(CatalogError::FetchFailure("no response".to_string())))
        }
    }

    fn service(fetcher: Arc<ScriptedFetcher>, timeout: Duration) -> CatalogService {
        CatalogService::new(fetcher, timeout)
    }

    #[tokio::test]
    async fn loads_wrapped_prompts_object() {
        let fetcher = ScriptedFetcher::new(
            Duration::ZERO,
            vec![Ok(json!({"prompts": [{"title": "A", "category": "Writing"}, {"content": "B"}]}))],
        );
        let catalog = service(fetcher, Duration::from_secs(1));

        assert_eq!(catalog.load().await, Ok(2));
        let index = catalog.index();
        assert_eq!(index.categories(), ["Uncategorized", "Writing"]);

        let status = catalog.status();
        assert!(!status.is_loading);
        assert!(status.last_updated.is_some());
        assert_eq!(status.prompt_count, 2);
        assert_eq!(status.category_count, 2);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let fetcher = ScriptedFetcher::new(
            Duration::from_millis(50),
            vec![Ok(json!([{"title": "A"}, {"title": "B"}, {"title": "C"}]))],
        );
        let catalog = service(fetcher.clone(), Duration::from_secs(1));

        let (a, b, c) = tokio::join!(catalog.load(), catalog.load(), catalog.load());
        assert_eq!((a, b, c), (Ok(3), Ok(3), Ok(3)));
        assert_eq!(fetcher.calls(), 1);

        // A later load starts a fresh fetch
        let _ = catalog.load().await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn first_failure_installs_fallback_dataset() {
        let fetcher = ScriptedFetcher::new(
            Duration::ZERO,
            vec![Err(CatalogError::FetchFailure("HTTP status 404".to_string()))],
        );
        let catalog = service(fetcher, Duration::from_secs(1));

        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailure(_)));
        assert!(!catalog.index().is_empty());
        let status = catalog.status();
        assert!(status.using_fallback);
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_catalog() {
        let fetcher = ScriptedFetcher::new(
            Duration::ZERO,
            vec![Ok(json!([{"id": 9, "title": "Keep me"}])), Ok(json!({"items": []}))],
        );
        let catalog = service(fetcher, Duration::from_secs(1));

        catalog.load().await.unwrap();
        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData(_)));

        let index = catalog.index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.by_id("9").map(|r| r.title.as_str()), Some("Keep me"));
        assert!(!catalog.status().using_fallback);
    }

    #[tokio::test]
    async fn slow_fetch_times_out() {
        let fetcher = ScriptedFetcher::new(Duration::from_millis(200), vec![Ok(json!([]))]);
        let catalog = service(fetcher, Duration::from_millis(20));

        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailure(msg) if msg.contains("timed out")));
        assert!(catalog.status().using_fallback);
    }

    #[test]
    fn extract_records_shapes() {
        assert_eq!(extract_records(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(extract_records(json!({"prompts": [1]})).unwrap().len(), 1);
        assert!(extract_records(json!({"prompts": {}})).is_err());
        assert!(extract_records(json!("nope")).is_err());
    }

    #[test]
    fn fallback_dataset_parses() {
        let index = fallback_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.categories(), ["Language", "Programming", "Writing"]);
    }
}
