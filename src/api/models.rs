//! In-process cache for the model list.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::types::ModelInfo;

pub const DEFAULT_MODEL_TTL: Duration = Duration::from_secs(60);
const MIN_TTL: Duration = Duration::from_secs(1);

struct CachedModels {
    models: Arc<Vec<ModelInfo>>,
    expires_at: Instant,
}

/// Time-bounded model list, owned by the component that lists models.
///
/// Concurrent misses wait for the fetch already in flight instead of issuing
/// their own. Failed fetches are not cached.
pub struct ModelCache {
    ttl: Duration,
    state: Mutex<Option<CachedModels>>,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_TTL)
    }
}

impl ModelCache {
    /// TTLs below one second are raised to one second.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.max(MIN_TTL),
            state: Mutex::new(None),
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<Vec<ModelInfo>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ModelInfo>>>,
    {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref()
            && Instant::now() < cached.expires_at
        {
            tracing::debug!(count = cached.models.len(), "model cache hit");
            return Ok(Arc::clone(&cached.models));
        }

        tracing::debug!("model cache miss");
        let models = Arc::new(fetch().await?);
        *state = Some(CachedModels {
            models: Arc::clone(&models),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(models)
    }
}

/// Case-insensitive substring match on id and display name, capped at `limit`.
/// An empty query matches everything.
pub fn filter_models<'a>(query: &str, models: &'a [ModelInfo], limit: usize) -> Vec<&'a ModelInfo> {
    let needle = query.trim().to_lowercase();
    models
        .iter()
        .filter(|model| {
            needle.is_empty()
                || model.id.to_lowercase().contains(&needle)
                || model
                    .name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}
