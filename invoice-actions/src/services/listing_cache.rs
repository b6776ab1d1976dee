//! Cached renderings of listing views, keyed by path.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Drops cached renderings after a mutation.
pub trait ViewCache: Send + Sync {
    /// Forget the rendering for `path`, including any rendering still in flight.
    fn invalidate(&self, path: &str);
}

#[derive(Default)]
struct Slot {
    /// Bumped by every invalidation of the path.
    generation: u64,
    view: Option<Arc<String>>,
}

#[derive(Default)]
pub struct ListingCache {
    slots: DashMap<String, Slot>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<String>> {
        self.slots.get(path).and_then(|slot| slot.view.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Return the cached rendering for `path`, rendering and storing it on a miss.
    ///
    /// A rendering is only stored if no invalidation of `path` happened while it
    /// was being produced; otherwise it is returned to the caller but not cached.
    pub async fn get_or_render<F, Fut, E>(&self, path: &str, render: F) -> Result<Arc<String>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let generation = match self.slots.get(path) {
            Some(slot) => {
                if let Some(view) = &slot.view {
                    debug!(path, "Listing cache hit");
                    return Ok(Arc::clone(view));
                }
                slot.generation
            }
            None => 0,
        };

        let view = Arc::new(render().await?);

        let mut slot = self.slots.entry(path.to_string()).or_default();
        if slot.generation == generation {
            slot.view = Some(Arc::clone(&view));
        } else {
            debug!(path, "Listing invalidated during render, not caching");
        }

        Ok(view)
    }
}

impl ViewCache for ListingCache {
    fn invalidate(&self, path: &str) {
        let mut slot = self.slots.entry(path.to_string()).or_default();
        slot.generation += 1;
        if slot.view.take().is_some() {
            debug!(path, "Listing cache invalidated");
        }
    }
}
