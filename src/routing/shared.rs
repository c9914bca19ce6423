//! Reloadable registry handle.
//!
//! # Data Flow
//! ```text
//! reload(build)
//!     → build a fresh registry off to the side
//!     → atomic swap of Arc<M>
//!     → readers holding the old snapshot finish against it
//! ```
//!
//! Registries themselves carry no locks; this handle is what makes a live
//! reload safe while request workers keep matching.

use std::marker::PhantomData;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::matcher::{RouteDefinition, RouteMatch, RouteMatcher};
use crate::routing::method::HttpMethod;

/// Shared, atomically replaceable registry.
pub struct SharedRegistry<M, R> {
    current: ArcSwap<M>,
    _route: PhantomData<fn() -> R>,
}

impl<M, R> SharedRegistry<M, R>
where
    M: RouteMatcher<R>,
    R: RouteDefinition,
{
    pub fn new(registry: M) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
            _route: PhantomData,
        }
    }

    /// Snapshot of the registry currently serving.
    pub fn load(&self) -> Arc<M> {
        self.current.load_full()
    }

    /// Match against the current snapshot.
    pub fn match_route(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<R>> {
        self.current.load().match_route(method, path)
    }

    /// Swap in a registry built by `build`. Returns the one it replaced.
    pub fn reload<F>(&self, build: F) -> Arc<M>
    where
        F: FnOnce() -> M,
    {
        let fresh = build();
        let stats = fresh.stats();
        let previous = self.current.swap(Arc::new(fresh));
        tracing::info!(
            registry = previous.name(),
            previous_total = previous.stats().total,
            total = stats.total,
            "Route registry reloaded"
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::Route;
    use crate::routing::trie::TrieRegistry;
    use std::thread;

    fn build(paths: &[&str]) -> TrieRegistry<Route> {
        let mut reg = TrieRegistry::new();
        reg.register_many(
            paths
                .iter()
                .map(|p| Arc::new(Route::new(HttpMethod::Get, *p))),
        );
        reg
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let shared = SharedRegistry::new(build(&["/old"]));
        let before = shared.load();
        assert!(shared.match_route(HttpMethod::Get, "/old").is_some());

        let previous = shared.reload(|| build(&["/new/{id}"]));
        assert_eq!(previous.stats().total, 1);
        assert!(shared.match_route(HttpMethod::Get, "/old").is_none());
        assert!(shared.match_route(HttpMethod::Get, "/new/1").is_some());

        // An old snapshot keeps answering from the old routes.
        assert!(before.match_route(HttpMethod::Get, "/old").is_some());
    }

    #[test]
    fn test_concurrent_readers_during_reload() {
        let shared = Arc::new(SharedRegistry::new(build(&["/a", "/b/{id}"])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..500 {
                        // Either snapshot resolves /b/{id}.
                        assert!(shared.match_route(HttpMethod::Get, "/b/9").is_some());
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            shared.reload(|| build(&["/b/{id}", "/c"]));
        }

        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(shared.load().stats().total, 2);
    }
}
