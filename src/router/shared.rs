//! Frozen router snapshots for concurrent use.
//!
//! A [`Router`] is built with `&mut` access and then published here. Readers
//! take lock-free snapshots; a rebuilt router is swapped in atomically and
//! in-flight recognitions keep using the snapshot they started with.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use tracing::info;

use super::core::{RecognizeResults, Router};
use super::params::RouteParams;
use super::route::{RouteConfig, RouteRef};
use crate::config::RuntimeConfig;
use crate::error::RecognizerError;

/// Lock-free handle to the current router
pub struct SharedRouter {
    current: ArcSwap<Router>,
}

impl SharedRouter {
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Cheap snapshot for a single lookup
    #[must_use]
    pub fn snapshot(&self) -> Guard<Arc<Router>> {
        self.current.load()
    }

    /// Owned snapshot that can outlive the call site
    #[must_use]
    pub fn load_full(&self) -> Arc<Router> {
        self.current.load_full()
    }

    #[must_use]
    pub fn recognize(&self, path: &str) -> Option<RecognizeResults> {
        self.current.load().recognize(path)
    }

    pub fn generate<'a>(
        &self,
        route: impl Into<RouteRef<'a>>,
        params: &RouteParams,
    ) -> Result<String, RecognizerError> {
        self.current.load().generate(route, params)
    }

    /// Publish `router`, returning the previous one
    pub fn replace(&self, router: Router) -> Arc<Router> {
        let routes_count = router.route_count();
        let previous = self.current.swap(Arc::new(router));
        info!(
            routes_count,
            previous_routes_count = previous.route_count(),
            "Router replaced"
        );
        previous
    }

    /// Compile `routes` into a fresh router and publish it
    ///
    /// The current router stays in place if any route is rejected.
    pub fn rebuild(
        &self,
        config: &RuntimeConfig,
        routes: impl IntoIterator<Item = RouteConfig>,
    ) -> Result<(), RecognizerError> {
        let router = Router::from_routes(config, routes)?;
        self.replace(router);
        Ok(())
    }
}

impl From<Router> for SharedRouter {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}
