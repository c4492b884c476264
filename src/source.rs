//! The catalog source
//!
//! Active destinations come from the storage, the bundled destinations take over when the
//! storage fails or has nothing to show.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::catalog::MergePolicy;
use crate::catalog::reconcile;
use crate::destinations::Destination;
use crate::fallback::StaticCatalog;
use crate::storage::Result;
use crate::storage::Storage;

/// Source of the destinations shown to visitors
#[derive(Clone)]
pub struct CatalogSource<S: Storage> {
    /// The dynamic source
    storage: S,

    /// The bundled destinations
    fallback: StaticCatalog,

    /// Last successful fetch of the active destinations
    cache: Cache<(), Arc<Vec<Destination>>>,
}

impl<S: Storage> CatalogSource<S> {
    /// Create the source, a fetched collection is reused for `ttl`
    pub fn new(storage: S, fallback: StaticCatalog, ttl: Duration) -> Self {
        Self {
            storage,
            fallback,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// The bundled destinations
    pub fn fallback(&self) -> &StaticCatalog {
        &self.fallback
    }

    /// Active destinations of the storage, possibly cached
    async fn dynamic_destinations(&self) -> Result<Arc<Vec<Destination>>> {
        if let Some(destinations) = self.cache.get(&()).await {
            return Ok(destinations);
        }

        let destinations = Arc::new(self.storage.find_active_destinations().await?);

        if !destinations.is_empty() {
            self.cache.insert((), destinations.clone()).await;
        }

        Ok(destinations)
    }

    /// Active destinations to show, the bundled ones when the storage fails or is empty
    pub async fn active_destinations(&self) -> Arc<Vec<Destination>> {
        match self.dynamic_destinations().await {
            Ok(destinations) if !destinations.is_empty() => destinations,
            Ok(_) => {
                tracing::warn!("No destinations in storage, using bundled destinations");

                Arc::new(self.fallback.active())
            }
            Err(err) => {
                tracing::warn!("Could not fetch destinations ({err}), using bundled destinations");

                Arc::new(self.fallback.active())
            }
        }
    }

    /// A single active destination by slug
    ///
    /// A stored destination hides a bundled one with the same slug, even when it is inactive.
    pub async fn active_destination_by_slug(&self, slug: &str) -> Option<Destination> {
        let destinations = self.active_destinations().await;

        if let Some(destination) = destinations
            .iter()
            .find(|destination| destination.slug == slug)
        {
            return Some(destination.clone());
        }

        if let Ok(Some(_)) = self.storage.find_single_destination_by_slug(slug).await {
            return None;
        }

        self.fallback
            .find_by_slug(slug)
            .filter(|destination| destination.active)
            .cloned()
    }

    /// Slugs of every destination that gets a public page
    pub async fn route_slugs(&self) -> Vec<String> {
        let dynamic = match self.dynamic_destinations().await {
            Ok(destinations) => destinations,
            Err(err) => {
                tracing::warn!("Could not fetch destinations ({err}), using bundled slugs only");

                Arc::new(Vec::new())
            }
        };

        reconcile(
            &dynamic,
            self.fallback.destinations(),
            MergePolicy::DynamicWins,
        )
        .into_iter()
        .map(|destination| destination.slug)
        .collect()
    }

    /// Forget the cached collection, the next read goes to the storage
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}
