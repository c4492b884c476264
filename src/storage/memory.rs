//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::destinations::Destination;
use crate::destinations::DestinationValues;

use super::Error;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All destinations in storage
    destinations: Arc<Mutex<HashMap<Uuid, Destination>>>,

    /// Behave like a source that can not be reached
    unavailable: bool,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            destinations: Arc::new(Mutex::new(HashMap::new())),
            unavailable: false,
        }
    }

    /// Create a Memory storage that fails every interaction
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn unavailable() -> Self {
        Self {
            destinations: Arc::new(Mutex::new(HashMap::new())),
            unavailable: true,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(Error::Connection(String::from("Memory storage is unavailable")))
        } else {
            Ok(())
        }
    }
}

/// Make sure no other destination uses the slug
fn ensure_unique_slug(
    destinations: &HashMap<Uuid, Destination>,
    slug: &str,
    id: Option<&Uuid>,
) -> Result<()> {
    let taken = destinations
        .values()
        .any(|destination| destination.slug == slug && Some(&destination.id) != id);

    if taken {
        Err(Error::DuplicateSlug(slug.to_string()))
    } else {
        Ok(())
    }
}

impl Storage for Memory {
    async fn find_active_destinations(&self) -> Result<Vec<Destination>> {
        self.check_available()?;

        let mut destinations = self
            .destinations
            .lock()
            .await
            .values()
            .filter(|destination| destination.active)
            .cloned()
            .collect::<Vec<_>>();

        destinations.sort_by(|a, b| {
            a.year
                .cmp(&b.year)
                .then_with(|| a.departure_date.cmp(&b.departure_date))
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(destinations)
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        self.check_available()?;

        let mut destinations = self
            .destinations
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();

        destinations.sort_by(|a, b| {
            Reverse(a.year)
                .cmp(&Reverse(b.year))
                .then_with(|| a.departure_date.cmp(&b.departure_date))
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(destinations)
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        self.check_available()?;

        Ok(self.destinations.lock().await.get(id).cloned())
    }

    async fn find_single_destination_by_slug(&self, slug: &str) -> Result<Option<Destination>> {
        self.check_available()?;

        Ok(self
            .destinations
            .lock()
            .await
            .values()
            .find(|destination| destination.slug == slug)
            .cloned())
    }

    async fn create_destination(&self, values: &DestinationValues) -> Result<Destination> {
        self.check_available()?;

        let mut destinations = self.destinations.lock().await;

        ensure_unique_slug(&destinations, &values.slug, None)?;

        let now = Utc::now().naive_utc();
        let destination = values.clone().into_destination(Uuid::new_v4(), now, now);

        destinations.insert(destination.id, destination.clone());

        Ok(destination)
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &DestinationValues,
    ) -> Result<Destination> {
        self.check_available()?;

        let mut destinations = self.destinations.lock().await;

        ensure_unique_slug(&destinations, &values.slug, Some(&destination.id))?;

        let existing = destinations
            .get_mut(&destination.id)
            .ok_or_else(|| Error::InvalidRecord(format!("Unknown destination: {}", destination.id)))?;

        *existing = values.clone().into_destination(
            existing.id,
            existing.created_at,
            Utc::now().naive_utc(),
        );

        Ok(existing.clone())
    }

    async fn upsert_destination(&self, values: &DestinationValues) -> Result<Destination> {
        self.check_available()?;

        let mut destinations = self.destinations.lock().await;

        let now = Utc::now().naive_utc();

        let existing = destinations
            .values_mut()
            .find(|destination| destination.slug == values.slug);

        if let Some(existing) = existing {
            *existing = values
                .clone()
                .into_destination(existing.id, existing.created_at, now);

            return Ok(existing.clone());
        }

        let destination = values.clone().into_destination(Uuid::new_v4(), now, now);

        destinations.insert(destination.id, destination.clone());

        Ok(destination)
    }

    async fn delete_destination(&self, destination: &Destination) -> Result<()> {
        self.check_available()?;

        self.destinations.lock().await.remove(&destination.id);

        Ok(())
    }
}
