//! Bundled destinations
//!
//! Used when the dynamic source is down or empty, and to seed a fresh database.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::destinations::Badge;
use crate::destinations::Destination;
use crate::destinations::DestinationValues;
use crate::destinations::Region;
use crate::destinations::deserialize_badge;

/// Destinations compiled into the binary
const BUNDLED_DESTINATIONS: &str = include_str!("../data/destinations.json");

/// A bundled destination as written in the JSON file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaticDestination {
    id: Uuid,
    slug: String,
    title: String,
    #[serde(default)]
    tagline: String,
    #[serde(default)]
    description: String,
    region: Region,
    countries: i32,
    cities: i32,
    days: i32,
    year: i32,
    #[serde(default)]
    departure_date: String,
    return_date: Option<String>,
    #[serde(default = "default_departure_city")]
    departure_city: String,
    cover_path: Option<String>,
    hero_path: Option<String>,
    map_path: Option<String>,
    itinerary_path: Option<String>,
    whatsapp_url: String,
    #[serde(default)]
    video_urls: Vec<String>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    featured: bool,
    active: bool,
    #[serde(default)]
    partner: bool,
    #[serde(default, deserialize_with = "deserialize_badge")]
    badge: Badge,
}

fn default_departure_city() -> String {
    String::from("Buenos Aires")
}

impl StaticDestination {
    fn into_destination(self) -> Destination {
        let id = self.id;

        DestinationValues {
            slug: self.slug,
            title: self.title,
            tagline: self.tagline,
            description: self.description,
            region: self.region,
            countries: self.countries,
            cities: self.cities,
            days: self.days,
            year: self.year,
            departure_date: self.departure_date,
            return_date: self.return_date,
            departure_city: self.departure_city,
            cover_path: self.cover_path,
            hero_path: self.hero_path,
            map_path: self.map_path,
            itinerary_path: self.itinerary_path,
            whatsapp_url: self.whatsapp_url,
            video_urls: self.video_urls,
            includes: self.includes,
            featured: self.featured,
            active: self.active,
            partner: self.partner,
            badge: self.badge,
        }
        .into_destination(id, NaiveDateTime::default(), NaiveDateTime::default())
    }
}

/// The bundled destinations, immutable once loaded
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    destinations: Arc<Vec<Destination>>,
}

impl StaticCatalog {
    /// Catalog of the given destinations
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self {
            destinations: Arc::new(destinations),
        }
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let destinations = serde_json::from_str::<Vec<StaticDestination>>(json)
            .context("Invalid static destinations")?
            .into_iter()
            .map(StaticDestination::into_destination)
            .collect();

        Ok(Self::new(destinations))
    }

    /// The catalog compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DESTINATIONS)
    }

    /// Load the catalog from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;

        Self::from_json(&json)
    }

    /// All bundled destinations, inactive ones included
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Active bundled destinations
    pub fn active(&self) -> Vec<Destination> {
        self.destinations
            .iter()
            .filter(|destination| destination.active)
            .cloned()
            .collect()
    }

    /// Find a bundled destination by slug
    pub fn find_by_slug(&self, slug: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.slug == slug)
    }
}
