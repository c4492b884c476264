//! Destinations, the bookable group trips

use std::fmt;
use std::str::FromStr;

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::date_score;

/// Region a destination belongs to
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// Europe
    Europa,

    /// The Americas
    America,

    /// Asia
    Asia,

    /// Africa and the Middle East
    AfricaMo,

    /// Oceania
    Oceania,
}

impl Region {
    /// All regions, in display order
    pub const ALL: [Region; 5] = [
        Region::Europa,
        Region::America,
        Region::Asia,
        Region::AfricaMo,
        Region::Oceania,
    ];

    /// Wire value of the region
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Europa => "europa",
            Region::America => "america",
            Region::Asia => "asia",
            Region::AfricaMo => "africa-mo",
            Region::Oceania => "oceania",
        }
    }

    /// Human readable name of the region
    pub fn label(self) -> &'static str {
        match self {
            Region::Europa => "Europa",
            Region::America => "América",
            Region::Asia => "Asia",
            Region::AfricaMo => "África y Medio Oriente",
            Region::Oceania => "Oceanía",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown region value
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown region: {}", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == value)
            .ok_or_else(|| UnknownRegion(value.to_string()))
    }
}

/// Promotional tag shown on a destination card
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Badge {
    /// No tag
    #[default]
    #[serde(rename = "ninguno")]
    None,

    /// No spots left
    #[serde(rename = "agotado")]
    SoldOut,

    /// Only a few spots left
    #[serde(rename = "ultimos")]
    LastSpots,

    /// Newly added trip
    #[serde(rename = "nuevo")]
    New,

    /// Popular trip
    #[serde(rename = "popular")]
    Popular,
}

impl Badge {
    /// Is there no badge?
    pub fn is_none(&self) -> bool {
        *self == Badge::None
    }

    /// Text printed on the card, if any
    pub fn label(self) -> Option<&'static str> {
        match self {
            Badge::None => None,
            Badge::SoldOut => Some("CUPOS AGOTADOS"),
            Badge::LastSpots => Some("ÚLTIMOS CUPOS"),
            Badge::New => Some("NUEVO"),
            Badge::Popular => Some("POPULAR"),
        }
    }
}

/// Accept `null` as well as `"ninguno"` for "no badge"
pub fn deserialize_badge<'de, D>(deserializer: D) -> Result<Badge, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Badge>::deserialize(deserializer)?.unwrap_or_default())
}

/// A group trip
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    /// Destination ID
    pub id: Uuid,

    /// Unique, human readable key
    pub slug: String,

    /// Display name
    pub title: String,

    /// Short subtitle
    pub tagline: String,

    /// Long description
    pub description: String,

    /// Region of the trip
    pub region: Region,

    /// Number of countries visited
    pub countries: i32,

    /// Number of cities visited
    pub cities: i32,

    /// Length of the trip in days
    pub days: i32,

    /// Year of the trip
    pub year: i32,

    /// Free text departure date, like "13 Ago", "Ago" or "Consultar"
    pub departure_date: String,

    /// Free text return date
    pub return_date: Option<String>,

    /// City the group leaves from
    pub departure_city: String,

    /// Media path of the card image
    pub cover_path: Option<String>,

    /// Media path of the hero image
    pub hero_path: Option<String>,

    /// Media path of the route map
    pub map_path: Option<String>,

    /// Media path of the itinerary PDF
    pub itinerary_path: Option<String>,

    /// Contact link
    pub whatsapp_url: String,

    /// Video testimonials
    pub video_urls: Vec<String>,

    /// What the trip includes
    pub includes: Vec<String>,

    /// Promoted on the homepage
    pub featured: bool,

    /// Publicly visible and bookable
    pub active: bool,

    /// Sourced from a partner program
    pub partner: bool,

    /// Promotional tag
    pub badge: Badge,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

impl Destination {
    /// Departure date as shown to visitors, including the return date when known
    pub fn departure_label(&self) -> String {
        match &self.return_date {
            Some(return_date) if !self.departure_date.is_empty() && !return_date.is_empty() => {
                format!("{} – {}", self.departure_date, return_date)
            }
            _ => self.departure_date.clone(),
        }
    }

    /// Sortable point in time of the departure
    pub fn date_score(&self) -> i64 {
        date_score(&self.departure_date, self.year)
    }
}

/// All values needed to store a destination
#[derive(Clone, Debug)]
pub struct DestinationValues {
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub region: Region,
    pub countries: i32,
    pub cities: i32,
    pub days: i32,
    pub year: i32,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub departure_city: String,
    pub cover_path: Option<String>,
    pub hero_path: Option<String>,
    pub map_path: Option<String>,
    pub itinerary_path: Option<String>,
    pub whatsapp_url: String,
    pub video_urls: Vec<String>,
    pub includes: Vec<String>,
    pub featured: bool,
    pub active: bool,
    pub partner: bool,
    pub badge: Badge,
}

impl DestinationValues {
    /// Values of an existing destination, to be changed before an update
    pub fn from_destination(destination: &Destination) -> Self {
        Self {
            slug: destination.slug.clone(),
            title: destination.title.clone(),
            tagline: destination.tagline.clone(),
            description: destination.description.clone(),
            region: destination.region,
            countries: destination.countries,
            cities: destination.cities,
            days: destination.days,
            year: destination.year,
            departure_date: destination.departure_date.clone(),
            return_date: destination.return_date.clone(),
            departure_city: destination.departure_city.clone(),
            cover_path: destination.cover_path.clone(),
            hero_path: destination.hero_path.clone(),
            map_path: destination.map_path.clone(),
            itinerary_path: destination.itinerary_path.clone(),
            whatsapp_url: destination.whatsapp_url.clone(),
            video_urls: destination.video_urls.clone(),
            includes: destination.includes.clone(),
            featured: destination.featured,
            active: destination.active,
            partner: destination.partner,
            badge: destination.badge,
        }
    }

    /// Turn the values into a destination with the given identity
    pub fn into_destination(
        self,
        id: Uuid,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Destination {
        Destination {
            id,
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
            created_at,
            updated_at,
        }
    }
}
