//! Public catalog API endpoints
//!
//! Only active destinations are visible, no authentication needed

use std::str::FromStr;

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::DisplayMode;
use crate::catalog::Filter;
use crate::catalog::MONTH_NAMES;
use crate::catalog::PublicCatalog;
use crate::destinations::Badge;
use crate::destinations::Destination;
use crate::destinations::Region;
use crate::media::MediaUrls;
use crate::source::CatalogSource;
use crate::storage::Storage;

use super::Error;
use super::PathParameters;
use super::QueryParameters;
use super::Success;

/// Value of a query parameter that means "everything"
const ALL: &str = "all";

/// Filter parameters shared by the public catalog and the admin table
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Part of the title
    search: Option<String>,

    /// Region wire value
    region: Option<String>,

    /// Month name
    month: Option<String>,

    /// Year
    year: Option<String>,
}

/// A parameter that is not set, empty or `all` does not constrain anything
fn constraint(value: Option<&String>) -> Option<&str> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
}

impl FilterQuery {
    /// Validate the parameters into a filter
    pub fn to_filter(&self) -> Result<Filter, Error> {
        let region = constraint(self.region.as_ref())
            .map(Region::from_str)
            .transpose()
            .map_err(|err| Error::bad_request("Unknown region").with_description(err))?;

        let year = constraint(self.year.as_ref())
            .map(str::parse::<i32>)
            .transpose()
            .map_err(|err| Error::bad_request("Invalid year").with_description(err))?;

        Ok(Filter {
            search: self.search.clone(),
            region,
            year,
            month: constraint(self.month.as_ref()).map(ToString::to_string),
        })
    }
}

/// Public catalog parameters
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(flatten)]
    filter: FilterQuery,

    /// Maximum number of destinations for an embedded section
    limit: Option<String>,
}

impl CatalogQuery {
    fn display_mode(&self) -> Result<DisplayMode, Error> {
        let limit = constraint(self.limit.as_ref())
            .map(str::parse::<usize>)
            .transpose()
            .map_err(|err| Error::bad_request("Invalid limit").with_description(err))?;

        Ok(DisplayMode::from_limit(limit))
    }
}

/// Destination as shown to visitors
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub region: Region,
    pub region_label: &'static str,
    pub countries: i32,
    pub cities: i32,
    pub days: i32,
    pub year: i32,

    /// Departure date, with the return date when known
    pub departure_date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub departure_city: String,

    /// Hero image, the cover image when there is no hero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_pdf_url: Option<String>,
    pub whatsapp_url: String,
    pub video_testimonials: Vec<String>,
    pub includes: Vec<String>,
    pub featured: bool,
    pub partner: bool,

    #[serde(skip_serializing_if = "Badge::is_none")]
    pub badge: Badge,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_label: Option<&'static str>,
}

impl DestinationResponse {
    /// Create a response from a [`Destination`](Destination), media paths become URLs
    pub fn from_destination(media: &MediaUrls, destination: &Destination) -> Self {
        Self {
            id: destination.id,
            slug: destination.slug.clone(),
            title: destination.title.clone(),
            tagline: destination.tagline.clone(),
            description: destination.description.clone(),
            region: destination.region,
            region_label: destination.region.label(),
            countries: destination.countries,
            cities: destination.cities,
            days: destination.days,
            year: destination.year,
            departure_date: destination.departure_label(),
            return_date: destination.return_date.clone(),
            departure_city: destination.departure_city.clone(),
            hero_image: media.resolve_first(&[
                destination.hero_path.as_deref(),
                destination.cover_path.as_deref(),
            ]),
            thumbnail_image: media.resolve(destination.cover_path.as_deref()),
            map_image_url: media.resolve(destination.map_path.as_deref()),
            itinerary_pdf_url: media.resolve(destination.itinerary_path.as_deref()),
            whatsapp_url: destination.whatsapp_url.clone(),
            video_testimonials: destination.video_urls.clone(),
            includes: destination.includes.clone(),
            featured: destination.featured,
            partner: destination.partner,
            badge: destination.badge,
            badge_label: destination.badge.label(),
        }
    }

    /// Create responses from multiple [`Destination`](Destination)s
    pub fn from_destination_multiple(
        media: &MediaUrls,
        destinations: &[&Destination],
    ) -> Vec<Self> {
        destinations
            .iter()
            .map(|destination| Self::from_destination(media, destination))
            .collect()
    }
}

/// Region option for the region selector
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    value: Region,
    label: &'static str,
}

/// The filtered catalog
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    destinations: Vec<DestinationResponse>,

    /// Matching destinations before the limit
    total: usize,

    /// Every active destination
    available: usize,

    /// More matches than shown, link to the full page
    has_more: bool,
    regions: Vec<RegionResponse>,
    months: [&'static str; 12],
    years: Vec<i32>,
}

/// List the catalog
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:6000/api/destinations?region=europa&month=Agosto&year=2026&limit=8'
/// ```
///
/// Response:
/// ```json
/// { "data": { "destinations": [ { "slug": "alma-europea-2026" ... } ], "total": 1 ... } }
/// ```
pub async fn list<S: Storage>(
    Extension(source): Extension<CatalogSource<S>>,
    Extension(media): Extension<MediaUrls>,
    QueryParameters(query): QueryParameters<CatalogQuery>,
) -> Result<Success<CatalogResponse>, Error> {
    let filter = query.filter.to_filter()?;
    let mode = query.display_mode()?;

    let destinations = source.active_destinations().await;
    let catalog = PublicCatalog::new(destinations.iter());

    let view = catalog.view(&filter, mode);

    Ok(Success::ok(CatalogResponse {
        destinations: DestinationResponse::from_destination_multiple(&media, &view.destinations),
        total: view.total,
        available: catalog.available(),
        has_more: view.has_more(),
        regions: catalog
            .regions()
            .into_iter()
            .map(|region| RegionResponse {
                value: region,
                label: region.label(),
            })
            .collect(),
        months: MONTH_NAMES,
        years: catalog.years(),
    }))
}

/// List the featured destinations of the homepage
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/destinations/featured
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "slug": "alma-europea-2026" ... } ] }
/// ```
pub async fn featured<S: Storage>(
    Extension(source): Extension<CatalogSource<S>>,
    Extension(media): Extension<MediaUrls>,
) -> Success<Vec<DestinationResponse>> {
    let destinations = source.active_destinations().await;
    let catalog = PublicCatalog::new(destinations.iter());

    Success::ok(DestinationResponse::from_destination_multiple(
        &media,
        &catalog.featured(),
    ))
}

/// List the slugs of every public destination page
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/destinations/slugs
/// ```
///
/// Response:
/// ```json
/// { "data": [ "alma-europea-2026", "paris-2026" ] }
/// ```
pub async fn slugs<S: Storage>(
    Extension(source): Extension<CatalogSource<S>>,
) -> Success<Vec<String>> {
    Success::ok(source.route_slugs().await)
}

/// A destination page
#[derive(Debug, Serialize)]
pub struct DestinationPageResponse {
    destination: DestinationResponse,
    related: Vec<DestinationResponse>,
}

/// Get a single destination with its related destinations
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/destinations/alma-europea-2026
/// ```
///
/// Response:
/// ```json
/// { "data": { "destination": { "slug": "alma-europea-2026" ... }, "related": [ ... ] } }
/// ```
pub async fn single<S: Storage>(
    Extension(source): Extension<CatalogSource<S>>,
    Extension(media): Extension<MediaUrls>,
    PathParameters(slug): PathParameters<String>,
) -> Result<Success<DestinationPageResponse>, Error> {
    let destination = source
        .active_destination_by_slug(&slug)
        .await
        .ok_or_else(|| Error::not_found("Destination not found"))?;

    let destinations = source.active_destinations().await;
    let related = PublicCatalog::new(destinations.iter()).related(&destination);

    Ok(Success::ok(DestinationPageResponse {
        destination: DestinationResponse::from_destination(&media, &destination),
        related: DestinationResponse::from_destination_multiple(&media, &related),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(region: Option<&str>, year: Option<&str>, month: Option<&str>) -> FilterQuery {
        FilterQuery {
            search: None,
            region: region.map(ToString::to_string),
            month: month.map(ToString::to_string),
            year: year.map(ToString::to_string),
        }
    }

    #[test]
    fn test_all_and_empty_do_not_constrain() {
        let filter = query(Some("all"), Some(""), Some("ALL")).to_filter().unwrap();

        assert_eq!(Filter::default(), filter);
    }

    #[test]
    fn test_valid_filter() {
        let filter = query(Some("africa-mo"), Some("2026"), Some("Agosto"))
            .to_filter()
            .unwrap();

        assert_eq!(Some(Region::AfricaMo), filter.region);
        assert_eq!(Some(2026), filter.year);
        assert_eq!(Some("Agosto".to_string()), filter.month);
    }

    #[test]
    fn test_invalid_filter() {
        assert!(query(Some("antartida"), None, None).to_filter().is_err());
        assert!(query(None, Some("next-year"), None).to_filter().is_err());
    }
}
