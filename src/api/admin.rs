//! Admin API endpoints
//!
//! Everything related to managing the destinations, every endpoint except the token endpoint
//! needs a valid token

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::AdminStats;
use crate::catalog::AdminTable;
use crate::destinations::Badge;
use crate::destinations::Destination;
use crate::destinations::DestinationValues;
use crate::destinations::Region;
use crate::destinations::deserialize_badge;
use crate::source::CatalogSource;
use crate::storage::Storage;
use crate::users::AdminAccount;

use super::AuditEntry;
use super::AuditTrail;
use super::CurrentUser;
use super::Error;
use super::FilterQuery;
use super::Form;
use super::JwtKeys;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::Token;
use super::current_user::generate_token;
use super::parse_slug;
use super::parse_url;
use super::slugify;

/// Departure city when none is given
const DEFAULT_DEPARTURE_CITY: &str = "Buenos Aires";

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Get a token for the admin
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "admin", "password": "verysecret" }' \
///     http://localhost:6000/api/admin/token
/// ```
///
/// Response:
/// ```json
/// { "data": { "tokenType": "Bearer", "expiresIn": 28800, "accessToken": "..." } }
/// ```
pub async fn token(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(account): Extension<AdminAccount>,
    Form(form): Form<LoginForm>,
) -> Result<Success<Token>, Error> {
    if !account.check_credentials(&form.username, &form.password) {
        tracing::warn!("Failed login attempt for {}", form.username);

        return Err(Error::unauthorized("Invalid credentials"));
    }

    generate_token(&jwt_keys, &account).map(Success::ok)
}

/// Destination as stored, for the admin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDestinationResponse {
    pub id: Uuid,
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AdminDestinationResponse {
    /// Create a response from a [`Destination`](Destination)
    fn from_destination(destination: Destination) -> Self {
        Self {
            id: destination.id,
            slug: destination.slug,
            title: destination.title,
            tagline: destination.tagline,
            description: destination.description,
            region: destination.region,
            countries: destination.countries,
            cities: destination.cities,
            days: destination.days,
            year: destination.year,
            departure_date: destination.departure_date,
            return_date: destination.return_date,
            departure_city: destination.departure_city,
            cover_path: destination.cover_path,
            hero_path: destination.hero_path,
            map_path: destination.map_path,
            itinerary_path: destination.itinerary_path,
            whatsapp_url: destination.whatsapp_url,
            video_urls: destination.video_urls,
            includes: destination.includes,
            featured: destination.featured,
            active: destination.active,
            partner: destination.partner,
            badge: destination.badge,
            created_at: destination.created_at,
            updated_at: destination.updated_at,
        }
    }

    /// Create responses from multiple [`Destination`](Destination)s
    fn from_destination_multiple(destinations: Vec<&Destination>) -> Vec<Self> {
        destinations
            .into_iter()
            .cloned()
            .map(Self::from_destination)
            .collect()
    }
}

/// The admin table
#[derive(Debug, Serialize)]
pub struct AdminTableResponse {
    destinations: Vec<AdminDestinationResponse>,

    /// Number of listed destinations
    count: usize,

    /// Every year present, for the year selector
    years: Vec<i32>,
}

/// List destinations, inactive ones included
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:6000/api/admin/destinations?search=europa&year=2026'
/// ```
///
/// Response:
/// ```json
/// { "data": { "destinations": [ { "id": "<uuid>", "slug": "alma-europea-2026" ... } ],
///   "count": 1, "years": [2026] } }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser,
    QueryParameters(query): QueryParameters<FilterQuery>,
) -> Result<Success<AdminTableResponse>, Error> {
    let filter = query.to_filter()?;

    let destinations = storage
        .find_all_destinations()
        .await
        .map_err(Error::storage)?;

    let view = AdminTable::new(&destinations).view(&filter);

    Ok(Success::ok(AdminTableResponse {
        count: view.count,
        years: view.years,
        destinations: AdminDestinationResponse::from_destination_multiple(view.destinations),
    }))
}

/// Get a single destination
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/destinations/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "slug": "alma-europea-2026" ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser,
    PathParameters(destination_id): PathParameters<Uuid>,
) -> Result<Success<AdminDestinationResponse>, Error> {
    fetch_destination(&storage, &destination_id)
        .await
        .map(|destination| Success::ok(AdminDestinationResponse::from_destination(destination)))
}

fn default_departure_city() -> String {
    String::from(DEFAULT_DEPARTURE_CITY)
}

fn default_active() -> bool {
    true
}

/// Create destination form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationForm {
    /// Slug, derived from the title when not provided
    ///
    /// The slug is normalized: lowercase, no diacritics, only `a-z`, `0-9` and dashes
    slug: Option<String>,
    title: String,
    #[serde(default)]
    tagline: String,
    #[serde(default)]
    description: String,
    region: Region,
    #[serde(default)]
    countries: i32,
    #[serde(default)]
    cities: i32,
    #[serde(default)]
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
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    partner: bool,
    #[serde(default, deserialize_with = "deserialize_badge")]
    badge: Badge,
}

/// Empty text is the same as no text
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Check the values before they are stored
fn validate(values: &DestinationValues) -> Result<(), Error> {
    if values.title.trim().is_empty() {
        return Err(Error::bad_request("Title can not be empty"));
    }

    if values.countries < 0 || values.cities < 0 || values.days < 0 {
        return Err(Error::bad_request("Counts can not be negative"));
    }

    parse_url(&values.whatsapp_url)?;

    for video_url in &values.video_urls {
        parse_url(video_url)?;
    }

    Ok(())
}

/// Make sure no other destination has the slug
async fn ensure_unique_slug<S: Storage>(
    storage: &S,
    slug: &str,
    id: Option<&Uuid>,
) -> Result<(), Error> {
    let existing = storage
        .find_single_destination_by_slug(slug)
        .await
        .map_err(Error::storage)?;

    match existing {
        Some(destination) if Some(&destination.id) != id => {
            Err(Error::bad_request("Slug already exists"))
        }
        _ => Ok(()),
    }
}

/// Create a destination based on the [`CreateDestinationForm`](CreateDestinationForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "title": "Perú Mágico 2026", "region": "america", "year": 2026,
///           "departureDate": "5 May", "whatsappUrl": "https://wa.link/ggzwq4" }' \
///     http://localhost:6000/api/admin/destinations
/// ```
///
/// Response
/// ```json
/// { "data": { "id": "<uuid>", "slug": "peru-magico-2026" ... } }
/// ```
pub async fn create<S: Storage>(
    audit_trail: AuditTrail,
    Extension(storage): Extension<S>,
    Extension(source): Extension<CatalogSource<S>>,
    Form(form): Form<CreateDestinationForm>,
) -> Result<Success<AdminDestinationResponse>, Error> {
    if form.title.trim().is_empty() {
        return Err(Error::bad_request("Title can not be empty"));
    }

    let slug = match non_empty(form.slug) {
        Some(slug) => parse_slug(&slug)?,
        None => slugify(&form.title),
    };

    if slug.is_empty() {
        return Err(Error::bad_request("Slug can not be empty"));
    }

    let values = DestinationValues {
        slug,
        title: form.title.trim().to_string(),
        tagline: form.tagline,
        description: form.description,
        region: form.region,
        countries: form.countries,
        cities: form.cities,
        days: form.days,
        year: form.year,
        departure_date: form.departure_date.trim().to_string(),
        return_date: non_empty(form.return_date),
        departure_city: form.departure_city,
        cover_path: non_empty(form.cover_path),
        hero_path: non_empty(form.hero_path),
        map_path: non_empty(form.map_path),
        itinerary_path: non_empty(form.itinerary_path),
        whatsapp_url: form.whatsapp_url,
        video_urls: form.video_urls,
        includes: form.includes,
        featured: form.featured,
        active: form.active,
        partner: form.partner,
        badge: form.badge,
    };

    validate(&values)?;

    ensure_unique_slug(&storage, &values.slug, None).await?;

    let destination = storage
        .create_destination(&values)
        .await
        .map_err(Error::storage)?;

    source.invalidate().await;

    audit_trail.register(&AuditEntry::CreateDestination(&destination.slug));

    Ok(Success::created(AdminDestinationResponse::from_destination(
        destination,
    )))
}

/// Update destination form
///
/// Fields to update a destination with, all fields are optional and are not touched when not
/// provided. Empty text clears an optional field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestinationForm {
    slug: Option<String>,
    title: Option<String>,
    tagline: Option<String>,
    description: Option<String>,
    region: Option<Region>,
    countries: Option<i32>,
    cities: Option<i32>,
    days: Option<i32>,
    year: Option<i32>,
    departure_date: Option<String>,
    return_date: Option<String>,
    departure_city: Option<String>,
    cover_path: Option<String>,
    hero_path: Option<String>,
    map_path: Option<String>,
    itinerary_path: Option<String>,
    whatsapp_url: Option<String>,
    video_urls: Option<Vec<String>>,
    includes: Option<Vec<String>>,
    featured: Option<bool>,
    active: Option<bool>,
    partner: Option<bool>,
    badge: Option<Badge>,
}

/// Overwrite when provided
fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Overwrite when provided, empty text clears
fn set_optional(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = non_empty(value);
    }
}

impl UpdateDestinationForm {
    /// Apply the provided fields on the current values
    fn apply(self, values: &mut DestinationValues) -> Result<(), Error> {
        if let Some(slug) = self.slug {
            values.slug = parse_slug(&slug)?;
        }

        set(&mut values.title, self.title.map(|title| title.trim().to_string()));
        set(&mut values.tagline, self.tagline);
        set(&mut values.description, self.description);
        set(&mut values.region, self.region);
        set(&mut values.countries, self.countries);
        set(&mut values.cities, self.cities);
        set(&mut values.days, self.days);
        set(&mut values.year, self.year);
        set(
            &mut values.departure_date,
            self.departure_date.map(|date| date.trim().to_string()),
        );
        set_optional(&mut values.return_date, self.return_date);
        set(&mut values.departure_city, self.departure_city);
        set_optional(&mut values.cover_path, self.cover_path);
        set_optional(&mut values.hero_path, self.hero_path);
        set_optional(&mut values.map_path, self.map_path);
        set_optional(&mut values.itinerary_path, self.itinerary_path);
        set(&mut values.whatsapp_url, self.whatsapp_url);
        set(&mut values.video_urls, self.video_urls);
        set(&mut values.includes, self.includes);
        set(&mut values.featured, self.featured);
        set(&mut values.active, self.active);
        set(&mut values.partner, self.partner);
        set(&mut values.badge, self.badge);

        Ok(())
    }
}

/// Update a destination based on the [`UpdateDestinationForm`](UpdateDestinationForm) form
///
/// Only provided values are processed, the other fields of the destination will not be touched
///
/// Request:
/// ```sh
/// curl -v -XPATCH -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "active": false, "badge": "agotado" }' \
///     http://localhost:6000/api/admin/destinations/<uuid>
/// ```
///
/// Response
/// ```json
/// { "data": { "id": "<uuid>", "slug": "peru-magico-2026", "active": false ... } }
/// ```
pub async fn update<S: Storage>(
    audit_trail: AuditTrail,
    Extension(storage): Extension<S>,
    Extension(source): Extension<CatalogSource<S>>,
    PathParameters(destination_id): PathParameters<Uuid>,
    Form(form): Form<UpdateDestinationForm>,
) -> Result<Success<AdminDestinationResponse>, Error> {
    let destination = fetch_destination(&storage, &destination_id).await?;

    let mut values = DestinationValues::from_destination(&destination);
    form.apply(&mut values)?;

    validate(&values)?;

    if values.slug != destination.slug {
        ensure_unique_slug(&storage, &values.slug, Some(&destination.id)).await?;
    }

    let updated_destination = storage
        .update_destination(&destination, &values)
        .await
        .map_err(Error::storage)?;

    source.invalidate().await;

    audit_trail.register(&AuditEntry::UpdateDestination(&updated_destination.slug));

    Ok(Success::ok(AdminDestinationResponse::from_destination(
        updated_destination,
    )))
}

/// Delete a destination
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/destinations/<uuid>
/// ```
pub async fn delete<S: Storage>(
    audit_trail: AuditTrail,
    Extension(storage): Extension<S>,
    Extension(source): Extension<CatalogSource<S>>,
    PathParameters(destination_id): PathParameters<Uuid>,
) -> Result<Success<()>, Error> {
    let destination = fetch_destination(&storage, &destination_id).await?;

    storage
        .delete_destination(&destination)
        .await
        .map_err(Error::storage)?;

    source.invalidate().await;

    audit_trail.register(&AuditEntry::DeleteDestination(&destination.slug));

    Ok(Success::no_content())
}

/// Dashboard counters
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    total: usize,
    active: usize,
    featured: usize,
    partner: usize,
}

impl StatsResponse {
    fn from_stats(stats: AdminStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            featured: stats.featured,
            partner: stats.partner,
        }
    }
}

/// Get the dashboard counters
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/stats
/// ```
///
/// Response
/// ```json
/// { "data": { "total": 8, "active": 7, "featured": 3, "partner": 1 } }
/// ```
pub async fn stats<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser,
) -> Result<Success<StatsResponse>, Error> {
    let destinations = storage
        .find_all_destinations()
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(StatsResponse::from_stats(
        AdminTable::new(&destinations).stats(),
    )))
}

/// Result of seeding the storage
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// Number of written destinations
    inserted: usize,
    slugs: Vec<String>,
}

/// Write every bundled destination to the storage
///
/// Existing destinations with the same slug are overwritten, seeding twice gives the same result
///
/// Request:
/// ```sh
/// curl -v -XPOST -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/seed
/// ```
///
/// Response
/// ```json
/// { "data": { "inserted": 8, "slugs": [ "alma-europea-2026" ... ] } }
/// ```
pub async fn seed<S: Storage>(
    audit_trail: AuditTrail,
    Extension(storage): Extension<S>,
    Extension(source): Extension<CatalogSource<S>>,
) -> Result<Success<SeedResponse>, Error> {
    let mut slugs = Vec::new();

    for destination in source.fallback().destinations() {
        let values = DestinationValues::from_destination(destination);

        let stored = storage
            .upsert_destination(&values)
            .await
            .map_err(Error::storage)?;

        slugs.push(stored.slug);
    }

    source.invalidate().await;

    audit_trail.register(&AuditEntry::Seed(slugs.len()));

    Ok(Success::ok(SeedResponse {
        inserted: slugs.len(),
        slugs,
    }))
}

/// Result of a revalidation
#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    revalidated: bool,
}

/// Drop the cached catalog, the next visitor gets fresh data
///
/// Request:
/// ```sh
/// curl -v -XPOST -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/revalidate
/// ```
///
/// Response
/// ```json
/// { "data": { "revalidated": true } }
/// ```
pub async fn revalidate<S: Storage>(
    audit_trail: AuditTrail,
    Extension(source): Extension<CatalogSource<S>>,
) -> Success<RevalidateResponse> {
    source.invalidate().await;

    audit_trail.register(&AuditEntry::Revalidate);

    Success::ok(RevalidateResponse { revalidated: true })
}

/// Fetch destination from storage
async fn fetch_destination<S: Storage>(
    storage: &S,
    destination_id: &Uuid,
) -> Result<Destination, Error> {
    storage
        .find_single_destination_by_id(destination_id)
        .await
        .map_err(Error::storage)?
        .map_or_else(|| Err(Error::not_found("Destination not found")), Ok)
}
