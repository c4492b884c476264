//! Postgres storage

use std::time::Duration;

use chrono::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgArguments;
use sqlx::postgres::PgPoolOptions;
use sqlx::query::QueryAs;
use uuid::Uuid;

use crate::destinations::Badge;
use crate::destinations::Destination;
use crate::destinations::DestinationValues;
use crate::destinations::Region;

use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Columns of the destinations table, in insert order
const COLUMNS: &str = r"
    slug, title, tagline, description, region, countries, cities, days, year,
    departure_date, return_date, departure_city, cover_path, hero_path, map_path,
    itinerary_path, whatsapp_url, video_urls, includes, featured, active, partner, badge
";

/// Postgres type for destination region
#[derive(Clone, Copy, PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "destination_region")]
#[sqlx(rename_all = "kebab-case")]
enum RegionType {
    Europa,
    America,
    Asia,
    AfricaMo,
    Oceania,
}

impl RegionType {
    /// Create region type from region
    fn from_region(region: Region) -> Self {
        match region {
            Region::Europa => RegionType::Europa,
            Region::America => RegionType::America,
            Region::Asia => RegionType::Asia,
            Region::AfricaMo => RegionType::AfricaMo,
            Region::Oceania => RegionType::Oceania,
        }
    }

    /// Create region from region type
    fn to_region(self) -> Region {
        match self {
            RegionType::Europa => Region::Europa,
            RegionType::America => Region::America,
            RegionType::Asia => Region::Asia,
            RegionType::AfricaMo => Region::AfricaMo,
            RegionType::Oceania => Region::Oceania,
        }
    }
}

/// Postgres type for destination badge
#[derive(Clone, Copy, PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "destination_badge")]
#[sqlx(rename_all = "lowercase")]
enum BadgeType {
    Ninguno,
    Agotado,
    Ultimos,
    Nuevo,
    Popular,
}

impl BadgeType {
    /// Create badge type from badge
    fn from_badge(badge: Badge) -> Self {
        match badge {
            Badge::None => BadgeType::Ninguno,
            Badge::SoldOut => BadgeType::Agotado,
            Badge::LastSpots => BadgeType::Ultimos,
            Badge::New => BadgeType::Nuevo,
            Badge::Popular => BadgeType::Popular,
        }
    }

    /// Create badge from badge type
    fn to_badge(self) -> Badge {
        match self {
            BadgeType::Ninguno => Badge::None,
            BadgeType::Agotado => Badge::SoldOut,
            BadgeType::Ultimos => Badge::LastSpots,
            BadgeType::Nuevo => Badge::New,
            BadgeType::Popular => Badge::Popular,
        }
    }
}

/// Postgres version of destination
#[derive(sqlx::FromRow)]
struct SqlxDestination {
    id: Uuid,
    slug: String,
    title: String,
    tagline: String,
    description: String,
    region: RegionType,
    countries: i32,
    cities: i32,
    days: i32,
    year: i32,
    departure_date: String,
    return_date: Option<String>,
    departure_city: String,
    cover_path: Option<String>,
    hero_path: Option<String>,
    map_path: Option<String>,
    itinerary_path: Option<String>,
    whatsapp_url: String,
    video_urls: Vec<String>,
    includes: Vec<String>,
    featured: bool,
    active: bool,
    partner: bool,
    badge: BadgeType,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Destination {
    /// Create destination from postgres version
    fn from_sqlx_destination(destination: SqlxDestination) -> Self {
        Self {
            id: destination.id,
            slug: destination.slug,
            title: destination.title,
            tagline: destination.tagline,
            description: destination.description,
            region: destination.region.to_region(),
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
            badge: destination.badge.to_badge(),
            created_at: destination.created_at,
            updated_at: destination.updated_at,
        }
    }

    /// Maybe create destination from postgres version
    fn from_sqlx_destination_optional(destination: Option<SqlxDestination>) -> Option<Self> {
        destination.map(Self::from_sqlx_destination)
    }

    /// Create multiple destinations from postgres version
    fn from_sqlx_destination_multiple(destinations: Vec<SqlxDestination>) -> Vec<Self> {
        destinations
            .into_iter()
            .map(Self::from_sqlx_destination)
            .collect()
    }
}

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Migrations will be run
    pub async fn new(database_connection_string: &str) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_connection_string)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Connection(format!("Migrations could not run: {err}")))?;

        Ok(Self { connection_pool })
    }
}

/// Query returning destination rows
type DestinationQuery<'q> = QueryAs<'q, sqlx::Postgres, SqlxDestination, PgArguments>;

/// Bind every value of a destination in `COLUMNS` order
fn bind_values<'q>(
    query: DestinationQuery<'q>,
    values: &'q DestinationValues,
) -> DestinationQuery<'q> {
    query
        .bind(&values.slug)
        .bind(&values.title)
        .bind(&values.tagline)
        .bind(&values.description)
        .bind(RegionType::from_region(values.region))
        .bind(values.countries)
        .bind(values.cities)
        .bind(values.days)
        .bind(values.year)
        .bind(&values.departure_date)
        .bind(&values.return_date)
        .bind(&values.departure_city)
        .bind(&values.cover_path)
        .bind(&values.hero_path)
        .bind(&values.map_path)
        .bind(&values.itinerary_path)
        .bind(&values.whatsapp_url)
        .bind(&values.video_urls)
        .bind(&values.includes)
        .bind(values.featured)
        .bind(values.active)
        .bind(values.partner)
        .bind(BadgeType::from_badge(values.badge))
}

impl Storage for Postgres {
    async fn find_active_destinations(&self) -> Result<Vec<Destination>> {
        let destinations = sqlx::query_as::<_, SqlxDestination>(
            r"
            SELECT *
            FROM destinations
            WHERE active = TRUE
            ORDER BY year ASC, departure_date ASC, slug ASC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Destination::from_sqlx_destination_multiple)
        .map_err(connection_error)?;

        Ok(destinations)
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        let destinations = sqlx::query_as::<_, SqlxDestination>(
            r"
            SELECT *
            FROM destinations
            ORDER BY year DESC, departure_date ASC, slug ASC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Destination::from_sqlx_destination_multiple)
        .map_err(connection_error)?;

        Ok(destinations)
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        let destination = sqlx::query_as::<_, SqlxDestination>(
            r"
            SELECT *
            FROM destinations
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Destination::from_sqlx_destination_optional)
        .map_err(connection_error)?;

        Ok(destination)
    }

    async fn find_single_destination_by_slug(&self, slug: &str) -> Result<Option<Destination>> {
        let destination = sqlx::query_as::<_, SqlxDestination>(
            r"
            SELECT *
            FROM destinations
            WHERE slug = $1
            LIMIT 1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Destination::from_sqlx_destination_optional)
        .map_err(connection_error)?;

        Ok(destination)
    }

    async fn create_destination(&self, values: &DestinationValues) -> Result<Destination> {
        let sql = format!(
            r"
            INSERT INTO destinations (id, {COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24)
            RETURNING *
            "
        );

        let query = sqlx::query_as::<_, SqlxDestination>(&sql).bind(Uuid::new_v4());

        let destination = bind_values(query, values)
            .fetch_one(&self.connection_pool)
            .await
            .map(Destination::from_sqlx_destination)
            .map_err(|err| write_error(err, &values.slug))?;

        Ok(destination)
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &DestinationValues,
    ) -> Result<Destination> {
        let sql = format!(
            r"
            UPDATE destinations
            SET ({COLUMNS}, updated_at) = ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, CURRENT_TIMESTAMP)
            WHERE id = $1
            RETURNING *
            "
        );

        let query = sqlx::query_as::<_, SqlxDestination>(&sql).bind(destination.id);

        let destination = bind_values(query, values)
            .fetch_one(&self.connection_pool)
            .await
            .map(Destination::from_sqlx_destination)
            .map_err(|err| write_error(err, &values.slug))?;

        Ok(destination)
    }

    async fn upsert_destination(&self, values: &DestinationValues) -> Result<Destination> {
        let sql = format!(
            r"
            INSERT INTO destinations (id, {COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24)
            ON CONFLICT (slug) DO UPDATE
            SET ({COLUMNS}, updated_at) = (
                EXCLUDED.slug, EXCLUDED.title, EXCLUDED.tagline, EXCLUDED.description,
                EXCLUDED.region, EXCLUDED.countries, EXCLUDED.cities, EXCLUDED.days,
                EXCLUDED.year, EXCLUDED.departure_date, EXCLUDED.return_date,
                EXCLUDED.departure_city, EXCLUDED.cover_path, EXCLUDED.hero_path,
                EXCLUDED.map_path, EXCLUDED.itinerary_path, EXCLUDED.whatsapp_url,
                EXCLUDED.video_urls, EXCLUDED.includes, EXCLUDED.featured, EXCLUDED.active,
                EXCLUDED.partner, EXCLUDED.badge, CURRENT_TIMESTAMP
            )
            RETURNING *
            "
        );

        let query = sqlx::query_as::<_, SqlxDestination>(&sql).bind(Uuid::new_v4());

        let destination = bind_values(query, values)
            .fetch_one(&self.connection_pool)
            .await
            .map(Destination::from_sqlx_destination)
            .map_err(|err| write_error(err, &values.slug))?;

        Ok(destination)
    }

    async fn delete_destination(&self, destination: &Destination) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM destinations
            WHERE id = $1
            ",
        )
        .bind(destination.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}

/// Map any error to a connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    tracing::error!("Storage error: {err}");

    Error::Connection(err.to_string())
}

/// Map a failed write, a taken slug is reported as such
fn write_error(err: sqlx::Error, slug: &str) -> Error {
    match &err {
        sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
            Error::DuplicateSlug(slug.to_string())
        }
        _ => connection_error(err),
    }
}
