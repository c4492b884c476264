//! All things related to the storage of destinations
//!
//! This is the dynamic data source of the catalog, the bundled destinations live in
//! [`crate::fallback`].

use core::fmt;
use std::future::Future;

use uuid::Uuid;

use crate::destinations::Destination;
use crate::destinations::DestinationValues;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;

/// How to setup the storage
pub enum Config {
    /// Detect configuration from environment
    ///
    /// Postgres when `DATABASE_URL` is set, memory otherwise
    DetectConfig,

    /// Use an existing Postgres connection pool
    #[allow(dead_code)] // handy for running against a test database
    ExistingConnection(sqlx::PgPool),

    /// Use the given memory storage
    #[cfg_attr(not(test), allow(dead_code))]
    Memory(Memory),
}

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),

    /// A stored record does not make sense
    InvalidRecord(String),

    /// Another destination already has the slug
    DuplicateSlug(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
            Error::InvalidRecord(error) => write!(f, "Invalid record: {error}"),
            Error::DuplicateSlug(slug) => write!(f, "Duplicate slug: {slug}"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage with all supported operations
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all active destinations
    ///
    /// Ordered by year, then by departure text
    fn find_active_destinations(&self) -> impl Future<Output = Result<Vec<Destination>>> + Send;

    /// Find all destinations, inactive ones included
    ///
    /// Ordered by year (newest first), then by departure text
    fn find_all_destinations(&self) -> impl Future<Output = Result<Vec<Destination>>> + Send;

    /// Find a single destination by ID
    fn find_single_destination_by_id(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<Destination>>> + Send;

    /// Find a single destination by slug
    ///
    /// DOES NOT check whether the destination is active, handle with care
    fn find_single_destination_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Destination>>> + Send;

    /// Create a destination
    fn create_destination(
        &self,
        values: &DestinationValues,
    ) -> impl Future<Output = Result<Destination>> + Send;

    /// Update a single destination, every value is overwritten
    fn update_destination(
        &self,
        destination: &Destination,
        values: &DestinationValues,
    ) -> impl Future<Output = Result<Destination>> + Send;

    /// Create a destination, or overwrite the one with the same slug
    fn upsert_destination(
        &self,
        values: &DestinationValues,
    ) -> impl Future<Output = Result<Destination>> + Send;

    /// Delete a destination
    fn delete_destination(&self, destination: &Destination)
    -> impl Future<Output = Result<()>> + Send;
}
