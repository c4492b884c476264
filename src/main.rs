#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum_client_ip::ClientIpSource;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;
use url::Url;

use crate::api::JwtKeys;
use crate::api::router;
use crate::fallback::StaticCatalog;
use crate::media::MediaUrls;
use crate::source::CatalogSource;
use crate::storage::Config as StorageConfig;
use crate::storage::Memory;
use crate::storage::Postgres;
use crate::storage::Storage;
use crate::users::AdminAccount;
use crate::utils::env_var;
use crate::utils::env_var_or_else;
use crate::utils::env_var_parsed_or;

mod api;
mod catalog;
mod destinations;
mod fallback;
mod graceful_shutdown;
mod media;
mod password;
mod source;
mod storage;
#[cfg(test)]
mod tests;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "salidas=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_CATALOG_CACHE_TTL: u64 = 3600;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app(StorageConfig::DetectConfig).await?;

    let address = setup_address()?;
    tracing::info!("Listening on {}", address);

    let listener = tokio::net::TcpListener::bind(&address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown::handler())
    .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Database connection
/// - Bundled destinations
/// - Admin account
pub async fn setup_app(config: StorageConfig) -> Result<Router> {
    match config {
        StorageConfig::DetectConfig => {
            if let Some(database_url) = env_var("DATABASE_URL") {
                create_router(Postgres::new(&database_url).await?)
            } else {
                tracing::warn!("`DATABASE_URL` is not set, destinations are kept in memory");

                create_router(Memory::new())
            }
        }
        StorageConfig::ExistingConnection(pool) => {
            create_router(Postgres::new_with_pool(pool).await?)
        }
        StorageConfig::Memory(memory) => create_router(memory),
    }
}

/// Create the router for the catalog
fn create_router<S: Storage>(storage: S) -> Result<Router> {
    let jwt_keys = setup_jwt_keys();
    let account = AdminAccount::from_env()?;
    let source = CatalogSource::new(storage.clone(), setup_fallback()?, setup_cache_ttl()?);
    let media = setup_media()?;

    Ok(Router::new()
        .nest("/api", router::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(ClientIpSource::ConnectInfo.into_extension())
        .layer(Extension(storage))
        .layer(Extension(source))
        .layer(Extension(media))
        .layer(Extension(account))
        .layer(Extension(jwt_keys)))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_jwt_keys() -> JwtKeys {
    use crate::password::generate;

    let jwt_secret = env_var_or_else("JWT_SECRET", || {
        let jwt_secret = generate();
        tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
        jwt_secret
    });

    JwtKeys::new(jwt_secret.as_bytes())
}

fn setup_fallback() -> Result<StaticCatalog> {
    match env_var("STATIC_DESTINATIONS_PATH") {
        Some(path) => StaticCatalog::from_file(Path::new(&path)),
        None => StaticCatalog::bundled(),
    }
}

fn setup_media() -> Result<MediaUrls> {
    let base = env_var("MEDIA_PUBLIC_URL")
        .map(|base| Url::parse(&base).context("Invalid `MEDIA_PUBLIC_URL`"))
        .transpose()?;

    Ok(MediaUrls::new(base))
}

fn setup_cache_ttl() -> Result<Duration> {
    env_var_parsed_or("CATALOG_CACHE_TTL", DEFAULT_CATALOG_CACHE_TTL).map(Duration::from_secs)
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var("PORT") {
        let port = port.parse::<u16>()?;

        address.set_port(port);
    }

    Ok(address)
}
