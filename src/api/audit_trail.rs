//! Audit trail service
//!
//! Every change to the catalog is logged with the admin that made it

use std::convert::Infallible;
use std::fmt;
use std::net::IpAddr;

use axum::extract::FromRequestParts;
use axum::extract::OptionalFromRequestParts;
use axum::http::request::Parts;

use super::CurrentUser;
use super::Error;

/// Audit trail entries
#[derive(Debug)]
pub enum AuditEntry<'a> {
    /// Destination is created
    CreateDestination(&'a str),

    /// Destination is updated
    UpdateDestination(&'a str),

    /// Destination is deleted
    DeleteDestination(&'a str),

    /// Bundled destinations are written to the storage
    Seed(usize),

    /// Cached catalog is dropped
    Revalidate,
}

impl fmt::Display for AuditEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuditEntry::CreateDestination(slug) => write!(f, "created destination {slug}"),
            AuditEntry::UpdateDestination(slug) => write!(f, "updated destination {slug}"),
            AuditEntry::DeleteDestination(slug) => write!(f, "deleted destination {slug}"),
            AuditEntry::Seed(count) => write!(f, "seeded {count} destinations"),
            AuditEntry::Revalidate => write!(f, "revalidated the catalog"),
        }
    }
}

/// Client IP address, when it can be determined
struct ClientIp(IpAddr);

impl<S> OptionalFromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let ip_address = axum_client_ip::ClientIp::from_request_parts(parts, state).await;

        Ok(ip_address.ok().map(|ip_address| Self(ip_address.0)))
    }
}

/// Audit trail service
pub struct AuditTrail {
    /// The admin making the changes
    current_user: CurrentUser,

    /// The IP address associated with the audit trail
    ip_address: Option<IpAddr>,
}

impl AuditTrail {
    /// Register an entry on the audit trail
    pub fn register(&self, entry: &AuditEntry<'_>) {
        match self.ip_address {
            Some(ip_address) => tracing::info!(
                username = %self.current_user.username,
                %ip_address,
                "Audit: {entry}"
            ),
            None => tracing::info!(username = %self.current_user.username, "Audit: {entry}"),
        }
    }
}

impl<S> FromRequestParts<S> for AuditTrail
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current_user = CurrentUser::from_request_parts(parts, state).await?;

        let ip_address = <Option<ClientIp>>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::internal_server_error("Missing address"))?
            .map(|client_ip| client_ip.0);

        Ok(AuditTrail {
            current_user,
            ip_address,
        })
    }
}
