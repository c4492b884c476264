//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use audit_trail::AuditEntry;
pub use audit_trail::AuditTrail;
pub use catalog::FilterQuery;
pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use current_user::Token;
pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use request::parse_slug;
pub use request::parse_url;
pub use request::slugify;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod admin;
mod audit_trail;
mod catalog;
mod current_user;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let destinations = Router::new()
        .route("/", get(catalog::list::<S>))
        .route("/featured", get(catalog::featured::<S>))
        .route("/slugs", get(catalog::slugs::<S>))
        .route("/{slug}", get(catalog::single::<S>));

    let admin_destinations = Router::new()
        .route("/", get(admin::list::<S>).post(admin::create::<S>))
        .route(
            "/{destination}",
            get(admin::single::<S>)
                .patch(admin::update::<S>)
                .delete(admin::delete::<S>),
        );

    let admin = Router::new()
        .route("/token", post(admin::token))
        .route("/stats", get(admin::stats::<S>))
        .route("/seed", post(admin::seed::<S>))
        .route("/revalidate", post(admin::revalidate::<S>))
        .nest("/destinations", admin_destinations);

    Router::new()
        .nest("/destinations", destinations)
        .nest("/admin", admin)
}
