//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use url::Url;

use super::Error;

/// Turn any text into a slug
///
/// Lowercase, diacritics stripped, every run of other characters than `a-z` and `0-9` becomes
/// a single dash and no dashes at the start or end.
///
/// ```rust
/// assert_eq!(slugify("Perú Mágico 2026"), "peru-magico-2026")
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for ch in text.to_lowercase().nfd().filter(|ch| !is_combining_mark(*ch)) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Parse and normalize a slug
///
/// A slug that normalizes to nothing is invalid
pub fn parse_slug(slug: &str) -> Result<String, Error> {
    let slug = slugify(slug);

    if slug.is_empty() {
        return Err(Error::bad_request("Invalid slug"));
    }

    Ok(slug)
}

/// Parse and validate a URL
///
/// ```rust
/// let url = "https://wa.link/ggzwq4";
/// assert!(parse_url(url).is_ok())
/// ```
pub fn parse_url<I>(url: I) -> Result<Url, Error>
where
    I: AsRef<str>,
{
    Url::parse(url.as_ref())
        .map_err(|err| Error::bad_request("Invalid URL").with_description(err))
}

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request("Data error").with_description(err.body_text()))
            }
            JsonRejection::JsonSyntaxError(err) => {
                let description = std::error::Error::source(&err)
                    .map_or_else(|| err.body_text(), |source| source.to_string());

                Err(Error::bad_request("JSON syntax error").with_description(description))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(err) => {
                Err(Error::bad_request("Invalid path parameter").with_description(err.body_text()))
            }
            PathRejection::MissingPathParams(err) => {
                Err(Error::bad_request("Missing path parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown path error").with_description(err)),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = Path::<P>::from_request_parts(parts, state).await;

        parse_path(path).map(PathParameters)
    }
}

fn parse_query<Q>(query: Result<Query<Q>, QueryRejection>) -> Result<Q, Error> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(QueryRejection::FailedToDeserializeQueryString(err)) => {
            Err(Error::bad_request("Invalid query parameter").with_description(err.body_text()))
        }
        Err(err) => Err(Error::bad_request("Unknown query error").with_description(err)),
    }
}

/// Wrapper for the query string extractor
pub struct QueryParameters<Q>(pub Q);

impl<S, Q> FromRequestParts<S> for QueryParameters<Q>
where
    S: Send + Sync,
    Q: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<Q>::from_request_parts(parts, state).await;

        parse_query(query).map(QueryParameters)
    }
}
