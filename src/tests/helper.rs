use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use crate::setup_app;
use crate::storage::Config as StorageConfig;
use crate::storage::Memory;

/// Test helper version of a destination, public or admin
#[derive(Debug)]
pub struct Destination {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub departure_date: String,
    pub active: Option<bool>,
    pub badge: Option<String>,
}

/// Test helper version of the public catalog
#[derive(Debug)]
pub struct Catalog {
    pub slugs: Vec<String>,
    pub total: u64,
    pub available: u64,
    pub has_more: bool,
    pub regions: Vec<String>,
    pub years: Vec<i64>,
}

/// Test helper version of the admin table
#[derive(Debug)]
pub struct AdminTable {
    pub slugs: Vec<String>,
    pub count: u64,
    pub years: Vec<i64>,
}

/// Error response
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub error: String,
    pub description: Option<String>,
}

/// Setup the app with an empty memory storage
///
/// Inject some environment variables to match our tests
pub async fn setup_test_app() -> Router {
    setup_test_app_with_storage(Memory::new()).await
}

/// Setup the app with a storage that can not be reached
pub async fn setup_unavailable_test_app() -> Router {
    setup_test_app_with_storage(Memory::unavailable()).await
}

async fn setup_test_app_with_storage(memory: Memory) -> Router {
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("ADMIN_USERNAME", "admin");
        std::env::set_var("ADMIN_PASSWORD", "verysecret");
        std::env::set_var("JWT_SECRET", "verysecret");
    }

    setup_app(StorageConfig::Memory(memory)).await.unwrap()
}

/// Send a request, JSON in and out
async fn send(
    app: &mut Router,
    method: Method,
    uri: &str,
    access_token: Option<&str>,
    payload: Option<&Value>,
) -> (StatusCode, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(access_token) = access_token {
        builder = builder.header(AUTHORIZATION, access_token);
    }

    let body = if let Some(payload) = payload {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        Body::from(serde_json::to_vec(payload).unwrap())
    } else {
        Body::empty()
    };

    let response = app.call(builder.body(body).unwrap()).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, body)
}

pub async fn maybe_login(
    app: &mut Router,
    username: &str,
    password: &str,
) -> (StatusCode, Option<String>, Option<String>) {
    let payload = json!({ "username": username, "password": password });

    let (status_code, body) = send(
        app,
        Method::POST,
        "/api/admin/token",
        None,
        Some(&payload),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_access_token(&body))
        } else {
            None
        },
        if status_code == StatusCode::OK {
            None
        } else {
            Some(get_error_message(&body))
        },
    )
}

pub async fn login(app: &mut Router) -> String {
    let (status_code, access_token, _) = maybe_login(app, "admin", "verysecret").await;

    assert_eq!(StatusCode::OK, status_code);

    access_token.unwrap()
}

pub async fn catalog(app: &mut Router, query: &str) -> (StatusCode, Option<Catalog>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/destinations{query}"),
        None,
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_catalog(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn featured(app: &mut Router) -> Vec<Destination> {
    let (status_code, body) =
        send(app, Method::GET, "/api/destinations/featured", None, None).await;

    assert_eq!(StatusCode::OK, status_code);

    get_destinations(&body)
}

pub async fn route_slugs(app: &mut Router) -> Vec<String> {
    let (status_code, body) = send(app, Method::GET, "/api/destinations/slugs", None, None).await;

    assert_eq!(StatusCode::OK, status_code);

    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slug| slug.as_str().unwrap().to_string())
        .collect()
}

pub async fn destination_page(
    app: &mut Router,
    slug: &str,
) -> (StatusCode, Option<(Destination, Vec<Destination>)>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/destinations/{slug}"),
        None,
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            let data = serde_json::from_slice::<Value>(&body[..]).unwrap()["data"].clone();

            Some((
                value_to_destination(data["destination"].as_object().unwrap()),
                data["related"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|destination| value_to_destination(destination.as_object().unwrap()))
                    .collect(),
            ))
        } else {
            None
        },
    )
}

/// A valid payload to create a destination with
pub fn destination_payload(title: &str, region: &str, year: i32, departure_date: &str) -> Value {
    json!({
        "title": title,
        "region": region,
        "year": year,
        "departureDate": departure_date,
        "countries": 2,
        "cities": 5,
        "days": 12,
        "whatsappUrl": "https://wa.link/ggzwq4",
    })
}

pub async fn maybe_create_destination(
    app: &mut Router,
    access_token: &str,
    payload: &Value,
) -> (StatusCode, Option<Destination>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::POST,
        "/api/admin/destinations",
        Some(access_token),
        Some(payload),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_destination(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn create_destination(
    app: &mut Router,
    access_token: &str,
    payload: &Value,
) -> Destination {
    let (status_code, destination, _) =
        maybe_create_destination(app, access_token, payload).await;

    assert_eq!(StatusCode::CREATED, status_code);

    destination.unwrap()
}

pub async fn maybe_create_destination_with_raw_body(
    app: &mut Router,
    access_token: &str,
    body: &'static str,
    include_content_type: bool,
) -> (StatusCode, Option<Error>) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/destinations");

    if include_content_type {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = builder
        .header(AUTHORIZATION, access_token)
        .body(Body::from(body.as_bytes()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_update_destination(
    app: &mut Router,
    access_token: &str,
    id: &Uuid,
    payload: &Value,
) -> (StatusCode, Option<Destination>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::PATCH,
        &format!("/api/admin/destinations/{id}"),
        Some(access_token),
        Some(payload),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_destination(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST || status_code == StatusCode::NOT_FOUND {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_delete_destination(
    app: &mut Router,
    access_token: &str,
    id: &Uuid,
) -> (StatusCode, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::DELETE,
        &format!("/api/admin/destinations/{id}"),
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::NOT_FOUND {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn single_destination(
    app: &mut Router,
    access_token: &str,
    id: &str,
) -> (StatusCode, Option<Destination>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/admin/destinations/{id}"),
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_destination(&body))
        } else {
            None
        },
        if status_code == StatusCode::OK {
            None
        } else {
            Some(get_error_message(&body))
        },
    )
}

pub async fn admin_table(
    app: &mut Router,
    access_token: &str,
    query: &str,
) -> (StatusCode, Option<AdminTable>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/admin/destinations{query}"),
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_admin_table(&body))
        } else {
            None
        },
    )
}

pub async fn stats(app: &mut Router, access_token: &str) -> (StatusCode, Option<Value>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        "/api/admin/stats",
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_data(&body))
        } else {
            None
        },
    )
}

pub async fn seed(app: &mut Router, access_token: &str) -> (StatusCode, Option<Value>) {
    let (status_code, body) = send(
        app,
        Method::POST,
        "/api/admin/seed",
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_data(&body))
        } else {
            None
        },
    )
}

pub async fn revalidate(app: &mut Router, access_token: &str) -> StatusCode {
    let (status_code, _) = send(
        app,
        Method::POST,
        "/api/admin/revalidate",
        Some(access_token),
        None,
    )
    .await;

    status_code
}

fn value_to_destination(destination: &Map<String, Value>) -> Destination {
    Destination {
        id: destination["id"]
            .as_str()
            .map(Uuid::parse_str)
            .unwrap()
            .unwrap(),
        slug: destination["slug"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        title: destination["title"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        departure_date: destination["departureDate"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        active: destination.get("active").and_then(Value::as_bool),
        badge: destination
            .get("badge")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn get_data(body: &Bytes) -> Value {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"].clone()
}

fn get_destination(body: &Bytes) -> Destination {
    get_data(body)
        .as_object()
        .map(value_to_destination)
        .unwrap()
}

fn get_destinations(body: &Bytes) -> Vec<Destination> {
    get_data(body)
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_object().unwrap())
        .map(value_to_destination)
        .collect()
}

fn get_slugs(destinations: &Value) -> Vec<String> {
    destinations
        .as_array()
        .unwrap()
        .iter()
        .map(|destination| destination["slug"].as_str().unwrap().to_string())
        .collect()
}

fn get_years(years: &Value) -> Vec<i64> {
    years
        .as_array()
        .unwrap()
        .iter()
        .map(|year| year.as_i64().unwrap())
        .collect()
}

fn get_catalog(body: &Bytes) -> Catalog {
    let data = get_data(body);

    Catalog {
        slugs: get_slugs(&data["destinations"]),
        total: data["total"].as_u64().unwrap(),
        available: data["available"].as_u64().unwrap(),
        has_more: data["hasMore"].as_bool().unwrap(),
        regions: data["regions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|region| region["value"].as_str().unwrap().to_string())
            .collect(),
        years: get_years(&data["years"]),
    }
}

fn get_admin_table(body: &Bytes) -> AdminTable {
    let data = get_data(body);

    AdminTable {
        slugs: get_slugs(&data["destinations"]),
        count: data["count"].as_u64().unwrap(),
        years: get_years(&data["years"]),
    }
}

fn value_to_error(error: &Map<String, Value>) -> Error {
    Error {
        error: error["error"].as_str().map(ToString::to_string).unwrap(),
        description: error
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn get_error(body: &Bytes) -> Error {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_error)
        .unwrap()
}

fn get_error_message(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["error"]
        .as_str()
        .map(ToString::to_string)
        .unwrap()
}

fn get_access_token(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]["accessToken"]
        .as_str()
        .map(|access_token| format!("Bearer {access_token}"))
        .unwrap()
}
