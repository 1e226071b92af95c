//! In-process booking service
//!
//! Serves the booking routes with the demo service's rules:
//! - `POST /auth` answers 200 with `{"token"}` for `admin`/`password123`,
//!   200 with `{"reason":"Bad credentials"}` otherwise, and 503 for the
//!   `outage` user
//! - writes need the token as `Cookie: token=<t>` or `Authorization: Bearer <t>`
//!   and answer 403 without it
//! - unparsable create bodies answer 500, deletes answer 201, writes to an
//!   unknown id answer 405

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use challenge_common::{ApiConfig, Booking, BookingQuery, BookingRef, CreatedBooking, Credentials, PartialBooking};

pub const TOKEN: &str = "abc123";

/// Username whose login attempts answer 503
pub const OUTAGE_USER: &str = "outage";

#[derive(Default)]
struct Store {
    next_id: u64,
    bookings: BTreeMap<u64, Booking>,
    accept_headers: Vec<String>,
}

type Shared = Arc<Mutex<Store>>;

/// Handle to a running mock service; the server task lives as long as the runtime
pub struct MockServiceHandle {
    pub base_url: String,
    pub port: u16,
    state: Shared,
}

impl MockServiceHandle {
    /// Bind an ephemeral port on 127.0.0.1 and start serving
    pub async fn spawn() -> std::io::Result<Self> {
        let state = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let app = router(state.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("Mock booking service stopped: {}", e);
            }
        });
        debug!("Mock booking service on {}", addr);

        Ok(Self {
            base_url: format!("http://{}", addr),
            port: addr.port(),
            state,
        })
    }

    /// Default API settings pointed at this service
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            ..Default::default()
        }
    }

    /// `Accept` headers seen on `POST /booking`, in arrival order
    pub fn accept_headers(&self) -> Vec<String> {
        self.state.lock().accept_headers.clone()
    }

    pub fn booking_count(&self) -> usize {
        self.state.lock().bookings.len()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth", post(auth))
        .route("/booking", post(create).get(list))
        .route("/booking/:id", get(fetch).put(replace).patch(patch).delete(remove))
        .with_state(state)
}

fn authorized(headers: &HeaderMap) -> bool {
    let cookie = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(';').any(|c| c.trim() == format!("token={}", TOKEN)));
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN));
    cookie || bearer
}

async fn auth(Json(credentials): Json<Credentials>) -> Response {
    match (credentials.username.as_str(), credentials.password.as_str()) {
        ("admin", "password123") => Json(json!({ "token": TOKEN })).into_response(),
        (OUTAGE_USER, _) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Json(json!({ "reason": "Bad credentials" })).into_response(),
    }
}

async fn create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut store = state.lock();
    if let Some(accept) = headers.get("accept").and_then(|v| v.to_str().ok()) {
        store.accept_headers.push(accept.to_string());
    }
    let Ok(booking) = serde_json::from_value::<Booking>(body) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    store.next_id += 1;
    let id = store.next_id;
    store.bookings.insert(id, booking.clone());
    Json(CreatedBooking { bookingid: id, booking }).into_response()
}

async fn list(State(state): State<Shared>, Query(query): Query<BookingQuery>) -> Response {
    let refs: Vec<BookingRef> = state
        .lock()
        .bookings
        .iter()
        .filter(|(_, b)| query.firstname.as_ref().map_or(true, |f| &b.firstname == f))
        .filter(|(_, b)| query.lastname.as_ref().map_or(true, |l| &b.lastname == l))
        .filter(|(_, b)| query.checkin.map_or(true, |d| b.bookingdates.checkin >= d))
        .filter(|(_, b)| query.checkout.map_or(true, |d| b.bookingdates.checkout <= d))
        .map(|(id, _)| BookingRef { bookingid: *id })
        .collect();
    Json(refs).into_response()
}

async fn fetch(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    match state.lock().bookings.get(&id) {
        Some(booking) => Json(booking.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn replace(State(state): State<Shared>, Path(id): Path<u64>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let Ok(booking) = serde_json::from_value::<Booking>(body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut store = state.lock();
    if !store.bookings.contains_key(&id) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    store.bookings.insert(id, booking.clone());
    Json(booking).into_response()
}

async fn patch(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(partial): Json<PartialBooking>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let mut store = state.lock();
    let Some(existing) = store.bookings.get(&id) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };
    let merged = partial.apply_to(existing);
    store.bookings.insert(id, merged.clone());
    Json(merged).into_response()
}

async fn remove(State(state): State<Shared>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match state.lock().bookings.remove(&id) {
        Some(_) => (StatusCode::CREATED, "Created").into_response(),
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use test_case::test_case;

    #[test_case("cookie", "token=abc123", true ; "cookie token")]
    #[test_case("cookie", "theme=dark; token=abc123", true ; "cookie among others")]
    #[test_case("authorization", "Bearer abc123", true ; "bearer token")]
    #[test_case("cookie", "token=wrong", false ; "wrong cookie")]
    #[test_case("authorization", "abc123", false ; "bearer without scheme")]
    fn test_authorized(name: &'static str, value: &'static str, expected: bool) {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        assert_eq!(authorized(&headers), expected);
    }

    #[test]
    fn test_no_credentials_is_unauthorized() {
        assert!(!authorized(&HeaderMap::new()));
    }
}
