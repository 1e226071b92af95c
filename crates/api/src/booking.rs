//! Booking resource calls
//!
//! Each call is a single request returning the raw response. Write calls made
//! on an unauthenticated session are sent as-is so the service can refuse
//! them (403).

use challenge_common::{BookingId, BookingQuery};
use reqwest::Response;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::session::ApiSession;

const BOOKING_ENDPOINT: &str = "/booking";

impl ApiSession {
    /// `POST /booking`
    pub async fn create_booking<T>(&self, payload: &T) -> ApiResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(BOOKING_ENDPOINT);
        debug!("POST {}", url);
        Ok(self.client().post(&url).json(payload).send().await?)
    }

    /// `GET /booking`
    pub async fn list_bookings(&self) -> ApiResult<Response> {
        let url = self.url(BOOKING_ENDPOINT);
        debug!("GET {}", url);
        Ok(self.client().get(&url).send().await?)
    }

    /// `GET /booking?...` with the present filters as query parameters
    pub async fn list_bookings_by(&self, query: &BookingQuery) -> ApiResult<Response> {
        let url = self.url(BOOKING_ENDPOINT);
        debug!("GET {} {:?}", url, query);
        Ok(self.client().get(&url).query(query).send().await?)
    }

    /// `GET /booking/{id}`
    pub async fn get_booking(&self, id: BookingId) -> ApiResult<Response> {
        let url = booking_url(self, id);
        debug!("GET {}", url);
        Ok(self.client().get(&url).send().await?)
    }

    /// `PUT /booking/{id}` (authenticated)
    pub async fn replace_booking<T>(&self, id: BookingId, payload: &T) -> ApiResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let url = booking_url(self, id);
        debug!("PUT {} (authenticated: {})", url, self.is_authenticated());
        Ok(self.client().put(&url).json(payload).send().await?)
    }

    /// `PATCH /booking/{id}` (authenticated)
    pub async fn update_booking<T>(&self, id: BookingId, partial: &T) -> ApiResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let url = booking_url(self, id);
        debug!("PATCH {} (authenticated: {})", url, self.is_authenticated());
        Ok(self.client().patch(&url).json(partial).send().await?)
    }

    /// `DELETE /booking/{id}` (authenticated)
    pub async fn delete_booking(&self, id: BookingId) -> ApiResult<Response> {
        let url = booking_url(self, id);
        debug!("DELETE {} (authenticated: {})", url, self.is_authenticated());
        Ok(self.client().delete(&url).send().await?)
    }
}

fn booking_url(session: &ApiSession, id: BookingId) -> String {
    session.url(&format!("{}/{}", BOOKING_ENDPOINT, id))
}
