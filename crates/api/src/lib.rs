//! Booking service client
//!
//! Sessions come in two kinds. An unauthenticated session carries only the
//! JSON default headers; an authenticated one is produced by a single
//! `POST /auth` exchange and additionally carries the returned token.
//! Every booking call is one HTTP request whose raw [`reqwest::Response`]
//! is handed back untouched; status codes are for the caller to judge.

pub mod booking;
pub mod error;
pub mod session;

pub use error::{ApiError, ApiResult};
pub use session::{ApiSession, SessionKind};
