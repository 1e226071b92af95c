//! Domain types for the storefront and booking service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Username/password pair submitted to a login form or auth endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Server-assigned booking identifier
pub type BookingId = u64;

/// Stay dates, serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

/// A complete booking record as accepted by `POST /booking` and `PUT /booking/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: u32,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Body of a `PATCH /booking/{id}` call; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialBooking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totalprice: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depositpaid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookingdates: Option<BookingDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

impl PartialBooking {
    /// Apply the present fields on top of an existing booking
    pub fn apply_to(&self, booking: &Booking) -> Booking {
        let mut merged = booking.clone();
        if let Some(firstname) = &self.firstname {
            merged.firstname = firstname.clone();
        }
        if let Some(lastname) = &self.lastname {
            merged.lastname = lastname.clone();
        }
        if let Some(totalprice) = self.totalprice {
            merged.totalprice = totalprice;
        }
        if let Some(depositpaid) = self.depositpaid {
            merged.depositpaid = depositpaid;
        }
        if let Some(dates) = self.bookingdates {
            merged.bookingdates = dates;
        }
        if let Some(needs) = &self.additionalneeds {
            merged.additionalneeds = Some(needs.clone());
        }
        merged
    }
}

/// Response body of `POST /booking`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBooking {
    pub bookingid: BookingId,
    pub booking: Booking,
}

/// One entry of the `GET /booking` listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRef {
    pub bookingid: BookingId,
}

/// Query-string filters for `GET /booking`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout: Option<NaiveDate>,
}

impl BookingQuery {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.checkin.is_none()
            && self.checkout.is_none()
    }
}

/// Inventory sort order offered by the storefront's sort control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    #[serde(rename = "az")]
    Alphabetical,
    #[serde(rename = "za")]
    ReverseAlphabetical,
    #[serde(rename = "lohi")]
    PriceLowToHigh,
    #[serde(rename = "hilo")]
    PriceHighToLow,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Alphabetical,
        SortOption::ReverseAlphabetical,
        SortOption::PriceLowToHigh,
        SortOption::PriceHighToLow,
    ];

    /// Option value understood by the sort `<select>`
    pub fn as_value(&self) -> &'static str {
        match self {
            SortOption::Alphabetical => "az",
            SortOption::ReverseAlphabetical => "za",
            SortOption::PriceLowToHigh => "lohi",
            SortOption::PriceHighToLow => "hilo",
        }
    }

    /// Whether this option orders by price rather than by name
    pub fn sorts_by_price(&self) -> bool {
        matches!(self, SortOption::PriceLowToHigh | SortOption::PriceHighToLow)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_value() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown sort option: {}", s)))
    }
}
