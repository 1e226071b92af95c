//! Static fixture data loaded once per run
//!
//! Fixtures live in `fixtures/ui.yaml` and `fixtures/api.yaml`. The same
//! files are compiled in, so [`Fixtures::builtin`] works from any directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Booking, BookingQuery, Credentials, PartialBooking};

const BUILTIN_UI: &str = include_str!("../../../fixtures/ui.yaml");
const BUILTIN_API: &str = include_str!("../../../fixtures/api.yaml");

/// A storefront user and, for users that cannot log in, the banner they get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFixture {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl UserFixture {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Checkout step-one form input and its expected outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInformation {
    pub first_name: String,
    pub last_name: String,
    pub zip: String,
    #[serde(default)]
    pub should_succeed: bool,
    #[serde(default)]
    pub expected_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryFixtures {
    pub expected_item_count: usize,
    /// Case-insensitive fragments; every item image `src` must contain one
    pub expected_image_srcs: Vec<String>,
    #[serde(default = "default_max_load_time_ms")]
    pub max_load_time_ms: u64,
}

fn default_max_load_time_ms() -> u64 {
    3000
}

impl InventoryFixtures {
    pub fn image_src_allowed(&self, src: &str) -> bool {
        let src = src.to_lowercase();
        self.expected_image_srcs
            .iter()
            .any(|expected| src.contains(&expected.to_lowercase()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiFixtures {
    pub valid_users: BTreeMap<String, UserFixture>,
    pub invalid_users: BTreeMap<String, UserFixture>,
    pub checkout_information: BTreeMap<String, CheckoutInformation>,
    pub inventory: InventoryFixtures,
    /// User keys the per-user suites are generated for, in order
    pub scenario_users: Vec<String>,
}

impl UiFixtures {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn valid_user(&self, key: &str) -> Result<&UserFixture> {
        self.valid_users.get(key).ok_or_else(|| Error::FixtureNotFound {
            kind: "valid user".to_string(),
            key: key.to_string(),
        })
    }

    pub fn checkout(&self, key: &str) -> Result<&CheckoutInformation> {
        self.checkout_information.get(key).ok_or_else(|| Error::FixtureNotFound {
            kind: "checkout information".to_string(),
            key: key.to_string(),
        })
    }

    /// Entries that should reach checkout step two
    pub fn successful_checkouts(&self) -> impl Iterator<Item = (&String, &CheckoutInformation)> {
        self.checkout_information.iter().filter(|(_, info)| info.should_succeed)
    }

    /// Entries that should be rejected with an error banner
    pub fn failing_checkouts(&self) -> impl Iterator<Item = (&String, &CheckoutInformation)> {
        self.checkout_information
            .iter()
            .filter(|(_, info)| info.expected_error.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFixtures {
    pub new: Booking,
    pub updated: Booking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFixtures {
    pub bookings: BookingFixtures,
    pub partial_update: PartialBooking,
    /// Raw payload the service should refuse
    pub invalid_booking: serde_json::Value,
    pub query_params: BTreeMap<String, BookingQuery>,
}

impl ApiFixtures {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }
}

/// All fixture data for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixtures {
    pub ui: UiFixtures,
    pub api: ApiFixtures,
}

impl Fixtures {
    /// Fixtures compiled into the binary
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            ui: UiFixtures::from_yaml(BUILTIN_UI)?,
            api: ApiFixtures::from_yaml(BUILTIN_API)?,
        })
    }

    /// Load `ui.yaml` and `api.yaml` from a directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let ui = std::fs::read_to_string(dir.join("ui.yaml"))?;
        let api = std::fs::read_to_string(dir.join("api.yaml"))?;
        Ok(Self {
            ui: UiFixtures::from_yaml(&ui)?,
            api: ApiFixtures::from_yaml(&api)?,
        })
    }

    /// Load from `dir` when given, else the built-in set
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::builtin(),
        }
    }
}
