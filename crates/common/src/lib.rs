//! Storefront checks common library
//!
//! Configuration, fixture data and the booking/credential types shared by
//! the UI helpers, the booking API client and the scenario suites.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, AuthScheme, BrowserKind, RunnerConfig, SuiteConfig, UiConfig};
pub use error::{Error, Result};
pub use fixtures::{ApiFixtures, BookingFixtures, CheckoutInformation, Fixtures, InventoryFixtures, UiFixtures, UserFixture};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
