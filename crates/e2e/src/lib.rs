//! Storefront and booking service end-to-end checks
//!
//! This crate drives the demo storefront through Playwright and the demo
//! booking service through `challenge-api`:
//! - Page helpers for login, inventory, cart and checkout
//! - A Playwright bridge process speaking line-delimited JSON
//! - Declarative scenario suites built from fixture tables
//! - A small runner with hooks, one retry and failure artifacts
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Scenario suites (Rust)                    │
//! │    login · inventory · cart · checkout · booking api        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                  │
//! │    ├── before_all: ApiSessions::open()                       │
//! │    ├── per attempt: PageLauncher::launch() -> Page           │
//! │    ├── before_each, scenario body, retry once                │
//! │    └── screenshot + video on failure, JSON/HTML report       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Storefront helpers ──> Page trait ──> PlaywrightPage        │
//! │                                         └── node bridge.js   │
//! │  ApiSession (reqwest) ──> booking service                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod error;
pub mod helpers;
pub mod page;
pub mod playwright;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod selectors;

#[cfg(test)]
mod fake;

pub use error::{E2eError, E2eResult};
pub use helpers::Storefront;
pub use page::{Locator, Page};
pub use playwright::{PlaywrightLauncher, PlaywrightPage};
pub use runner::{Scenario, ScenarioFilter, Suite, TestRunner, TestSuiteResult};
