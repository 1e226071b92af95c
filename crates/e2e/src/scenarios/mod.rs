//! Scenario suites over the storefront helpers and the booking client
//!
//! Table-driven suites are expanded from fixture data when they are built:
//! one scenario per table row, one suite per configured user. Scenario
//! bodies capture only fixture keys and read the data through their
//! [`ScenarioContext`].

mod booking;
mod cart;
mod checkout;
mod inventory;
mod login;

pub use booking::booking_suite;
pub use cart::cart_suite;
pub use checkout::checkout_suite;
pub use inventory::inventory_suite;
pub use login::login_suite;

use challenge_common::Fixtures;

use crate::error::E2eResult;
use crate::runner::{ScenarioContext, Suite};

/// Browser suites: login, then inventory, cart and checkout per user
pub fn ui_suites(fixtures: &Fixtures) -> Vec<Suite> {
    let users = &fixtures.ui.scenario_users;
    let mut suites = vec![login_suite(fixtures)];
    suites.extend(users.iter().map(|user| inventory_suite(user)));
    suites.extend(users.iter().map(|user| cart_suite(user)));
    suites.extend(users.iter().map(|user| checkout_suite(fixtures, user)));
    suites
}

pub fn api_suites(fixtures: &Fixtures) -> Vec<Suite> {
    vec![booking_suite(fixtures)]
}

pub fn all_suites(fixtures: &Fixtures) -> Vec<Suite> {
    let mut suites = ui_suites(fixtures);
    suites.extend(api_suites(fixtures));
    suites
}

/// Open the login page and sign in as the valid user stored under `user`
pub(crate) async fn log_in(ctx: ScenarioContext, user: String) -> E2eResult<()> {
    let page = ctx.page()?;
    let credentials = ctx.fixtures.ui.valid_user(&user)?.credentials();
    let storefront = &ctx.storefront;

    storefront.login.open(page).await?;
    storefront.login.login_as(page, &credentials).await?;
    page.expect_url(&storefront.paths().inventory).await
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use challenge_common::{Fixtures, SuiteConfig};
    use tempfile::TempDir;

    use crate::fake::FakeLauncher;
    use crate::runner::{Suite, TestRunner, TestSuiteResult};

    /// Run `suites` against fresh in-memory storefronts, without retries
    pub async fn run_on_fake(suites: &[Suite]) -> (TestSuiteResult, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SuiteConfig::default();
        config.runner.retries = 0;
        config.runner.output_dir = dir.path().to_path_buf();

        let summary = TestRunner::new(config, Fixtures::builtin().unwrap())
            .with_launcher(Arc::new(FakeLauncher::default()))
            .run_suites(suites)
            .await;
        (summary, dir)
    }

    pub fn failures(summary: &TestSuiteResult) -> Vec<String> {
        summary
            .results
            .iter()
            .filter(|r| !r.success())
            .map(|r| format!("{} > {}: {:?}", r.suite, r.name, r.error))
            .collect()
    }
}
