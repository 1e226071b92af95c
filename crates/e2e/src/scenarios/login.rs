use challenge_common::Fixtures;
use tracing::debug;

use crate::error::{ensure, ensure_eq, E2eResult};
use crate::page::{Assertion, Expectation, TextMatch};
use crate::runner::{Scenario, ScenarioContext, Suite};

const LOCKED_OUT_TEXT: &str = "Sorry, this user has been locked out.";
const MISMATCH_TEXT: &str = "Username and password do not match any user in this service";
const REPEATED_ATTEMPTS: usize = 10;
const OVERFLOW_LENGTH: usize = 1000;
const SQL_INJECTION: &str = "' OR '1'='1'; --";

pub fn login_suite(fixtures: &Fixtures) -> Suite {
    let mut suite = Suite::ui("login")
        .tag("login")
        .before_each(|ctx| async move {
            let page = ctx.page()?;
            ctx.storefront.login.open(page).await
        })
        .scenario(Scenario::new("standard user reaches the inventory", standard_user_logs_in).tag("smoke"))
        .scenario(Scenario::new("locked out user sees the lockout banner", locked_out_user_is_refused).tag("smoke"));

    for key in fixtures.ui.invalid_users.keys() {
        let key = key.clone();
        suite = suite.scenario(Scenario::new(format!("invalid credentials: {}", key), move |ctx| {
            invalid_credentials_are_flagged(ctx, key.clone())
        }));
    }

    suite
        .scenario(Scenario::new("credentials padded with whitespace are rejected", |ctx| async move {
            let user = ctx.fixtures.ui.valid_user("standard_user")?;
            let padded_user = format!("  {}  ", user.username);
            let padded_password = format!(" {} ", user.password);
            expect_rejected(&ctx, &padded_user, &padded_password, MISMATCH_TEXT).await
        }))
        .scenario(Scenario::new("username is case sensitive", |ctx| async move {
            let user = ctx.fixtures.ui.valid_user("standard_user")?;
            expect_rejected(&ctx, &user.username.to_uppercase(), &user.password, MISMATCH_TEXT).await
        }))
        .scenario(Scenario::new("repeated failures keep the same message", repeated_failures_are_consistent))
        .scenario(Scenario::new("overlong username is rejected", |ctx| async move {
            let username = "a".repeat(OVERFLOW_LENGTH);
            expect_rejected(&ctx, &username, "secret_sauce", MISMATCH_TEXT).await
        }))
        .scenario(Scenario::new("SQL injection is rejected", |ctx| async move {
            expect_rejected(&ctx, SQL_INJECTION, SQL_INJECTION, MISMATCH_TEXT).await
        }))
        .scenario(Scenario::new("keyboard-only login", keyboard_only_login))
        .scenario(Scenario::new("inventory requires a session", |ctx| async move {
            let page = ctx.page()?;
            let storefront = &ctx.storefront;
            page.goto(&storefront.paths().inventory).await?;
            page.expect_url(&storefront.paths().login).await?;
            page.expect_contains_text(&storefront.login.error_message(), "You can only access")
                .await
        }))
}

async fn standard_user_logs_in(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let user = ctx.fixtures.ui.valid_user("standard_user")?;

    ctx.storefront.login.login_as(page, &user.credentials()).await?;
    page.expect_url(&ctx.storefront.paths().inventory).await
}

async fn locked_out_user_is_refused(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let login = &ctx.storefront.login;
    let user = ctx.fixtures.ui.valid_user("locked_out_user")?;

    login.login_as(page, &user.credentials()).await?;
    page.expect_contains_text(&login.error_message(), LOCKED_OUT_TEXT)
        .await?;
    page.expect_url(&ctx.storefront.paths().login).await
}

/// Banner text, both error icons, highlighted inputs, then dismissal
async fn invalid_credentials_are_flagged(ctx: ScenarioContext, key: String) -> E2eResult<()> {
    let page = ctx.page()?;
    let login = &ctx.storefront.login;
    let user = ctx
        .fixtures
        .ui
        .invalid_users
        .get(&key)
        .ok_or_else(|| challenge_common::Error::FixtureNotFound {
            kind: "invalid user".to_string(),
            key: key.clone(),
        })?;

    login.login_as(page, &user.credentials()).await?;

    if let Some(expected) = &user.error {
        page.expect_text(&login.error_message(), expected).await?;
    } else {
        page.expect_visible(&login.error_message()).await?;
    }
    page.expect_count(&login.error_icons(), 2).await?;

    let flagged = Assertion::Class {
        pattern: TextMatch::regex("input_error"),
    };
    page.expect(&Expectation::element(&login.username_field(), flagged.clone()))
        .await?;
    page.expect(&Expectation::element(&login.password_field(), flagged))
        .await?;

    login.dismiss_error(page).await?;
    page.expect_hidden(&login.error_message()).await?;
    page.expect_count(&login.error_icons(), 0).await
}

async fn repeated_failures_are_consistent(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let login = &ctx.storefront.login;
    let user = ctx.fixtures.ui.valid_user("standard_user")?;
    let mut first_message: Option<String> = None;

    for attempt in 1..=REPEATED_ATTEMPTS {
        login.login(page, &user.username, "wrong_password").await?;
        page.expect_visible(&login.error_message()).await?;
        let message = page
            .text_content(&login.error_message())
            .await?
            .unwrap_or_default();
        debug!("Attempt {}: {}", attempt, message);

        match &first_message {
            Some(first) => ensure_eq(&message, first, &format!("message on attempt {}", attempt))?,
            None => first_message = Some(message),
        }
    }

    page.expect_url(&ctx.storefront.paths().login).await
}

/// Tab into each input, type, then submit with Enter
async fn keyboard_only_login(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let user = ctx.fixtures.ui.valid_user("standard_user")?;

    page.press("Tab").await?;
    page.type_text(&user.username).await?;
    page.press("Tab").await?;
    page.type_text(&user.password).await?;
    page.press("Enter").await?;

    page.expect_url(&ctx.storefront.paths().inventory).await
}

/// Submit `username`/`password` and expect to stay on the login page with
/// a banner containing `message`
async fn expect_rejected(ctx: &ScenarioContext, username: &str, password: &str, message: &str) -> E2eResult<()> {
    let page = ctx.page()?;
    let login = &ctx.storefront.login;

    login.login(page, username, password).await?;
    page.expect_contains_text(&login.error_message(), message).await?;
    page.expect_url(&ctx.storefront.paths().login).await?;

    let url = page.url().await?;
    ensure(!url.contains(&ctx.storefront.paths().inventory), || {
        format!("login with {:?} should not reach {}", username, url)
    })
}
