use challenge_common::{CheckoutInformation, Fixtures};

use crate::error::{E2eError, E2eResult};
use crate::helpers::ORDER_COMPLETE_TEXT;
use crate::page::{Assertion, Expectation};
use crate::runner::{Scenario, ScenarioContext, Suite};
use crate::scenarios::log_in;

pub fn checkout_suite(fixtures: &Fixtures, user: &str) -> Suite {
    let login_key = user.to_string();
    let mut suite = Suite::ui(format!("checkout ({})", user))
        .tag("checkout")
        .tag(user)
        .before_each(move |ctx| {
            let login_key = login_key.clone();
            async move {
                log_in(ctx.clone(), login_key).await?;
                let page = ctx.page()?;
                let cart = &ctx.storefront.cart;
                cart.add_first_item_to_cart(page).await?;
                cart.go_to_cart(page).await?;
                cart.proceed_to_checkout(page).await
            }
        });

    for (key, _) in fixtures.ui.successful_checkouts() {
        let key = key.clone();
        suite = suite.scenario(Scenario::new(format!("order completes with {}", key), move |ctx| {
            order_completes(ctx, key.clone())
        }));
    }
    for (key, _) in fixtures.ui.failing_checkouts() {
        let key = key.clone();
        suite = suite.scenario(Scenario::new(format!("step one rejects {}", key), move |ctx| {
            information_is_rejected(ctx, key.clone())
        }));
    }

    suite
        .scenario(Scenario::new("cancel on step one returns to the cart", |ctx| async move {
            let page = ctx.page()?;
            ctx.storefront.checkout.cancel(page).await?;
            page.expect_url(&ctx.storefront.paths().cart).await
        }))
        .scenario(Scenario::new("cancel on step two returns to the inventory", |ctx| async move {
            let page = ctx.page()?;
            reach_step_two(&ctx).await?;
            ctx.storefront.checkout.cancel(page).await?;
            page.expect_url(&ctx.storefront.paths().inventory).await
        }))
        .scenario(Scenario::new("going back from step two keeps step one input", back_keeps_input))
}

fn checkout_info<'a>(ctx: &'a ScenarioContext, key: &str) -> E2eResult<&'a CheckoutInformation> {
    ctx.fixtures.ui.checkout(key).map_err(E2eError::from)
}

async fn submit(ctx: &ScenarioContext, info: &CheckoutInformation) -> E2eResult<()> {
    let page = ctx.page()?;
    ctx.storefront
        .checkout
        .populate_checkout_information_and_continue(page, &info.first_name, &info.last_name, &info.zip)
        .await
}

async fn reach_step_two(ctx: &ScenarioContext) -> E2eResult<()> {
    submit(ctx, checkout_info(ctx, "valid")?).await?;
    ctx.page()?
        .expect_url(&ctx.storefront.paths().checkout_step_two)
        .await
}

async fn order_completes(ctx: ScenarioContext, key: String) -> E2eResult<()> {
    let page = ctx.page()?;
    let checkout = &ctx.storefront.checkout;

    submit(&ctx, checkout_info(&ctx, &key)?).await?;
    page.expect_url(&ctx.storefront.paths().checkout_step_two)
        .await?;
    page.expect_count(&checkout.summary_items(), 1).await?;

    checkout.finish(page).await?;
    page.expect_text(&checkout.complete_header(), ORDER_COMPLETE_TEXT)
        .await?;
    page.expect_hidden(&ctx.storefront.cart.badge()).await?;

    checkout.back_home(page).await
}

async fn information_is_rejected(ctx: ScenarioContext, key: String) -> E2eResult<()> {
    let page = ctx.page()?;
    let checkout = &ctx.storefront.checkout;
    let info = checkout_info(&ctx, &key)?;

    submit(&ctx, info).await?;
    match &info.expected_error {
        Some(expected) => page.expect_text(&checkout.error_message(), expected).await?,
        None => page.expect_visible(&checkout.error_message()).await?,
    }
    page.expect_url(&ctx.storefront.paths().checkout_step_one).await
}

async fn back_keeps_input(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let valid = checkout_info(&ctx, "valid")?;

    reach_step_two(&ctx).await?;
    page.go_back().await?;
    page.expect_url(&ctx.storefront.paths().checkout_step_one).await?;

    let kept = Assertion::Value {
        expected: valid.first_name.clone(),
    };
    page.expect(&Expectation::element(&ctx.storefront.checkout.first_name_input(), kept))
        .await
}
