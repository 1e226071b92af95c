use std::time::Instant;

use challenge_common::SortOption;
use tracing::info;

use crate::error::{ensure, ensure_eq, E2eResult};
use crate::helpers::is_sorted;
use crate::page::Expectation;
use crate::runner::{slug, Scenario, ScenarioContext, Suite};
use crate::scenarios::log_in;

pub fn inventory_suite(user: &str) -> Suite {
    let login_key = user.to_string();
    let mut suite = Suite::ui(format!("inventory ({})", user))
        .tag("inventory")
        .tag(user)
        .before_each(move |ctx| log_in(ctx, login_key.clone()))
        .scenario(Scenario::new("lists every item with image, name, price and button", items_are_complete))
        .scenario(Scenario::new("adding then removing every item hides the badge", add_and_remove_all))
        .scenario(Scenario::new("every item opens its detail page", items_open_details));

    for option in SortOption::ALL {
        suite = suite.scenario(Scenario::new(format!("sorting by {} orders the listing", option), move |ctx| {
            listing_is_sorted(ctx, option)
        }));
    }

    let screenshot_user = user.to_string();
    suite
        .scenario(Scenario::new("badge survives back navigation and reload", badge_survives_navigation))
        .scenario(Scenario::new("inventory loads in time", loads_in_time))
        .scenario(Scenario::new("full page screenshot", move |ctx| {
            full_page_screenshot(ctx, screenshot_user.clone())
        }))
}

async fn items_are_complete(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let inventory = &ctx.storefront.inventory;
    let selectors = inventory.selectors();
    let expected = &ctx.fixtures.ui.inventory;

    page.expect_count(&inventory.items(), expected.expected_item_count)
        .await?;

    for index in 0..expected.expected_item_count {
        let item = inventory.item(index);
        page.expect_visible(&item.locator(&selectors.item_image)).await?;
        page.expect_visible(&item.locator(&selectors.item_name)).await?;
        page.expect_visible(&item.locator(&selectors.item_price)).await?;
        page.expect_visible(&item.locator(&selectors.inventory_button))
            .await?;
    }

    for (index, src) in inventory.get_image_sources(page).await?.iter().enumerate() {
        ensure(expected.image_src_allowed(src), || {
            format!("item {} shows unexpected image {}", index, src)
        })?;
    }
    Ok(())
}

async fn add_and_remove_all(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let cart = &ctx.storefront.cart;

    let added = cart.add_all_items_to_cart(page).await?;
    ensure_eq(&cart.badge_count(page).await?, &added, "badge after adding all")?;

    let removed = cart.remove_all_items_from_cart(page).await?;
    ensure_eq(&removed, &added, "items removed")?;
    page.expect_hidden(&cart.badge()).await
}

async fn items_open_details(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let inventory = &ctx.storefront.inventory;
    let paths = ctx.storefront.paths();
    let count = page.count(&inventory.items()).await?;

    for index in 0..count {
        let name = inventory.get_inventory_item_name_at_index(page, index).await?;
        inventory
            .click_inventory_item(page, &inventory.item(index))
            .await?;
        page.expect(&Expectation::url_matching(&paths.item_detail_pattern))
            .await?;
        page.expect_text(&inventory.details_name(), &name).await?;
        inventory.back_to_products(page).await?;
    }
    Ok(())
}

async fn listing_is_sorted(ctx: ScenarioContext, option: SortOption) -> E2eResult<()> {
    let page = ctx.page()?;
    let inventory = &ctx.storefront.inventory;

    inventory.select_sort_option(page, option).await?;
    let names = inventory.get_item_names(page).await?;
    let prices = inventory.get_item_prices(page).await?;

    ensure_eq(&names.len(), &ctx.fixtures.ui.inventory.expected_item_count, "listed items")?;
    ensure(is_sorted(option, &names, &prices), || {
        if option.sorts_by_price() {
            format!("prices not sorted by {}: {:?}", option, prices)
        } else {
            format!("names not sorted by {}: {:?}", option, names)
        }
    })
}

async fn badge_survives_navigation(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let cart = &ctx.storefront.cart;

    cart.add_first_item_to_cart(page).await?;
    cart.go_to_cart(page).await?;
    page.go_back().await?;
    page.expect_url(&ctx.storefront.paths().inventory).await?;
    ensure_eq(&cart.badge_count(page).await?, &1, "badge after going back")?;

    page.reload().await?;
    ensure_eq(&cart.badge_count(page).await?, &1, "badge after reload")?;

    cart.clear_cart(page).await
}

async fn loads_in_time(ctx: ScenarioContext) -> E2eResult<()> {
    let page = ctx.page()?;
    let inventory = &ctx.storefront.inventory;
    let budget_ms = ctx.fixtures.ui.inventory.max_load_time_ms;

    let start = Instant::now();
    inventory.open(page).await?;
    page.wait_for(&inventory.items().first(), budget_ms).await?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    info!("Inventory loaded in {} ms", elapsed_ms);
    ensure(elapsed_ms <= budget_ms, || {
        format!("inventory took {} ms, limit is {} ms", elapsed_ms, budget_ms)
    })
}

async fn full_page_screenshot(ctx: ScenarioContext, user: String) -> E2eResult<()> {
    let page = ctx.page()?;
    let path = ctx
        .config
        .screenshots_dir()
        .join(format!("inventory-{}.png", slug(&user)));

    page.screenshot(&path, true).await?;
    ensure(path.exists(), || format!("no screenshot at {}", path.display()))
}
