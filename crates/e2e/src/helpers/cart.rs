use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::page::{Assertion, Expectation, Locator, Page};
use crate::selectors::{CartSelectors, InventorySelectors, PagePaths};

/// Cart badge, cart page and add/remove controls on the inventory page
#[derive(Debug, Clone, Default)]
pub struct CartHelper {
    cart: CartSelectors,
    inventory: InventorySelectors,
    paths: PagePaths,
}

impl CartHelper {
    pub fn new(cart: CartSelectors, inventory: InventorySelectors, paths: PagePaths) -> Self {
        Self {
            cart,
            inventory,
            paths,
        }
    }

    pub fn selectors(&self) -> &CartSelectors {
        &self.cart
    }

    pub fn badge(&self) -> Locator {
        Locator::new(&self.cart.badge)
    }

    pub fn cart_link(&self) -> Locator {
        Locator::new(&self.cart.link)
    }

    pub fn cart_items(&self) -> Locator {
        Locator::new(&self.cart.item)
    }

    pub fn checkout_button(&self) -> Locator {
        Locator::new(&self.cart.checkout_button)
    }

    fn inventory_items(&self) -> Locator {
        Locator::new(&self.inventory.items)
    }

    pub async fn add_first_item_to_cart(&self, page: &dyn Page) -> E2eResult<()> {
        self.add_item_to_cart(page, 0).await
    }

    /// Click the add control of the `index`th item. Must be on the inventory page.
    pub async fn add_item_to_cart(&self, page: &dyn Page, index: usize) -> E2eResult<()> {
        page.expect_url(&self.paths.inventory).await?;
        let item = self.inventory_items().nth(index);
        debug!("Adding item {} to cart", index);
        page.click(&item.locator(&self.inventory.add_to_cart_button)).await
    }

    /// Add every item that still offers an add control, in display order.
    /// Returns how many were added.
    pub async fn add_all_items_to_cart(&self, page: &dyn Page) -> E2eResult<usize> {
        page.expect_url(&self.paths.inventory).await?;
        let added = self
            .click_in_each_item(page, &self.inventory.add_to_cart_button)
            .await?;
        info!("Added {} item(s) to cart", added);
        Ok(added)
    }

    /// Remove every item in the cart from the inventory page, in display order.
    /// Returns how many were removed.
    pub async fn remove_all_items_from_cart(&self, page: &dyn Page) -> E2eResult<usize> {
        page.expect_url(&self.paths.inventory).await?;
        let removed = self
            .click_in_each_item(page, &self.inventory.remove_button)
            .await?;
        info!("Removed {} item(s) from cart", removed);
        Ok(removed)
    }

    /// Click `control` inside each item container that has one. The container
    /// count is read again before every step.
    async fn click_in_each_item(&self, page: &dyn Page, control: &str) -> E2eResult<usize> {
        let items = self.inventory_items();
        let mut clicked = 0;
        let mut index = 0;

        while index < page.count(&items).await? {
            let button = items.nth(index).locator(control);
            if page.count(&button).await? > 0 {
                page.click(&button.first()).await?;
                clicked += 1;
            }
            index += 1;
        }

        Ok(clicked)
    }

    /// Click the cart link and wait for the cart page
    pub async fn go_to_cart(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&self.cart_link()).await?;
        page.expect_url(&self.paths.cart).await
    }

    pub async fn proceed_to_checkout(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&self.checkout_button()).await?;
        page.expect_url(&self.paths.checkout_step_one).await
    }

    pub async fn continue_shopping(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.cart.continue_shopping_button))
            .await?;
        page.expect_url(&self.paths.inventory).await
    }

    /// Empty the cart and return to the inventory page. No-op when the badge
    /// is not shown.
    ///
    /// The remove controls are counted once to bound the loop, then counted
    /// again before every click; each click targets the first control left.
    pub async fn clear_cart(&self, page: &dyn Page) -> E2eResult<()> {
        let badge = self.badge();
        if !page.is_visible(&badge).await? {
            debug!("Cart already empty");
            return Ok(());
        }

        page.click(&self.cart_link()).await?;
        page.expect_url(&self.paths.cart).await?;

        let remove = Locator::new(&self.cart.remove_button);
        let initial = page.count(&remove).await?;
        let mut removed = 0;
        for _ in 0..initial {
            if page.count(&remove).await? == 0 {
                break;
            }
            page.click(&remove.first()).await?;
            removed += 1;
        }
        debug!("Removed {} of {} cart item(s)", removed, initial);

        page.goto(&self.paths.inventory).await?;
        page.expect(&Expectation::element(&badge, Assertion::Visible).not())
            .await
    }

    /// Number shown on the cart badge, 0 when hidden
    pub async fn badge_count(&self, page: &dyn Page) -> E2eResult<usize> {
        let badge = self.badge();
        if !page.is_visible(&badge).await? {
            return Ok(0);
        }
        let text = page.text_content(&badge).await?.unwrap_or_default();
        let text = text.trim();
        text.parse::<usize>().map_err(|e| E2eError::Parse {
            input: text.to_string(),
            reason: e.to_string(),
        })
    }

    /// Trimmed names of the rows on the cart page
    pub async fn cart_item_names(&self, page: &dyn Page) -> E2eResult<Vec<String>> {
        let names = self.cart_items().locator(&self.cart.item_name);
        let texts = page.all_text_contents(&names).await?;
        Ok(texts.iter().map(|t| t.trim().to_string()).collect())
    }
}
