//! Storefront page helpers
//!
//! Each helper owns the selectors of its page and drives a [`Page`] one
//! action at a time. Helpers never retry and never catch errors; outcomes
//! are left for the calling scenario to assert on.
//!
//! [`Page`]: crate::page::Page

mod cart;
mod checkout;
mod inventory;
mod login;

pub use cart::CartHelper;
pub use checkout::{CheckoutHelper, ORDER_COMPLETE_TEXT};
pub use inventory::{is_sorted, parse_price, InventoryHelper, ItemTarget};
pub use login::LoginHelper;

use crate::selectors::{PagePaths, StorefrontSelectors};

/// All helpers, built from one selector registry
#[derive(Debug, Clone)]
pub struct Storefront {
    pub login: LoginHelper,
    pub cart: CartHelper,
    pub checkout: CheckoutHelper,
    pub inventory: InventoryHelper,
    paths: PagePaths,
}

impl Storefront {
    pub fn new(selectors: StorefrontSelectors) -> Self {
        let StorefrontSelectors {
            paths,
            login,
            inventory,
            cart,
            checkout,
        } = selectors;

        Self {
            login: LoginHelper::new(login, paths.clone()),
            cart: CartHelper::new(cart, inventory.clone(), paths.clone()),
            checkout: CheckoutHelper::new(checkout, paths.clone()),
            inventory: InventoryHelper::new(inventory, paths.clone()),
            paths,
        }
    }

    pub fn paths(&self) -> &PagePaths {
        &self.paths
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(StorefrontSelectors::default())
    }
}
