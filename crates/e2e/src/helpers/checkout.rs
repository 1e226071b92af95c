use tracing::debug;

use crate::error::E2eResult;
use crate::page::{Locator, Page};
use crate::selectors::{CheckoutSelectors, PagePaths};

/// Text of the header on the order complete page
pub const ORDER_COMPLETE_TEXT: &str = "Thank you for your order!";

/// Checkout step one form and the step two / complete page controls
#[derive(Debug, Clone, Default)]
pub struct CheckoutHelper {
    selectors: CheckoutSelectors,
    paths: PagePaths,
}

impl CheckoutHelper {
    pub fn new(selectors: CheckoutSelectors, paths: PagePaths) -> Self {
        Self { selectors, paths }
    }

    pub fn selectors(&self) -> &CheckoutSelectors {
        &self.selectors
    }

    /// Fill first name, last name and postal code, then click continue.
    /// Nothing is validated locally.
    pub async fn populate_checkout_information_and_continue(
        &self,
        page: &dyn Page,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> E2eResult<()> {
        debug!("Checkout information: {:?} {:?} {:?}", first_name, last_name, postal_code);
        page.fill(&self.first_name_input(), first_name).await?;
        page.fill(&Locator::new(&self.selectors.last_name_input), last_name)
            .await?;
        page.fill(&Locator::new(&self.selectors.postal_code_input), postal_code)
            .await?;
        page.click(&Locator::new(&self.selectors.continue_button))
            .await
    }

    /// Click finish on step two and wait for the complete page
    pub async fn finish(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.selectors.finish_button)).await?;
        page.expect_url(&self.paths.checkout_complete).await
    }

    /// Click cancel on either step; where it lands depends on the step
    pub async fn cancel(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.selectors.cancel_button)).await
    }

    /// Click back home on the complete page and wait for the inventory page
    pub async fn back_home(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.selectors.back_home_button))
            .await?;
        page.expect_url(&self.paths.inventory).await
    }

    pub fn first_name_input(&self) -> Locator {
        Locator::new(&self.selectors.first_name_input)
    }

    pub fn error_message(&self) -> Locator {
        Locator::new(&self.selectors.error_message)
    }

    pub fn summary_items(&self) -> Locator {
        Locator::new(&self.selectors.summary_item)
    }

    pub fn complete_header(&self) -> Locator {
        Locator::new(&self.selectors.complete_header)
    }
}
