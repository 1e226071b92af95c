use std::cmp::Ordering;

use challenge_common::SortOption;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::page::{Locator, Page};
use crate::selectors::{InventorySelectors, PagePaths};

/// What clicking an inventory item actually clicks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTarget {
    /// First anchor inside the item
    Link(Locator),
    /// The item's name, for variants rendered without an anchor
    Text(Locator),
}

impl ItemTarget {
    pub fn locator(&self) -> &Locator {
        match self {
            ItemTarget::Link(locator) | ItemTarget::Text(locator) => locator,
        }
    }
}

/// Inventory listing and item detail pages
#[derive(Debug, Clone, Default)]
pub struct InventoryHelper {
    selectors: InventorySelectors,
    paths: PagePaths,
}

impl InventoryHelper {
    pub fn new(selectors: InventorySelectors, paths: PagePaths) -> Self {
        Self { selectors, paths }
    }

    pub fn selectors(&self) -> &InventorySelectors {
        &self.selectors
    }

    pub fn items(&self) -> Locator {
        Locator::new(&self.selectors.items)
    }

    pub fn item(&self, index: usize) -> Locator {
        self.items().nth(index)
    }

    pub fn details_name(&self) -> Locator {
        Locator::new(&self.selectors.details_name)
    }

    /// Navigate to the inventory page
    pub async fn open(&self, page: &dyn Page) -> E2eResult<()> {
        page.goto(&self.paths.inventory).await
    }

    /// Trimmed name of the `index`th item; an item without a name is an error
    pub async fn get_inventory_item_name_at_index(&self, page: &dyn Page, index: usize) -> E2eResult<String> {
        let name = self.item(index).locator(&self.selectors.item_name);
        match page.text_content(&name).await? {
            Some(text) => Ok(text.trim().to_string()),
            None => Err(E2eError::StepFailed {
                step: format!("read name of item {}", index),
                reason: format!("{} has no text", name),
            }),
        }
    }

    /// Decide how `item` is clicked: through its first anchor when it has
    /// one, through its name otherwise
    pub async fn resolve_target(&self, page: &dyn Page, item: &Locator) -> E2eResult<ItemTarget> {
        let link = item.locator(&self.selectors.item_link).first();
        if page.count(&link).await? > 0 {
            Ok(ItemTarget::Link(link))
        } else {
            Ok(ItemTarget::Text(item.locator(&self.selectors.item_name)))
        }
    }

    /// Open the detail page of `item`, returning the target that was clicked
    pub async fn click_inventory_item(&self, page: &dyn Page, item: &Locator) -> E2eResult<ItemTarget> {
        let target = self.resolve_target(page, item).await?;
        debug!("Clicking {:?}", target);
        page.click(target.locator()).await?;
        Ok(target)
    }

    pub async fn back_to_products(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.selectors.back_button)).await?;
        page.expect_url(&self.paths.inventory).await
    }

    /// Names of all items in display order, trimmed
    pub async fn get_item_names(&self, page: &dyn Page) -> E2eResult<Vec<String>> {
        let names = page
            .all_text_contents(&Locator::new(&self.selectors.item_name))
            .await?;
        Ok(names.iter().map(|name| name.trim().to_string()).collect())
    }

    /// Prices of all items in display order
    pub async fn get_item_prices(&self, page: &dyn Page) -> E2eResult<Vec<f64>> {
        page.all_text_contents(&Locator::new(&self.selectors.item_price))
            .await?
            .iter()
            .map(|text| parse_price(text))
            .collect()
    }

    /// `src` of every item image, in display order
    pub async fn get_image_sources(&self, page: &dyn Page) -> E2eResult<Vec<String>> {
        let items = self.items();
        let count = page.count(&items).await?;
        let mut sources = Vec::with_capacity(count);
        for index in 0..count {
            let image = items.nth(index).locator(&self.selectors.item_image);
            let src = page.get_attribute(&image, "src").await?.ok_or_else(|| E2eError::StepFailed {
                step: format!("read image of item {}", index),
                reason: "image has no src".to_string(),
            })?;
            sources.push(src);
        }
        Ok(sources)
    }

    pub async fn select_sort_option(&self, page: &dyn Page, option: SortOption) -> E2eResult<()> {
        debug!("Sorting inventory by {}", option);
        page.select_option(&Locator::new(&self.selectors.sort_dropdown), option.as_value())
            .await
    }
}

/// `"$29.99"` -> `29.99`
pub fn parse_price(text: &str) -> E2eResult<f64> {
    let trimmed = text.trim();
    trimmed
        .trim_start_matches('$')
        .trim()
        .parse::<f64>()
        .map_err(|e| E2eError::Parse {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })
}

/// Whether the displayed sequence is ordered the way `option` promises.
/// Name options look at `names`, price options at `prices`.
pub fn is_sorted(option: SortOption, names: &[String], prices: &[f64]) -> bool {
    match option {
        SortOption::Alphabetical => names.windows(2).all(|w| w[0] <= w[1]),
        SortOption::ReverseAlphabetical => names.windows(2).all(|w| w[0] >= w[1]),
        SortOption::PriceLowToHigh => prices
            .windows(2)
            .all(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Greater)),
        SortOption::PriceHighToLow => prices
            .windows(2)
            .all(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;
    use test_case::test_case;

    #[test_case("$29.99", 29.99)]
    #[test_case(" $7.99 ", 7.99)]
    #[test_case("15.99", 15.99)]
    fn test_parse_price(text: &str, expected: f64) {
        assert_eq!(parse_price(text).unwrap(), expected);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(matches!(parse_price("$abc"), Err(E2eError::Parse { .. })));
        assert!(parse_price("").is_err());
    }

    #[test]
    fn test_is_sorted() {
        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let prices = [1.0, 2.5, 2.5];
        assert!(is_sorted(SortOption::Alphabetical, &names, &prices));
        assert!(!is_sorted(SortOption::ReverseAlphabetical, &names, &prices));
        assert!(is_sorted(SortOption::PriceLowToHigh, &names, &prices));
        assert!(!is_sorted(SortOption::PriceHighToLow, &names, &prices));
        assert!(is_sorted(SortOption::PriceHighToLow, &names, &[]));
    }

    #[test_case(SortOption::Alphabetical)]
    #[test_case(SortOption::ReverseAlphabetical)]
    #[test_case(SortOption::PriceLowToHigh)]
    #[test_case(SortOption::PriceHighToLow)]
    #[tokio::test]
    async fn test_sorting_produces_ordered_listing(option: SortOption) {
        let page = FakePage::logged_in();
        let helper = InventoryHelper::default();

        helper.select_sort_option(&page, option).await.unwrap();
        let names = helper.get_item_names(&page).await.unwrap();
        let prices = helper.get_item_prices(&page).await.unwrap();

        assert_eq!(names.len(), 6);
        assert!(is_sorted(option, &names, &prices), "{:?} {:?}", names, prices);
    }

    #[tokio::test]
    async fn test_name_at_index_is_trimmed() {
        let page = FakePage::logged_in();
        let helper = InventoryHelper::default();

        assert_eq!(
            helper.get_inventory_item_name_at_index(&page, 5).await.unwrap(),
            "Test.allTheThings() T-Shirt (Red)"
        );
        assert!(helper.get_inventory_item_name_at_index(&page, 6).await.is_err());
    }

    #[tokio::test]
    async fn test_click_item_prefers_link() {
        let page = FakePage::logged_in();
        let helper = InventoryHelper::default();

        let target = helper.click_inventory_item(&page, &helper.item(0)).await.unwrap();

        assert!(matches!(target, ItemTarget::Link(_)));
        assert_eq!(page.path(), "/inventory-item.html?id=4");
        page.expect_text(&helper.details_name(), "Sauce Labs Backpack")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_click_item_without_link_uses_name() {
        let page = FakePage::logged_in().without_links(&[1]);
        let helper = InventoryHelper::default();

        let target = helper.click_inventory_item(&page, &helper.item(1)).await.unwrap();

        assert_eq!(
            target,
            ItemTarget::Text(helper.item(1).locator(".inventory_item_name"))
        );
        assert_eq!(page.path(), "/inventory-item.html?id=0");

        helper.back_to_products(&page).await.unwrap();
    }

    #[tokio::test]
    async fn test_image_sources() {
        let page = FakePage::logged_in();
        let helper = InventoryHelper::default();

        let sources = helper.get_image_sources(&page).await.unwrap();
        assert_eq!(sources.len(), 6);
        assert!(sources[0].contains("sauce-backpack"));
    }
}
