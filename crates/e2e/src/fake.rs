//! In-memory storefront behind the [`Page`] trait, for unit tests
//!
//! Models the parts of the demo storefront the helpers touch: login rules,
//! the six products, sorting, cart, checkout validation and navigation
//! history. Locators are resolved against the default selector registry.
//! Actions are strict like the real engine (no match is a timeout, several
//! matches is an error) but expectations are evaluated once, without waiting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use challenge_common::SortOption;
use parking_lot::Mutex;

use crate::error::{E2eError, E2eResult};
use crate::helpers::ORDER_COMPLETE_TEXT;
use crate::page::{Assertion, Expectation, Locator, Page, TextMatch};
use crate::runner::PageLauncher;
use crate::selectors::StorefrontSelectors;

pub const BASE_URL: &str = "https://www.saucedemo.com";

const PASSWORD: &str = "secret_sauce";
const LOCKED_OUT_USER: &str = "locked_out_user";
const USERS: [&str; 5] = [
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

struct Product {
    id: u32,
    name: &'static str,
    price: f64,
    image: &'static str,
}

const PRODUCTS: [Product; 6] = [
    Product { id: 4, name: "Sauce Labs Backpack", price: 29.99, image: "sauce-backpack-1200x1500" },
    Product { id: 0, name: "Sauce Labs Bike Light", price: 9.99, image: "bike-light-1200x1500" },
    Product { id: 1, name: "Sauce Labs Bolt T-Shirt", price: 15.99, image: "bolt-shirt-1200x1500" },
    Product { id: 5, name: "Sauce Labs Fleece Jacket", price: 49.99, image: "sauce-pullover-1200x1500" },
    Product { id: 2, name: "Sauce Labs Onesie", price: 7.99, image: "red-onesie-1200x1500" },
    Product { id: 3, name: "Test.allTheThings() T-Shirt (Red)", price: 15.99, image: "red-tatt-1200x1500" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
}

/// Resolved element; `usize` payloads are product indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Document,
    Input(Field),
    LoginButton,
    ErrorBanner,
    ErrorButton,
    ErrorIcon(usize),
    Item(usize),
    ItemName(usize),
    ItemPrice(usize),
    ItemImage(usize),
    ItemLink(usize),
    AddButton(usize),
    RemoveButton(usize),
    SortDropdown,
    DetailsName,
    BackButton,
    CartBadge,
    CartLink,
    CartRow(usize),
    CheckoutButton,
    ContinueShopping,
    Continue,
    Finish,
    Cancel,
    CompleteHeader,
    BackHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Inventory,
    Detail,
    Cart,
    StepOne,
    StepTwo,
    Complete,
    Other,
}

#[derive(Debug, Default)]
struct State {
    path: String,
    history: Vec<String>,
    user: Option<String>,
    values: HashMap<Field, String>,
    focus: Option<Element>,
    error: Option<String>,
    order: Vec<usize>,
    cart: Vec<usize>,
    no_link: Vec<usize>,
    actions: Vec<String>,
    closed: bool,
}

pub struct FakePage {
    selectors: StorefrontSelectors,
    state: Mutex<State>,
}

impl FakePage {
    /// Fresh session on the login page
    pub fn new() -> Self {
        Self {
            selectors: StorefrontSelectors::default(),
            state: Mutex::new(State {
                path: "/".to_string(),
                order: (0..PRODUCTS.len()).collect(),
                ..Default::default()
            }),
        }
    }

    /// Session already logged in as `standard_user`, on the inventory page
    pub fn logged_in() -> Self {
        let page = Self::new();
        {
            let mut state = page.state.lock();
            state.user = Some(USERS[0].to_string());
            state.path = page.selectors.paths.inventory.clone();
        }
        page
    }

    /// Render the given products without anchors
    pub fn without_links(self, products: &[usize]) -> Self {
        self.state.lock().no_link = products.to_vec();
        self
    }

    pub fn add_to_cart(&self, product: usize) {
        self.state.lock().cart.push(product);
    }

    /// Path of the current page, relative to the base URL
    pub fn path(&self) -> String {
        self.state.lock().path.clone()
    }

    /// Every mutating action in call order, as `"<verb> <target>"`
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    pub fn cart_names(&self) -> Vec<&'static str> {
        self.state.lock().cart.iter().map(|&p| PRODUCTS[p].name).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn screen(&self, path: &str) -> Screen {
        let paths = &self.selectors.paths;
        if path == paths.login {
            Screen::Login
        } else if path == paths.inventory {
            Screen::Inventory
        } else if path.starts_with("/inventory-item.html") {
            Screen::Detail
        } else if path == paths.cart {
            Screen::Cart
        } else if path == paths.checkout_step_one {
            Screen::StepOne
        } else if path == paths.checkout_step_two {
            Screen::StepTwo
        } else if path == paths.checkout_complete {
            Screen::Complete
        } else {
            Screen::Other
        }
    }

    fn children(&self, state: &State, scope: Element, selector: &str) -> Vec<Element> {
        let s = &self.selectors;
        let is = |candidate: &str| selector == candidate;

        match scope {
            Element::Document => {
                let screen = self.screen(&state.path);
                if screen != Screen::Login {
                    if is(&s.cart.badge) {
                        return if state.cart.is_empty() { vec![] } else { vec![Element::CartBadge] };
                    }
                    if is(&s.cart.link) {
                        return vec![Element::CartLink];
                    }
                }
                match screen {
                    Screen::Login => {
                        let error = state.error.is_some();
                        if is(&s.login.username_input) || is(&s.login.username_field) {
                            vec![Element::Input(Field::Username)]
                        } else if is(&s.login.password_input) || is(&s.login.password_field) {
                            vec![Element::Input(Field::Password)]
                        } else if is(&s.login.login_button) {
                            vec![Element::LoginButton]
                        } else if error && (is(&s.login.error_message) || is(&s.login.error_container)) {
                            vec![Element::ErrorBanner]
                        } else if error && is(&s.login.error_button) {
                            vec![Element::ErrorButton]
                        } else if error && is(&s.login.error_icon) {
                            vec![Element::ErrorIcon(0), Element::ErrorIcon(1)]
                        } else {
                            vec![]
                        }
                    }
                    Screen::Inventory => {
                        let listed = |f: fn(usize) -> Element| -> Vec<Element> { state.order.iter().map(|&p| f(p)).collect() };
                        if is(&s.inventory.items) {
                            listed(Element::Item)
                        } else if is(&s.inventory.item_name) {
                            listed(Element::ItemName)
                        } else if is(&s.inventory.item_price) {
                            listed(Element::ItemPrice)
                        } else if is(&s.inventory.item_image) {
                            listed(Element::ItemImage)
                        } else if is(&s.inventory.sort_dropdown) {
                            vec![Element::SortDropdown]
                        } else {
                            state
                                .order
                                .iter()
                                .filter_map(|&p| self.item_button(state, p, selector))
                                .collect()
                        }
                    }
                    Screen::Detail if is(&s.inventory.details_name) => vec![Element::DetailsName],
                    Screen::Detail if is(&s.inventory.back_button) => vec![Element::BackButton],
                    Screen::Cart => {
                        if is(&s.cart.item) {
                            state.cart.iter().map(|&p| Element::CartRow(p)).collect()
                        } else if is(&s.cart.item_name) {
                            state.cart.iter().map(|&p| Element::ItemName(p)).collect()
                        } else if is(&s.cart.remove_button) || is(&s.cart.cart_remove_button) {
                            state.cart.iter().map(|&p| Element::RemoveButton(p)).collect()
                        } else if is(&s.cart.checkout_button) {
                            vec![Element::CheckoutButton]
                        } else if is(&s.cart.continue_shopping_button) {
                            vec![Element::ContinueShopping]
                        } else {
                            vec![]
                        }
                    }
                    Screen::StepOne => {
                        if is(&s.checkout.first_name_input) {
                            vec![Element::Input(Field::FirstName)]
                        } else if is(&s.checkout.last_name_input) {
                            vec![Element::Input(Field::LastName)]
                        } else if is(&s.checkout.postal_code_input) {
                            vec![Element::Input(Field::PostalCode)]
                        } else if is(&s.checkout.continue_button) {
                            vec![Element::Continue]
                        } else if is(&s.checkout.cancel_button) {
                            vec![Element::Cancel]
                        } else if state.error.is_some() && is(&s.checkout.error_message) {
                            vec![Element::ErrorBanner]
                        } else {
                            vec![]
                        }
                    }
                    Screen::StepTwo => {
                        if is(&s.checkout.summary_item) {
                            state.cart.iter().map(|&p| Element::CartRow(p)).collect()
                        } else if is(&s.checkout.finish_button) {
                            vec![Element::Finish]
                        } else if is(&s.checkout.cancel_button) {
                            vec![Element::Cancel]
                        } else {
                            vec![]
                        }
                    }
                    Screen::Complete if is(&s.checkout.complete_header) => vec![Element::CompleteHeader],
                    Screen::Complete if is(&s.checkout.back_home_button) => vec![Element::BackHome],
                    _ => vec![],
                }
            }
            Element::Item(p) => {
                if is(&s.inventory.item_name) {
                    vec![Element::ItemName(p)]
                } else if is(&s.inventory.item_price) {
                    vec![Element::ItemPrice(p)]
                } else if is(&s.inventory.item_image) {
                    vec![Element::ItemImage(p)]
                } else if is(&s.inventory.item_link) {
                    if state.no_link.contains(&p) {
                        vec![]
                    } else {
                        // image anchor and title anchor
                        vec![Element::ItemLink(p), Element::ItemLink(p)]
                    }
                } else {
                    self.item_button(state, p, selector).into_iter().collect()
                }
            }
            Element::CartRow(p) => {
                if is(&s.cart.item_name) {
                    vec![Element::ItemName(p)]
                } else if is(&s.cart.item_price) {
                    vec![Element::ItemPrice(p)]
                } else if is(&s.cart.remove_button) || is(&s.cart.cart_remove_button) {
                    vec![Element::RemoveButton(p)]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }

    /// The add/remove toggle of product `p`, if `selector` matches its current state
    fn item_button(&self, state: &State, p: usize, selector: &str) -> Option<Element> {
        let s = &self.selectors.inventory;
        let in_cart = state.cart.contains(&p);
        if selector == s.inventory_button {
            Some(if in_cart { Element::RemoveButton(p) } else { Element::AddButton(p) })
        } else if selector == s.add_to_cart_button && !in_cart {
            Some(Element::AddButton(p))
        } else if selector == s.remove_button && in_cart {
            Some(Element::RemoveButton(p))
        } else {
            None
        }
    }

    fn resolve(&self, state: &State, locator: &Locator) -> Vec<Element> {
        let mut scope = vec![Element::Document];
        for segment in locator.segments() {
            let mut next: Vec<Element> = scope
                .iter()
                .flat_map(|&element| self.children(state, element, &segment.selector))
                .collect();
            if let Some(nth) = segment.nth {
                next = next.get(nth).copied().into_iter().collect();
            }
            scope = next;
        }
        scope
    }

    fn single(&self, state: &State, locator: &Locator) -> E2eResult<Element> {
        let found = self.resolve(state, locator);
        match found.as_slice() {
            [] => Err(E2eError::Timeout(format!("locator {}", locator))),
            [element] => Ok(*element),
            _ => Err(E2eError::Playwright(format!(
                "strict mode violation: {} resolved to {} elements",
                locator,
                found.len()
            ))),
        }
    }

    fn text(&self, state: &State, element: Element) -> String {
        match element {
            Element::ItemName(p) => PRODUCTS[p].name.to_string(),
            Element::ItemPrice(p) => format!("${:.2}", PRODUCTS[p].price),
            Element::CartBadge => state.cart.len().to_string(),
            Element::ErrorBanner => state.error.clone().unwrap_or_default(),
            Element::DetailsName => detail_product(&state.path)
                .map(|p| PRODUCTS[p].name.to_string())
                .unwrap_or_default(),
            Element::CompleteHeader => ORDER_COMPLETE_TEXT.to_string(),
            Element::LoginButton => "Login".to_string(),
            Element::AddButton(_) => "Add to cart".to_string(),
            Element::RemoveButton(_) => "Remove".to_string(),
            _ => String::new(),
        }
    }

    fn attribute(&self, state: &State, element: Element, name: &str) -> Option<String> {
        match (element, name) {
            (Element::ItemImage(p), "src") => Some(format!("/static/media/{}.jpg", PRODUCTS[p].image)),
            (Element::Input(Field::Username | Field::Password), "class") => Some(
                if state.error.is_some() { "input_error form_input" } else { "form_input" }.to_string(),
            ),
            (Element::Input(field), "value") => Some(value_of(state, field)),
            _ => None,
        }
    }

    fn navigate(&self, state: &mut State, path: &str) {
        let protected = !matches!(self.screen(path), Screen::Login | Screen::Other);
        let previous = std::mem::replace(&mut state.path, path.to_string());
        state.history.push(previous);
        state.error = None;
        state.focus = None;

        if protected && state.user.is_none() {
            state.path = self.selectors.paths.login.clone();
            state.error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                path
            ));
        }
    }

    fn submit_login(&self, state: &mut State) {
        let username = value_of(state, Field::Username);
        let password = value_of(state, Field::Password);

        let error = if username.is_empty() {
            "Epic sadface: Username is required"
        } else if password.is_empty() {
            "Epic sadface: Password is required"
        } else if username == LOCKED_OUT_USER && password == PASSWORD {
            "Epic sadface: Sorry, this user has been locked out."
        } else if USERS.contains(&username.as_str()) && password == PASSWORD {
            state.user = Some(username);
            let inventory = self.selectors.paths.inventory.clone();
            self.navigate(state, &inventory);
            return;
        } else {
            "Epic sadface: Username and password do not match any user in this service"
        };
        state.error = Some(error.to_string());
    }

    fn submit_checkout_information(&self, state: &mut State) {
        let missing = [
            (Field::FirstName, "First Name"),
            (Field::LastName, "Last Name"),
            (Field::PostalCode, "Postal Code"),
        ]
        .into_iter()
        .find(|(field, _)| value_of(state, *field).is_empty());

        match missing {
            Some((_, label)) => state.error = Some(format!("Error: {} is required", label)),
            None => {
                let next = self.selectors.paths.checkout_step_two.clone();
                self.navigate(state, &next);
            }
        }
    }

    fn activate(&self, state: &mut State, element: Element) {
        let paths = self.selectors.paths.clone();
        match element {
            Element::LoginButton => self.submit_login(state),
            Element::ErrorButton => state.error = None,
            Element::AddButton(p) => state.cart.push(p),
            Element::RemoveButton(p) => state.cart.retain(|&q| q != p),
            Element::ItemLink(p) | Element::ItemName(p) => {
                self.navigate(state, &format!("/inventory-item.html?id={}", PRODUCTS[p].id))
            }
            Element::BackButton | Element::ContinueShopping | Element::BackHome => {
                self.navigate(state, &paths.inventory)
            }
            Element::CartLink => self.navigate(state, &paths.cart),
            Element::CheckoutButton => self.navigate(state, &paths.checkout_step_one),
            Element::Continue => self.submit_checkout_information(state),
            Element::Finish => {
                state.cart.clear();
                self.navigate(state, &paths.checkout_complete);
            }
            Element::Cancel => {
                if self.screen(&state.path) == Screen::StepOne {
                    self.navigate(state, &paths.cart)
                } else {
                    self.navigate(state, &paths.inventory)
                }
            }
            _ => {}
        }
    }

    fn evaluate(&self, state: &State, expectation: &Expectation) -> E2eResult<bool> {
        let found = match &expectation.target {
            Some(target) => self.resolve(state, target),
            None => vec![],
        };
        let only = if found.len() == 1 { Some(found[0]) } else { None };

        Ok(match &expectation.assertion {
            Assertion::Url { pattern } => match pattern {
                TextMatch::Exact { value } => state.path == *value || full_url(&state.path) == *value,
                TextMatch::Regex { .. } => pattern.matches(&full_url(&state.path))?,
            },
            Assertion::Visible => !found.is_empty(),
            Assertion::Hidden => found.is_empty(),
            Assertion::Text { expected } => only.is_some_and(|e| self.text(state, e).trim() == expected),
            Assertion::ContainsText { expected } => {
                only.is_some_and(|e| self.text(state, e).contains(expected.as_str()))
            }
            Assertion::Count { expected } => found.len() == *expected,
            Assertion::Class { pattern } => match only.and_then(|e| self.attribute(state, e, "class")) {
                Some(class) => pattern.matches(&class)?,
                None => false,
            },
            Assertion::Value { expected } => {
                only.and_then(|e| self.attribute(state, e, "value")).as_deref() == Some(expected.as_str())
            }
            Assertion::Disabled => false,
        })
    }
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

fn value_of(state: &State, field: Field) -> String {
    state.values.get(&field).cloned().unwrap_or_default()
}

fn full_url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

fn detail_product(path: &str) -> Option<usize> {
    let id: u32 = path.split("id=").nth(1)?.parse().ok()?;
    PRODUCTS.iter().position(|p| p.id == id)
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.actions.push(format!("goto {}", url));
        let path = url.strip_prefix(BASE_URL).unwrap_or(url);
        self.navigate(&mut state, path);
        Ok(())
    }

    async fn go_back(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        if let Some(previous) = state.history.pop() {
            state.path = previous;
            state.error = None;
        }
        Ok(())
    }

    async fn reload(&self) -> E2eResult<()> {
        self.state.lock().error = None;
        Ok(())
    }

    async fn url(&self) -> E2eResult<String> {
        Ok(full_url(&self.state.lock().path))
    }

    async fn click(&self, target: &Locator) -> E2eResult<()> {
        let mut state = self.state.lock();
        let element = self.single(&state, target)?;
        state.actions.push(format!("click {}", target));
        self.activate(&mut state, element);
        Ok(())
    }

    async fn fill(&self, target: &Locator, value: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        match self.single(&state, target)? {
            Element::Input(field) => {
                state.actions.push(format!("fill {}", target));
                state.values.insert(field, value.to_string());
                Ok(())
            }
            other => Err(E2eError::Playwright(format!("{:?} is not an input", other))),
        }
    }

    async fn select_option(&self, target: &Locator, value: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        if self.single(&state, target)? != Element::SortDropdown {
            return Err(E2eError::Playwright(format!("{} is not a <select>", target)));
        }
        let option: SortOption = value
            .parse()
            .map_err(|_| E2eError::Playwright(format!("no option {:?}", value)))?;
        state.actions.push(format!("select {} {}", target, value));

        let mut order: Vec<usize> = (0..PRODUCTS.len()).collect();
        match option {
            SortOption::Alphabetical => order.sort_by_key(|&p| PRODUCTS[p].name),
            SortOption::ReverseAlphabetical => order.sort_by(|&a, &b| PRODUCTS[b].name.cmp(PRODUCTS[a].name)),
            SortOption::PriceLowToHigh => order.sort_by(|&a, &b| PRODUCTS[a].price.total_cmp(&PRODUCTS[b].price)),
            SortOption::PriceHighToLow => order.sort_by(|&a, &b| PRODUCTS[b].price.total_cmp(&PRODUCTS[a].price)),
        }
        state.order = order;
        Ok(())
    }

    async fn press(&self, key: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.actions.push(format!("press {}", key));
        if self.screen(&state.path) != Screen::Login {
            return Ok(());
        }
        match key {
            "Tab" => {
                let focus = state.focus;
                state.focus = Some(match focus {
                    None | Some(Element::LoginButton) => Element::Input(Field::Username),
                    Some(Element::Input(Field::Username)) => Element::Input(Field::Password),
                    Some(_) => Element::LoginButton,
                });
            }
            "Enter" => {
                if state.focus.is_some() {
                    self.submit_login(&mut state);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        let focus = state.focus;
        match focus {
            Some(Element::Input(field)) => {
                state.actions.push(format!("type {}", text));
                state.values.entry(field).or_default().push_str(text);
                Ok(())
            }
            _ => Err(E2eError::Playwright("no focused input".to_string())),
        }
    }

    async fn count(&self, target: &Locator) -> E2eResult<usize> {
        let state = self.state.lock();
        Ok(self.resolve(&state, target).len())
    }

    async fn is_visible(&self, target: &Locator) -> E2eResult<bool> {
        let state = self.state.lock();
        Ok(!self.resolve(&state, target).is_empty())
    }

    async fn text_content(&self, target: &Locator) -> E2eResult<Option<String>> {
        let state = self.state.lock();
        let element = self.single(&state, target)?;
        Ok(Some(self.text(&state, element)))
    }

    async fn all_text_contents(&self, target: &Locator) -> E2eResult<Vec<String>> {
        let state = self.state.lock();
        Ok(self
            .resolve(&state, target)
            .into_iter()
            .map(|element| self.text(&state, element))
            .collect())
    }

    async fn get_attribute(&self, target: &Locator, name: &str) -> E2eResult<Option<String>> {
        let state = self.state.lock();
        let element = self.single(&state, target)?;
        Ok(self.attribute(&state, element, name))
    }

    async fn wait_for(&self, target: &Locator, timeout_ms: u64) -> E2eResult<()> {
        let state = self.state.lock();
        if self.resolve(&state, target).is_empty() {
            return Err(E2eError::Timeout(format!("{} after {} ms", target, timeout_ms)));
        }
        Ok(())
    }

    async fn screenshot(&self, path: &Path, _full_page: bool) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"\x89PNG\r\n\x1a\n")?;
        Ok(())
    }

    async fn expect(&self, expectation: &Expectation) -> E2eResult<()> {
        let state = self.state.lock();
        if self.evaluate(&state, expectation)? != expectation.negate {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!("{} (at {})", expectation, state.path)))
        }
    }

    async fn close(&self, _keep_video: bool) -> E2eResult<Option<PathBuf>> {
        self.state.lock().closed = true;
        Ok(None)
    }
}

/// Hands out a fresh logged-out [`FakePage`] per launch
#[derive(Default)]
pub struct FakeLauncher {
    launched: AtomicUsize,
}

impl FakeLauncher {
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageLauncher for FakeLauncher {
    async fn launch(&self, _video_dir: Option<&Path>) -> E2eResult<Arc<dyn Page>> {
        self.launched.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakePage::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_protected_page_redirects_to_login() {
        let page = FakePage::new();
        page.goto("/inventory.html").await.unwrap();
        assert_eq!(page.path(), "/");
    }

    #[tokio::test]
    async fn test_strict_click_rejects_ambiguous_locator() {
        let page = FakePage::logged_in();
        let err = page.click(&Locator::new(".inventory_item")).await.unwrap_err();
        assert!(matches!(err, E2eError::Playwright(_)));
    }

    #[tokio::test]
    async fn test_go_back_restores_previous_page() {
        let page = FakePage::logged_in();
        page.click(&Locator::new(".shopping_cart_link")).await.unwrap();
        page.go_back().await.unwrap();
        assert_eq!(page.path(), "/inventory.html");
    }
}
