//! Selector registry for the demo storefront
//!
//! Plain immutable data. Each helper receives the struct for its page at
//! construction; the `Default` impls describe the demo storefront's markup.

use serde::{Deserialize, Serialize};

/// Fixed page paths, relative to the storefront base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePaths {
    pub login: String,
    pub inventory: String,
    pub cart: String,
    pub checkout_step_one: String,
    pub checkout_step_two: String,
    pub checkout_complete: String,
    /// Regular expression for `/inventory-item.html?id=<n>`
    pub item_detail_pattern: String,
}

impl Default for PagePaths {
    fn default() -> Self {
        Self {
            login: "/".to_string(),
            inventory: "/inventory.html".to_string(),
            cart: "/cart.html".to_string(),
            checkout_step_one: "/checkout-step-one.html".to_string(),
            checkout_step_two: "/checkout-step-two.html".to_string(),
            checkout_complete: "/checkout-complete.html".to_string(),
            item_detail_pattern: r"/inventory-item\.html\?id=\d+".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSelectors {
    pub username_input: String,
    pub password_input: String,
    pub login_button: String,
    pub error_message: String,
    pub error_container: String,
    pub error_button: String,
    pub error_icon: String,
    pub username_field: String,
    pub password_field: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username_input: r#"[data-test="username"]"#.to_string(),
            password_input: r#"[data-test="password"]"#.to_string(),
            login_button: r#"[data-test="login-button"]"#.to_string(),
            error_message: r#"[data-test="error"]"#.to_string(),
            error_container: ".error-message-container".to_string(),
            error_button: ".error-button".to_string(),
            error_icon: ".error_icon".to_string(),
            username_field: "#user-name".to_string(),
            password_field: "#password".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySelectors {
    pub items: String,
    pub item_name: String,
    pub item_price: String,
    pub item_image: String,
    /// Anchor inside an item container, present on most item variants
    pub item_link: String,
    pub add_to_cart_button: String,
    pub remove_button: String,
    /// The add/remove toggle regardless of its current label
    pub inventory_button: String,
    pub sort_dropdown: String,
    pub details_name: String,
    pub back_button: String,
}

impl Default for InventorySelectors {
    fn default() -> Self {
        Self {
            items: ".inventory_item".to_string(),
            item_name: ".inventory_item_name".to_string(),
            item_price: ".inventory_item_price".to_string(),
            item_image: ".inventory_item_img img".to_string(),
            item_link: "a".to_string(),
            add_to_cart_button: r#"button:has-text("Add to cart")"#.to_string(),
            remove_button: r#"button:has-text("Remove")"#.to_string(),
            inventory_button: "button.btn_inventory".to_string(),
            sort_dropdown: ".product_sort_container".to_string(),
            details_name: ".inventory_details_name".to_string(),
            back_button: "button.back_button".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSelectors {
    pub badge: String,
    pub link: String,
    pub item: String,
    pub item_name: String,
    pub item_price: String,
    /// Any remove control, on the cart page or the inventory page
    pub remove_button: String,
    /// Remove control on cart rows
    pub cart_remove_button: String,
    pub checkout_button: String,
    pub continue_shopping_button: String,
}

impl Default for CartSelectors {
    fn default() -> Self {
        Self {
            badge: ".shopping_cart_badge".to_string(),
            link: ".shopping_cart_link".to_string(),
            item: ".cart_item".to_string(),
            item_name: ".inventory_item_name".to_string(),
            item_price: ".inventory_item_price".to_string(),
            remove_button: r#"button:has-text("Remove")"#.to_string(),
            cart_remove_button: "button.cart_button".to_string(),
            checkout_button: r#"[data-test="checkout"]"#.to_string(),
            continue_shopping_button: r#"[data-test="continue-shopping"]"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSelectors {
    pub first_name_input: String,
    pub last_name_input: String,
    pub postal_code_input: String,
    pub continue_button: String,
    pub finish_button: String,
    pub cancel_button: String,
    pub error_message: String,
    pub summary_item: String,
    pub complete_header: String,
    pub back_home_button: String,
}

impl Default for CheckoutSelectors {
    fn default() -> Self {
        Self {
            first_name_input: "[data-test='firstName']".to_string(),
            last_name_input: "[data-test='lastName']".to_string(),
            postal_code_input: "[data-test='postalCode']".to_string(),
            continue_button: "[data-test='continue']".to_string(),
            finish_button: "[data-test='finish']".to_string(),
            cancel_button: "[data-test='cancel']".to_string(),
            error_message: "h3[data-test='error']".to_string(),
            summary_item: ".cart_item".to_string(),
            complete_header: ".complete-header".to_string(),
            back_home_button: "[data-test='back-to-products']".to_string(),
        }
    }
}

/// Every selector map for the storefront
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontSelectors {
    pub paths: PagePaths,
    pub login: LoginSelectors,
    pub inventory: InventorySelectors,
    pub cart: CartSelectors,
    pub checkout: CheckoutSelectors,
}
