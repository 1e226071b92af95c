use challenge_common::Credentials;
use tracing::debug;

use crate::error::E2eResult;
use crate::page::{Locator, Page};
use crate::selectors::{LoginSelectors, PagePaths};

/// Login form actions
#[derive(Debug, Clone, Default)]
pub struct LoginHelper {
    selectors: LoginSelectors,
    paths: PagePaths,
}

impl LoginHelper {
    pub fn new(selectors: LoginSelectors, paths: PagePaths) -> Self {
        Self { selectors, paths }
    }

    pub fn selectors(&self) -> &LoginSelectors {
        &self.selectors
    }

    /// Navigate to the login page
    pub async fn open(&self, page: &dyn Page) -> E2eResult<()> {
        page.goto(&self.paths.login).await
    }

    /// Fill both inputs and submit. The outcome (redirect or error banner) is
    /// left for the caller to observe.
    pub async fn login(&self, page: &dyn Page, username: &str, password: &str) -> E2eResult<()> {
        debug!("Logging in as {:?}", username);
        page.fill(&self.username_input(), username).await?;
        page.fill(&self.password_input(), password).await?;
        page.click(&self.login_button()).await
    }

    pub async fn login_as(&self, page: &dyn Page, credentials: &Credentials) -> E2eResult<()> {
        self.login(page, &credentials.username, &credentials.password).await
    }

    /// Close the error banner
    pub async fn dismiss_error(&self, page: &dyn Page) -> E2eResult<()> {
        page.click(&Locator::new(&self.selectors.error_button)).await
    }

    pub fn username_input(&self) -> Locator {
        Locator::new(&self.selectors.username_input)
    }

    pub fn password_input(&self) -> Locator {
        Locator::new(&self.selectors.password_input)
    }

    pub fn login_button(&self) -> Locator {
        Locator::new(&self.selectors.login_button)
    }

    pub fn error_message(&self) -> Locator {
        Locator::new(&self.selectors.error_message)
    }

    pub fn error_container(&self) -> Locator {
        Locator::new(&self.selectors.error_container)
    }

    pub fn error_icons(&self) -> Locator {
        Locator::new(&self.selectors.error_icon)
    }

    pub fn username_field(&self) -> Locator {
        Locator::new(&self.selectors.username_field)
    }

    pub fn password_field(&self) -> Locator {
        Locator::new(&self.selectors.password_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;

    #[tokio::test]
    async fn test_login_fills_then_clicks() {
        let page = FakePage::new();
        let helper = LoginHelper::default();

        helper.login(&page, "standard_user", "secret_sauce").await.unwrap();

        assert_eq!(page.path(), "/inventory.html");
        assert_eq!(
            page.actions(),
            vec![
                r#"fill [data-test="username"]"#.to_string(),
                r#"fill [data-test="password"]"#.to_string(),
                r#"click [data-test="login-button"]"#.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_login_does_not_check_outcome() {
        let page = FakePage::new();
        let helper = LoginHelper::default();

        helper.login(&page, "locked_out_user", "secret_sauce").await.unwrap();

        assert_eq!(page.path(), "/");
        page.expect_contains_text(&helper.error_container(), "Sorry, this user has been locked out.")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dismiss_error_hides_banner() {
        let page = FakePage::new();
        let helper = LoginHelper::default();

        helper.login(&page, "", "secret_sauce").await.unwrap();
        page.expect_visible(&helper.error_message()).await.unwrap();

        helper.dismiss_error(&page).await.unwrap();
        page.expect_hidden(&helper.error_message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_dismiss_error_without_banner_times_out() {
        let page = FakePage::new();
        let helper = LoginHelper::default();

        let err = helper.dismiss_error(&page).await.unwrap_err();
        assert!(matches!(err, crate::error::E2eError::Timeout(_)));
    }
}
