//! The page seam between helpers and the browser engine
//!
//! Helpers only ever talk to a [`Page`]. Elements are addressed with
//! [`Locator`] chains that the engine resolves lazily at action time, and
//! state checks go through [`Expectation`]s, which the engine retries until
//! they hold or its expect timeout elapses.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// One step of a locator chain: a selector, optionally narrowed to its nth match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

/// A lazily resolved element query, scoped left to right
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    segments: Vec<Segment>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                selector: selector.into(),
                nth: None,
            }],
        }
    }

    /// Query `selector` inside every element this locator matches
    pub fn locator(&self, selector: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment {
            selector: selector.into(),
            nth: None,
        });
        Self { segments }
    }

    /// Narrow the last segment to its `index`th match (zero based)
    pub fn nth(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.nth = Some(index);
        }
        Self { segments }
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            f.write_str(&segment.selector)?;
            if let Some(nth) = segment.nth {
                write!(f, " >> nth={}", nth)?;
            }
        }
        Ok(())
    }
}

/// Exact string or regular expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextMatch {
    Exact { value: String },
    Regex { source: String },
}

impl TextMatch {
    pub fn exact(value: impl Into<String>) -> Self {
        TextMatch::Exact { value: value.into() }
    }

    pub fn regex(source: impl Into<String>) -> Self {
        TextMatch::Regex { source: source.into() }
    }

    /// Evaluate locally; exact values match the whole input
    pub fn matches(&self, input: &str) -> E2eResult<bool> {
        match self {
            TextMatch::Exact { value } => Ok(input == value),
            TextMatch::Regex { source } => {
                let re = Regex::new(source).map_err(|e| E2eError::Parse {
                    input: source.clone(),
                    reason: e.to_string(),
                })?;
                Ok(re.is_match(input))
            }
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact { value } => write!(f, "{:?}", value),
            TextMatch::Regex { source } => write!(f, "/{}/", source),
        }
    }
}

/// State an expectation waits for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assertion {
    /// Page URL; exact values are resolved against the base URL
    Url { pattern: TextMatch },
    Visible,
    Hidden,
    Text { expected: String },
    ContainsText { expected: String },
    Count { expected: usize },
    Class { pattern: TextMatch },
    Value { expected: String },
    Disabled,
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertion::Url { pattern } => write!(f, "to have URL {}", pattern),
            Assertion::Visible => f.write_str("to be visible"),
            Assertion::Hidden => f.write_str("to be hidden"),
            Assertion::Text { expected } => write!(f, "to have text {:?}", expected),
            Assertion::ContainsText { expected } => write!(f, "to contain text {:?}", expected),
            Assertion::Count { expected } => write!(f, "to have count {}", expected),
            Assertion::Class { pattern } => write!(f, "to have class {}", pattern),
            Assertion::Value { expected } => write!(f, "to have value {:?}", expected),
            Assertion::Disabled => f.write_str("to be disabled"),
        }
    }
}

/// An assertion about the page (no target) or about a located element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Locator>,
    pub assertion: Assertion,
    #[serde(default)]
    pub negate: bool,
    /// Overrides the engine's expect timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Expectation {
    pub fn page(assertion: Assertion) -> Self {
        Self {
            target: None,
            assertion,
            negate: false,
            timeout_ms: None,
        }
    }

    pub fn element(target: &Locator, assertion: Assertion) -> Self {
        Self {
            target: Some(target.clone()),
            assertion,
            negate: false,
            timeout_ms: None,
        }
    }

    /// Page URL equals `path` (relative to the base URL)
    pub fn url(path: impl Into<String>) -> Self {
        Self::page(Assertion::Url {
            pattern: TextMatch::exact(path),
        })
    }

    /// Page URL matches the regular expression `source`
    pub fn url_matching(source: impl Into<String>) -> Self {
        Self::page(Assertion::Url {
            pattern: TextMatch::regex(source),
        })
    }

    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn within(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "expect({})", target)?,
            None => f.write_str("expect(page)")?,
        }
        if self.negate {
            f.write_str(" not")?;
        }
        write!(f, " {}", self.assertion)
    }
}

/// A browser page driven by the automation engine
///
/// Every call suspends until the engine has finished the action or its
/// default timeout has elapsed. Implementations do not retry.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to `url`, relative to the base URL unless absolute
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn go_back(&self) -> E2eResult<()>;

    async fn reload(&self) -> E2eResult<()>;

    /// Current absolute URL
    async fn url(&self) -> E2eResult<String>;

    async fn click(&self, target: &Locator) -> E2eResult<()>;

    /// Replace the content of an input
    async fn fill(&self, target: &Locator, value: &str) -> E2eResult<()>;

    async fn select_option(&self, target: &Locator, value: &str) -> E2eResult<()>;

    /// Press a key on the focused element (`Tab`, `Enter`, ...)
    async fn press(&self, key: &str) -> E2eResult<()>;

    /// Type text into the focused element
    async fn type_text(&self, text: &str) -> E2eResult<()>;

    async fn count(&self, target: &Locator) -> E2eResult<usize>;

    /// Instant visibility check; does not wait
    async fn is_visible(&self, target: &Locator) -> E2eResult<bool>;

    async fn text_content(&self, target: &Locator) -> E2eResult<Option<String>>;

    /// Text of every match, in document order
    async fn all_text_contents(&self, target: &Locator) -> E2eResult<Vec<String>>;

    async fn get_attribute(&self, target: &Locator, name: &str) -> E2eResult<Option<String>>;

    /// Wait until `target` is visible
    async fn wait_for(&self, target: &Locator, timeout_ms: u64) -> E2eResult<()>;

    async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<()>;

    async fn expect(&self, expectation: &Expectation) -> E2eResult<()>;

    /// Tear down the page. Returns the recorded video when `keep_video` is set
    /// and recording was enabled.
    async fn close(&self, keep_video: bool) -> E2eResult<Option<PathBuf>>;

    async fn expect_url(&self, path: &str) -> E2eResult<()> {
        self.expect(&Expectation::url(path)).await
    }

    async fn expect_visible(&self, target: &Locator) -> E2eResult<()> {
        self.expect(&Expectation::element(target, Assertion::Visible)).await
    }

    async fn expect_hidden(&self, target: &Locator) -> E2eResult<()> {
        self.expect(&Expectation::element(target, Assertion::Hidden)).await
    }

    async fn expect_text(&self, target: &Locator, expected: &str) -> E2eResult<()> {
        let assertion = Assertion::Text {
            expected: expected.to_string(),
        };
        self.expect(&Expectation::element(target, assertion)).await
    }

    async fn expect_contains_text(&self, target: &Locator, expected: &str) -> E2eResult<()> {
        let assertion = Assertion::ContainsText {
            expected: expected.to_string(),
        };
        self.expect(&Expectation::element(target, assertion)).await
    }

    async fn expect_count(&self, target: &Locator, expected: usize) -> E2eResult<()> {
        self.expect(&Expectation::element(target, Assertion::Count { expected }))
            .await
    }
}
