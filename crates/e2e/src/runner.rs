//! Scenario runner: suites, hooks, retries and artifacts

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use challenge_api::ApiSession;
use challenge_common::{ApiConfig, Fixtures, SuiteConfig};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::helpers::Storefront;
use crate::page::Page;
use crate::report;

type ScenarioFn = Arc<dyn Fn(ScenarioContext) -> BoxFuture<'static, E2eResult<()>> + Send + Sync>;

fn boxed<F, Fut>(f: F) -> ScenarioFn
where
    F: Fn(ScenarioContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = E2eResult<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Opens a fresh browser page for one scenario attempt
#[async_trait]
pub trait PageLauncher: Send + Sync {
    /// With `video_dir`, the page records video into it
    async fn launch(&self, video_dir: Option<&Path>) -> E2eResult<Arc<dyn Page>>;
}

/// The two booking API sessions, opened once per API suite
pub struct ApiSessions {
    pub anonymous: ApiSession,
    pub authorized: ApiSession,
}

impl ApiSessions {
    /// Fails fast when authentication is refused
    pub async fn open(config: &ApiConfig) -> E2eResult<Self> {
        Ok(Self {
            anonymous: ApiSession::unauthenticated(config)?,
            authorized: ApiSession::authenticated(config).await?,
        })
    }
}

/// Everything a scenario body can reach
#[derive(Clone)]
pub struct ScenarioContext {
    name: String,
    page: Option<Arc<dyn Page>>,
    api: Option<Arc<ApiSessions>>,
    pub storefront: Arc<Storefront>,
    pub fixtures: Arc<Fixtures>,
    pub config: Arc<SuiteConfig>,
}

impl ScenarioContext {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> E2eResult<&dyn Page> {
        self.page
            .as_deref()
            .ok_or(E2eError::MissingResource("a browser page"))
    }

    pub fn api(&self) -> E2eResult<&ApiSessions> {
        self.api
            .as_deref()
            .ok_or(E2eError::MissingResource("API sessions"))
    }
}

/// A named, independent check
#[derive(Clone)]
pub struct Scenario {
    name: String,
    tags: Vec<String>,
    run: ScenarioFn,
}

impl Scenario {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ScenarioContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            tags: Vec::new(),
            run: boxed(f),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Scenarios sharing hooks and resources
#[derive(Clone)]
pub struct Suite {
    name: String,
    tags: Vec<String>,
    uses_browser: bool,
    uses_api: bool,
    before_each: Option<ScenarioFn>,
    scenarios: Vec<Scenario>,
}

impl Suite {
    /// Every attempt gets its own browser page
    pub fn ui(name: impl Into<String>) -> Self {
        Self::new(name, true, false)
    }

    /// API sessions are opened once before the first scenario
    pub fn api(name: impl Into<String>) -> Self {
        Self::new(name, false, true)
    }

    fn new(name: impl Into<String>, uses_browser: bool, uses_api: bool) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            uses_browser,
            uses_api,
            before_each: None,
            scenarios: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Runs before every attempt of every scenario; a failure fails the attempt
    pub fn before_each<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ScenarioContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        self.before_each = Some(boxed(f));
        self
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn uses_browser(&self) -> bool {
        self.uses_browser
    }
}

/// Select scenarios by tag and/or name substring
#[derive(Debug, Clone, Default)]
pub struct ScenarioFilter {
    pub tag: Option<String>,
    pub grep: Option<String>,
}

impl ScenarioFilter {
    pub fn matches(&self, suite: &Suite, scenario: &Scenario) -> bool {
        if let Some(tag) = &self.tag {
            if !suite.tags.contains(tag) && !scenario.tags.contains(tag) {
                return false;
            }
        }
        if let Some(grep) = &self.grep {
            let full_name = format!("{} > {}", suite.name, scenario.name).to_lowercase();
            if !full_name.contains(&grep.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    /// Failed at least once, then passed on a retry
    Flaky,
    Failed,
    Skipped,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub suite: String,
    pub name: String,
    pub outcome: Outcome,
    pub attempts: u32,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshots: Vec<PathBuf>,
    pub videos: Vec<PathBuf>,
}

impl TestResult {
    fn without_attempt(suite: &Suite, scenario: &Scenario, outcome: Outcome, error: String) -> Self {
        Self {
            suite: suite.name.clone(),
            name: scenario.name.clone(),
            outcome,
            attempts: 0,
            duration_ms: 0,
            error: Some(error),
            screenshots: Vec::new(),
            videos: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Passed | Outcome::Flaky)
    }
}

/// Result of running all suites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    fn from_results(started_at: DateTime<Utc>, duration_ms: u64, results: Vec<TestResult>) -> Self {
        let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
        Self {
            started_at,
            total: results.len(),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            flaky: count(Outcome::Flaky),
            skipped: count(Outcome::Skipped),
            duration_ms,
            results,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

struct Attempt {
    result: E2eResult<()>,
    screenshot: Option<PathBuf>,
    video: Option<PathBuf>,
}

/// Runs suites of scenarios against the configured targets
pub struct TestRunner {
    config: Arc<SuiteConfig>,
    fixtures: Arc<Fixtures>,
    storefront: Arc<Storefront>,
    launcher: Option<Arc<dyn PageLauncher>>,
    filter: ScenarioFilter,
}

impl TestRunner {
    pub fn new(config: SuiteConfig, fixtures: Fixtures) -> Self {
        Self {
            config: Arc::new(config),
            fixtures: Arc::new(fixtures),
            storefront: Arc::new(Storefront::default()),
            launcher: None,
            filter: ScenarioFilter::default(),
        }
    }

    /// Without a launcher, browser suites are reported as skipped
    pub fn with_launcher(mut self, launcher: Arc<dyn PageLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn with_storefront(mut self, storefront: Storefront) -> Self {
        self.storefront = Arc::new(storefront);
        self
    }

    pub fn with_filter(mut self, filter: ScenarioFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every selected scenario of every suite, in declaration order
    pub async fn run_suites(&self, suites: &[Suite]) -> TestSuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();

        for suite in suites {
            results.extend(self.run_suite(suite).await);
        }

        let summary = TestSuiteResult::from_results(started_at, start.elapsed().as_millis() as u64, results);

        info!("");
        info!(
            "Test Results: {} passed, {} flaky, {} failed, {} skipped ({} ms)",
            summary.passed, summary.flaky, summary.failed, summary.skipped, summary.duration_ms
        );
        summary
    }

    async fn run_suite(&self, suite: &Suite) -> Vec<TestResult> {
        let selected: Vec<&Scenario> = suite
            .scenarios
            .iter()
            .filter(|scenario| self.filter.matches(suite, scenario))
            .collect();
        if selected.is_empty() {
            return Vec::new();
        }

        info!("{} ({} scenario(s))", suite.name, selected.len());

        if suite.uses_browser && self.launcher.is_none() {
            warn!("No browser available, skipping {}", suite.name);
            return selected
                .iter()
                .map(|s| TestResult::without_attempt(suite, s, Outcome::Skipped, "no browser launcher".to_string()))
                .collect();
        }

        let api = if suite.uses_api {
            match ApiSessions::open(&self.config.api).await {
                Ok(sessions) => Some(Arc::new(sessions)),
                Err(e) => {
                    let reason = E2eError::Setup(e.to_string()).to_string();
                    error!("✗ {} - {}", suite.name, reason);
                    return selected
                        .iter()
                        .map(|s| TestResult::without_attempt(suite, s, Outcome::Failed, reason.clone()))
                        .collect();
                }
            }
        } else {
            None
        };

        let workers = self.config.runner.workers.max(1);
        let mut indexed: Vec<(usize, TestResult)> = stream::iter(selected.into_iter().enumerate())
            .map(|(index, scenario)| {
                let api = api.clone();
                async move { (index, self.run_scenario(suite, scenario, api).await) }
            })
            .buffer_unordered(workers)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    async fn run_scenario(&self, suite: &Suite, scenario: &Scenario, api: Option<Arc<ApiSessions>>) -> TestResult {
        let start = Instant::now();
        let max_attempts = self.config.runner.retries + 1;
        let mut passed_on = None;
        let mut last_error = None;
        let mut screenshots = Vec::new();
        let mut videos = Vec::new();
        let mut attempts = 0;

        for attempt_no in 1..=max_attempts {
            attempts = attempt_no;
            debug!("Running {} (attempt {})", scenario.name, attempt_no);
            let attempt = self.run_attempt(suite, scenario, api.clone(), attempt_no).await;
            screenshots.extend(attempt.screenshot);
            videos.extend(attempt.video);
            match attempt.result {
                Ok(()) => {
                    passed_on = Some(attempt_no);
                    break;
                }
                Err(e) => {
                    if attempt_no < max_attempts {
                        warn!("{} failed on attempt {}, retrying: {}", scenario.name, attempt_no, e);
                    }
                    last_error = Some(e.to_string());
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let outcome = match passed_on {
            Some(1) => Outcome::Passed,
            Some(_) => Outcome::Flaky,
            None => Outcome::Failed,
        };

        match outcome {
            Outcome::Passed => info!("✓ {} ({} ms)", scenario.name, duration_ms),
            Outcome::Flaky => warn!("✓ {} ({} ms, flaky: passed on attempt {})", scenario.name, duration_ms, attempts),
            _ => error!(
                "✗ {} - {}",
                scenario.name,
                last_error.as_deref().unwrap_or("unknown error")
            ),
        }

        TestResult {
            suite: suite.name.clone(),
            name: scenario.name.clone(),
            outcome,
            attempts,
            duration_ms,
            error: last_error,
            screenshots,
            videos,
        }
    }

    async fn run_attempt(
        &self,
        suite: &Suite,
        scenario: &Scenario,
        api: Option<Arc<ApiSessions>>,
        attempt_no: u32,
    ) -> Attempt {
        let page = match self.open_page(suite).await {
            Ok(page) => page,
            Err(e) => {
                return Attempt {
                    result: Err(e),
                    screenshot: None,
                    video: None,
                }
            }
        };

        let ctx = ScenarioContext {
            name: scenario.name.clone(),
            page: page.clone(),
            api,
            storefront: self.storefront.clone(),
            fixtures: self.fixtures.clone(),
            config: self.config.clone(),
        };

        let mut result = match &suite.before_each {
            Some(hook) => hook(ctx.clone()).await,
            None => Ok(()),
        };
        if result.is_ok() {
            result = (scenario.run)(ctx).await;
        }

        let mut attempt = Attempt {
            result,
            screenshot: None,
            video: None,
        };

        if let Some(page) = page {
            let failed = attempt.result.is_err();
            if failed && self.config.runner.screenshot_on_failure {
                let path = self
                    .config
                    .screenshots_dir()
                    .join(format!("{}-{}-attempt{}.png", slug(&suite.name), slug(&scenario.name), attempt_no));
                match page.screenshot(&path, true).await {
                    Ok(()) => attempt.screenshot = Some(path),
                    Err(e) => warn!("Could not capture screenshot for {}: {}", scenario.name, e),
                }
            }
            match page.close(failed).await {
                Ok(video) => attempt.video = video,
                Err(e) => warn!("Could not close page for {}: {}", scenario.name, e),
            }
        }

        attempt
    }

    async fn open_page(&self, suite: &Suite) -> E2eResult<Option<Arc<dyn Page>>> {
        if !suite.uses_browser {
            return Ok(None);
        }
        let launcher = self
            .launcher
            .as_ref()
            .ok_or(E2eError::MissingResource("a browser launcher"))?;
        let video_dir = self
            .config
            .runner
            .video_on_failure
            .then(|| self.config.videos_dir());
        let page = launcher.launch(video_dir.as_deref()).await?;
        Ok(Some(page))
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        let output_dir = &self.config.runner.output_dir;
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }

    /// Write `report.html` when enabled in the runner configuration
    pub fn write_html_report(&self, results: &TestSuiteResult) -> E2eResult<Option<PathBuf>> {
        if !self.config.runner.html_report {
            return Ok(None);
        }
        let output_dir = &self.config.runner.output_dir;
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("report.html");
        std::fs::write(&path, report::render_html(results, output_dir))?;

        info!("HTML report written to: {}", path.display());
        Ok(Some(path))
    }
}

/// File-name-safe form of a scenario name
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    slug.chars().take(80).collect()
}
