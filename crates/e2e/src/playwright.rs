//! Playwright browser automation
//!
//! A [`PlaywrightPage`] owns one `node` process running a generated bridge
//! script. The bridge launches the browser, opens a single context and page,
//! then answers one JSON request per stdin line with one JSON reply per
//! stdout line:
//!
//! ```text
//! -> {"id":3,"op":"click","target":{"segments":[{"selector":".shopping_cart_link"}]}}
//! <- {"id":3,"ok":true,"value":null}
//! <- {"id":4,"ok":false,"kind":"assertion","error":"..."}
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use challenge_common::{BrowserKind, UiConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::page::{Expectation, Locator, Page};
use crate::runner::PageLauncher;

/// Time allowed for node to start and the browser to launch
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Slack on top of the engine's own timeouts before the bridge is considered hung
const REPLY_GRACE: Duration = Duration::from_secs(30);

const CLOSE_TIMEOUT: Duration = Duration::from_secs(15);

const BRIDGE_SCRIPT: &str = r#"
const { chromium, firefox, webkit } = require('playwright');
const { expect } = require('@playwright/test');
const readline = require('readline');

const config = JSON.parse(process.env.BRIDGE_CONFIG);
const engines = { chromium, firefox, webkit };

function reply(message) {
  process.stdout.write(JSON.stringify(message) + '\n');
}

function resolve(page, target) {
  let locator = page;
  for (const segment of target.segments) {
    locator = locator.locator(segment.selector);
    if (segment.nth !== undefined && segment.nth !== null) {
      locator = locator.nth(segment.nth);
    }
  }
  return locator;
}

function pattern(p) {
  return p.type === 'regex' ? new RegExp(p.source) : p.value;
}

function urlPattern(p) {
  return p.type === 'regex' ? new RegExp(p.source) : new URL(p.value, config.base_url).toString();
}

function classify(err) {
  if (err && err.matcherResult) return 'assertion';
  if (err && err.name === 'TimeoutError') return 'timeout';
  return 'engine';
}

async function runExpect(page, cmd) {
  const options = { timeout: cmd.timeout_ms ?? config.expect_timeout_ms };
  let e = expect(cmd.target ? resolve(page, cmd.target) : page);
  if (cmd.negate) e = e.not;
  const a = cmd.assertion;
  switch (a.kind) {
    case 'url': return e.toHaveURL(urlPattern(a.pattern), options);
    case 'visible': return e.toBeVisible(options);
    case 'hidden': return e.toBeHidden(options);
    case 'text': return e.toHaveText(a.expected, options);
    case 'contains_text': return e.toContainText(a.expected, options);
    case 'count': return e.toHaveCount(a.expected, options);
    case 'class': return e.toHaveClass(pattern(a.pattern), options);
    case 'value': return e.toHaveValue(a.expected, options);
    case 'disabled': return e.toBeDisabled(options);
    default: throw new Error(`unknown assertion: ${a.kind}`);
  }
}

async function dispatch(page, cmd) {
  switch (cmd.op) {
    case 'goto': await page.goto(cmd.url); return null;
    case 'go_back': await page.goBack(); return null;
    case 'reload': await page.reload(); return null;
    case 'url': return page.url();
    case 'click': await resolve(page, cmd.target).click(); return null;
    case 'fill': await resolve(page, cmd.target).fill(cmd.value); return null;
    case 'select_option': await resolve(page, cmd.target).selectOption(cmd.value); return null;
    case 'press': await page.keyboard.press(cmd.key); return null;
    case 'type': await page.keyboard.type(cmd.text); return null;
    case 'count': return resolve(page, cmd.target).count();
    case 'is_visible': return resolve(page, cmd.target).isVisible();
    case 'text_content': return resolve(page, cmd.target).textContent();
    case 'all_text_contents': return resolve(page, cmd.target).allTextContents();
    case 'get_attribute': return resolve(page, cmd.target).getAttribute(cmd.name);
    case 'wait_for':
      await resolve(page, cmd.target).waitFor({ state: 'visible', timeout: cmd.timeout_ms });
      return null;
    case 'screenshot': await page.screenshot({ path: cmd.path, fullPage: cmd.full_page }); return null;
    case 'expect': await runExpect(page, cmd); return null;
    default: throw new Error(`unknown op: ${cmd.op}`);
  }
}

async function close(browser, context, page, cmd) {
  const video = page.video();
  await context.close();
  let kept = null;
  if (video) {
    if (cmd.keep_video) kept = await video.path();
    else await video.delete();
  }
  await browser.close();
  return kept;
}

(async () => {
  const browser = await engines[config.browser].launch({ headless: config.headless });
  const options = { baseURL: config.base_url, viewport: config.viewport };
  if (config.video_dir) options.recordVideo = { dir: config.video_dir, size: config.viewport };
  const context = await browser.newContext(options);
  context.setDefaultTimeout(config.action_timeout_ms);
  const page = await context.newPage();
  reply({ id: 0, ok: true, value: 'ready' });

  const lines = readline.createInterface({ input: process.stdin });
  for await (const line of lines) {
    if (!line.trim()) continue;
    let cmd;
    try {
      cmd = JSON.parse(line);
    } catch (err) {
      console.error(`unparsable request: ${line}`);
      continue;
    }
    try {
      const value = cmd.op === 'close' ? await close(browser, context, page, cmd) : await dispatch(page, cmd);
      reply({ id: cmd.id, ok: true, value: value ?? null });
    } catch (err) {
      reply({ id: cmd.id, ok: false, kind: classify(err), error: String(err && err.message || err) });
    }
    if (cmd.op === 'close') break;
  }
  process.exit(0);
})().catch((err) => {
  console.error(err && err.stack || String(err));
  process.exit(1);
});
"#;

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub action_timeout_ms: u64,
    pub expect_timeout_ms: u64,
    /// `node_modules` the bridge resolves `playwright` from
    pub node_path: PathBuf,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl From<&UiConfig> for PlaywrightConfig {
    fn from(ui: &UiConfig) -> Self {
        Self {
            base_url: ui.base_url.clone(),
            browser: ui.browser,
            headless: ui.headless,
            viewport_width: ui.viewport_width,
            viewport_height: ui.viewport_height,
            action_timeout_ms: ui.action_timeout_ms,
            expect_timeout_ms: ui.expect_timeout_ms,
            node_path: ui.node_path.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Viewport {
    width: u32,
    height: u32,
}

/// Handed to the bridge through `BRIDGE_CONFIG`
#[derive(Debug, Serialize)]
struct BridgeConfig<'a> {
    base_url: &'a str,
    browser: &'static str,
    headless: bool,
    viewport: Viewport,
    action_timeout_ms: u64,
    expect_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_dir: Option<&'a Path>,
}

impl<'a> BridgeConfig<'a> {
    fn new(config: &'a PlaywrightConfig, video_dir: Option<&'a Path>) -> Self {
        Self {
            base_url: &config.base_url,
            browser: config.browser.as_str(),
            headless: config.headless,
            viewport: Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            action_timeout_ms: config.action_timeout_ms,
            expect_timeout_ms: config.expect_timeout_ms,
            video_dir,
        }
    }
}

/// One bridge request; the `id` is added when it is sent
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum BridgeCommand<'a> {
    Goto { url: &'a str },
    GoBack,
    Reload,
    Url,
    Click { target: &'a Locator },
    Fill { target: &'a Locator, value: &'a str },
    SelectOption { target: &'a Locator, value: &'a str },
    Press { key: &'a str },
    Type { text: &'a str },
    Count { target: &'a Locator },
    IsVisible { target: &'a Locator },
    TextContent { target: &'a Locator },
    AllTextContents { target: &'a Locator },
    GetAttribute { target: &'a Locator, name: &'a str },
    WaitFor { target: &'a Locator, timeout_ms: u64 },
    Screenshot { path: &'a Path, full_page: bool },
    Expect(&'a Expectation),
    Close { keep_video: bool },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FailureKind {
    Assertion,
    Timeout,
    Engine,
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    kind: Option<FailureKind>,
    #[serde(default)]
    error: Option<String>,
}

impl BridgeReply {
    fn into_result(self) -> E2eResult<Value> {
        if self.ok {
            return Ok(self.value);
        }
        let message = self.error.unwrap_or_else(|| "unknown bridge error".to_string());
        Err(match self.kind {
            Some(FailureKind::Assertion) => E2eError::AssertionFailed(message),
            Some(FailureKind::Timeout) => E2eError::Timeout(message),
            Some(FailureKind::Engine) | None => E2eError::Playwright(message),
        })
    }
}

struct BridgeIo {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl BridgeIo {
    /// Next reply for `id`, skipping blank, non-JSON and stale lines
    async fn read_reply(&mut self, id: u64) -> E2eResult<BridgeReply> {
        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| E2eError::Bridge("bridge exited before replying".to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let reply: BridgeReply = match serde_json::from_str(&line) {
                Ok(reply) => reply,
                Err(_) => {
                    debug!(target: "playwright", "{}", line);
                    continue;
                }
            };
            if reply.id == id {
                return Ok(reply);
            }
            warn!("Discarding bridge reply {} while waiting for {}", reply.id, id);
        }
    }
}

/// A browser page driven through the bridge process
pub struct PlaywrightPage {
    io: Mutex<BridgeIo>,
    next_id: AtomicU64,
    reply_timeout: Duration,
    _script_dir: TempDir,
}

impl PlaywrightPage {
    /// Start node on the bridge script and wait until the page is open.
    /// With `video_dir`, the context records video into it.
    pub async fn launch(config: &PlaywrightConfig, video_dir: Option<&Path>) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, BRIDGE_SCRIPT)?;

        if let Some(dir) = video_dir {
            std::fs::create_dir_all(dir)?;
        }

        let bridge_config = serde_json::to_string(&BridgeConfig::new(config, video_dir))?;
        let node_path = if config.node_path.is_absolute() {
            config.node_path.clone()
        } else {
            std::env::current_dir()?.join(&config.node_path)
        };

        debug!("Launching Playwright bridge: {}", script_path.display());

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .env("BRIDGE_CONFIG", bridge_config)
            .env("NODE_PATH", &node_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| E2eError::Playwright(format!("Failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Bridge("stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Bridge("stdout not captured".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "playwright", "{}", line);
                }
            });
        }

        let mut io = BridgeIo {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let ready = tokio::time::timeout(LAUNCH_TIMEOUT, io.read_reply(0))
            .await
            .map_err(|_| E2eError::Timeout("Playwright bridge to start".to_string()))?
            .map_err(|e| E2eError::Playwright(format!("Browser launch failed: {}", e)))?;
        ready.into_result()?;

        info!(
            "Launched {} ({})",
            config.browser.as_str(),
            if config.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            io: Mutex::new(io),
            next_id: AtomicU64::new(1),
            reply_timeout: Duration::from_millis(config.action_timeout_ms.max(config.expect_timeout_ms)) + REPLY_GRACE,
            _script_dir: script_dir,
        })
    }

    async fn call(&self, command: BridgeCommand<'_>) -> E2eResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut request = serde_json::to_value(&command)?;
        let op = request["op"].as_str().unwrap_or("unknown").to_string();
        if let Value::Object(map) = &mut request {
            map.insert("id".to_string(), Value::from(id));
        }
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        let mut io = self.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        let reply = tokio::time::timeout(self.reply_timeout, io.read_reply(id))
            .await
            .map_err(|_| E2eError::Timeout(format!("bridge reply to '{}'", op)))??;
        reply.into_result()
    }

    async fn call_as<T: DeserializeOwned>(&self, command: BridgeCommand<'_>) -> E2eResult<T> {
        let value = self.call(command).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.call(BridgeCommand::Goto { url }).await.map(drop)
    }

    async fn go_back(&self) -> E2eResult<()> {
        self.call(BridgeCommand::GoBack).await.map(drop)
    }

    async fn reload(&self) -> E2eResult<()> {
        self.call(BridgeCommand::Reload).await.map(drop)
    }

    async fn url(&self) -> E2eResult<String> {
        self.call_as(BridgeCommand::Url).await
    }

    async fn click(&self, target: &Locator) -> E2eResult<()> {
        self.call(BridgeCommand::Click { target }).await.map(drop)
    }

    async fn fill(&self, target: &Locator, value: &str) -> E2eResult<()> {
        self.call(BridgeCommand::Fill { target, value }).await.map(drop)
    }

    async fn select_option(&self, target: &Locator, value: &str) -> E2eResult<()> {
        self.call(BridgeCommand::SelectOption { target, value })
            .await
            .map(drop)
    }

    async fn press(&self, key: &str) -> E2eResult<()> {
        self.call(BridgeCommand::Press { key }).await.map(drop)
    }

    async fn type_text(&self, text: &str) -> E2eResult<()> {
        self.call(BridgeCommand::Type { text }).await.map(drop)
    }

    async fn count(&self, target: &Locator) -> E2eResult<usize> {
        self.call_as(BridgeCommand::Count { target }).await
    }

    async fn is_visible(&self, target: &Locator) -> E2eResult<bool> {
        self.call_as(BridgeCommand::IsVisible { target }).await
    }

    async fn text_content(&self, target: &Locator) -> E2eResult<Option<String>> {
        self.call_as(BridgeCommand::TextContent { target }).await
    }

    async fn all_text_contents(&self, target: &Locator) -> E2eResult<Vec<String>> {
        self.call_as(BridgeCommand::AllTextContents { target }).await
    }

    async fn get_attribute(&self, target: &Locator, name: &str) -> E2eResult<Option<String>> {
        self.call_as(BridgeCommand::GetAttribute { target, name }).await
    }

    async fn wait_for(&self, target: &Locator, timeout_ms: u64) -> E2eResult<()> {
        self.call(BridgeCommand::WaitFor { target, timeout_ms })
            .await
            .map(drop)
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.call(BridgeCommand::Screenshot { path, full_page })
            .await
            .map(drop)
    }

    async fn expect(&self, expectation: &Expectation) -> E2eResult<()> {
        self.call(BridgeCommand::Expect(expectation)).await.map(drop)
    }

    async fn close(&self, keep_video: bool) -> E2eResult<Option<PathBuf>> {
        let video: Option<PathBuf> = self.call_as(BridgeCommand::Close { keep_video }).await?;

        let mut io = self.io.lock().await;
        match tokio::time::timeout(CLOSE_TIMEOUT, io.child.wait()).await {
            Ok(status) => debug!("Playwright bridge exited: {}", status?),
            Err(_) => {
                warn!("Playwright bridge did not exit, killing it");
                io.child.kill().await?;
            }
        }
        Ok(video)
    }
}

/// Launches one bridge per scenario attempt
#[derive(Debug, Clone)]
pub struct PlaywrightLauncher {
    config: PlaywrightConfig,
}

impl PlaywrightLauncher {
    /// Fails with [`E2eError::PlaywrightNotFound`] when the Playwright CLI is missing
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }
}

#[async_trait]
impl PageLauncher for PlaywrightLauncher {
    async fn launch(&self, video_dir: Option<&Path>) -> E2eResult<Arc<dyn Page>> {
        let page = PlaywrightPage::launch(&self.config, video_dir).await?;
        Ok(Arc::new(page))
    }
}
