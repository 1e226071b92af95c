//! Command line for the scenario harness
//!
//! `cargo test` forwards libtest flags (`--nocapture`, `--test-threads 4`,
//! ...) to every test binary, including the `harness = false` one. Those are
//! stripped before clap sees the arguments; anything else clap does not know
//! is a usage error.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use challenge_common::{BrowserKind, SuiteConfig};

/// libtest flags that take no value
const LIBTEST_SWITCHES: &[&str] = &[
    "--nocapture",
    "--no-capture",
    "--show-output",
    "--exact",
    "--ignored",
    "--include-ignored",
    "--list",
    "--bench",
    "--test",
    "--quiet",
    "-q",
    "--report-time",
    "--ensure-time",
    "--shuffle",
    "--force-run-in-process",
];

/// libtest flags followed by a value, as `--flag value` or `--flag=value`
const LIBTEST_OPTIONS: &[&str] = &[
    "--test-threads",
    "--color",
    "--format",
    "--skip",
    "--logfile",
    "--shuffle-seed",
    "-Z",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteSelection {
    Ui,
    Api,
    All,
}

#[derive(Parser, Debug)]
#[command(name = "challenge-scenarios")]
#[command(about = "Storefront UI and booking API scenarios")]
pub struct ScenarioArgs {
    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "challenge.toml")]
    pub config: PathBuf,

    /// Which suites to run
    #[arg(long, value_enum, default_value = "all")]
    pub suite: SuiteSelection,

    /// Run only scenarios carrying this tag (suite tags count)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only scenarios whose "suite > scenario" name contains this text
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Storefront base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Booking service base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    /// Run in headless mode
    #[arg(long)]
    pub headless: Option<bool>,

    /// Concurrent scenarios
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Whole-scenario retries after a failure
    #[arg(long)]
    pub retries: Option<u32>,

    /// Directory holding ui.yaml and api.yaml
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ScenarioArgs {
    /// Parse the process arguments, exiting with clap's usage error on
    /// anything that is neither ours nor a libtest flag.
    pub fn from_env() -> Self {
        match Self::try_parse_from(strip_libtest_args(std::env::args_os())) {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn apply(&self, config: &mut SuiteConfig) {
        if let Some(url) = &self.base_url {
            config.ui.base_url = url.clone();
        }
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.ui.browser = browser;
        }
        if let Some(headless) = self.headless {
            config.ui.headless = headless;
        }
        if let Some(workers) = self.workers {
            config.runner.workers = workers;
        }
        if let Some(retries) = self.retries {
            config.runner.retries = retries;
        }
        if let Some(dir) = &self.fixtures {
            config.fixtures_dir = Some(dir.clone());
        }
        if let Some(output) = &self.output {
            config.runner.output_dir = output.clone();
        }
    }
}

/// Drop libtest flags (and their values) from an argument list, keeping the
/// program name and everything else in order.
pub fn strip_libtest_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut kept = Vec::new();
    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            kept.push(arg);
            continue;
        };
        if LIBTEST_SWITCHES.contains(&text) {
            continue;
        }
        if LIBTEST_OPTIONS.contains(&text) {
            args.next();
            continue;
        }
        let is_inline_option = text
            .split_once('=')
            .is_some_and(|(flag, _)| LIBTEST_OPTIONS.contains(&flag));
        if !is_inline_option {
            kept.push(arg);
        }
    }
    kept
}
