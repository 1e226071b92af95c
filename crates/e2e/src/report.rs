//! Self-contained HTML report for a run

use std::fmt::Write;
use std::path::Path;

use crate::runner::{Outcome, TestResult, TestSuiteResult};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:6px 8px;text-align:left;vertical-align:top}\
.passed{color:#1a7f37}.flaky{color:#9a6700}.failed{color:#cf222e}.skipped{color:#6e7781}\
pre{white-space:pre-wrap;margin:0}";

/// Escape text for element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "passed",
        Outcome::Flaky => "flaky",
        Outcome::Failed => "failed",
        Outcome::Skipped => "skipped",
    }
}

/// Artifact links are written relative to the report's directory
fn artifact_links(result: &TestResult, output_dir: &Path) -> String {
    result
        .screenshots
        .iter()
        .map(|p| ("screenshot", p))
        .chain(result.videos.iter().map(|p| ("video", p)))
        .map(|(label, path)| {
            let href = path.strip_prefix(output_dir).unwrap_or(path);
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&href.to_string_lossy()),
                label
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_html(summary: &TestSuiteResult, output_dir: &Path) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Test report</title><style>{}</style></head><body>\n",
        STYLE
    );
    let _ = write!(
        html,
        "<h1>Test report</h1>\n<p>Started {} &middot; {} ms</p>\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.duration_ms
    );
    let _ = write!(
        html,
        "<p><span class=\"passed\">{} passed</span>, <span class=\"flaky\">{} flaky</span>, \
         <span class=\"failed\">{} failed</span>, <span class=\"skipped\">{} skipped</span> of {}</p>\n",
        summary.passed, summary.flaky, summary.failed, summary.skipped, summary.total
    );

    html.push_str(
        "<table>\n<tr><th>Suite</th><th>Scenario</th><th>Outcome</th><th>Attempts</th><th>ms</th><th>Error</th><th>Artifacts</th></tr>\n",
    );
    for result in &summary.results {
        let label = outcome_label(result.outcome);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td><pre>{}</pre></td><td>{}</td></tr>",
            escape_html(&result.suite),
            escape_html(&result.name),
            label,
            label,
            result.attempts,
            result.duration_ms,
            escape_html(result.error.as_deref().unwrap_or("")),
            artifact_links(result, output_dir),
        );
    }
    html.push_str("</table>\n</body></html>\n");
    html
}
