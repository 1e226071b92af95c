//! Error types for page helpers, the Playwright bridge and the runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Bridge protocol error: {0}")]
    Bridge(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Could not parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Scenario needs {0}, but its suite does not provide it")]
    MissingResource(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] challenge_api::ApiError),

    #[error(transparent)]
    Common(#[from] challenge_common::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail with [`E2eError::AssertionFailed`] unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message()))
    }
}

/// Fail with [`E2eError::AssertionFailed`] unless `actual == expected`
pub fn ensure_eq<T>(actual: &T, expected: &T, what: &str) -> E2eResult<()>
where
    T: PartialEq + std::fmt::Debug + ?Sized,
{
    ensure(actual == expected, || {
        format!("{}: expected {:?}, got {:?}", what, expected, actual)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_eq_reports_both_sides() {
        let err = ensure_eq(&3, &4, "item count").unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: item count: expected 4, got 3");
        assert!(ensure_eq("a", "a", "name").is_ok());
    }
}
