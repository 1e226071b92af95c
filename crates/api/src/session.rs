//! Unauthenticated and authenticated API sessions

use challenge_common::{ApiConfig, AuthScheme, Credentials};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

const AUTH_ENDPOINT: &str = "/auth";

/// Which credentials a session presents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    Unauthenticated,
    Authenticated { token: String, scheme: AuthScheme },
}

/// Base URL plus the headers every call carries
#[derive(Debug, Clone)]
pub struct ApiSession {
    client: reqwest::Client,
    base_url: String,
    kind: SessionKind,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl ApiSession {
    /// Session with the JSON default headers only
    pub fn unauthenticated(config: &ApiConfig) -> ApiResult<Self> {
        Self::build(&config.base_url, SessionKind::Unauthenticated)
    }

    /// Exchange the configured credentials for a token and return a session carrying it.
    ///
    /// One attempt is made. A non-2xx answer, or a 2xx answer without a
    /// token, is an [`ApiError::AuthenticationFailed`].
    pub async fn authenticated(config: &ApiConfig) -> ApiResult<Self> {
        let anonymous = Self::unauthenticated(config)?;
        let token = anonymous.request_token(&config.credentials()).await?;
        info!("Authenticated against {}", config.base_url);
        Self::with_token(config, token)
    }

    /// Session for an already issued token
    pub fn with_token(config: &ApiConfig, token: impl Into<String>) -> ApiResult<Self> {
        Self::build(
            &config.base_url,
            SessionKind::Authenticated {
                token: token.into(),
                scheme: config.auth_scheme,
            },
        )
    }

    fn build(base_url: &str, kind: SessionKind) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let SessionKind::Authenticated { token, scheme } = &kind {
            let (name, value) = match scheme {
                AuthScheme::Cookie => (COOKIE, format!("token={}", token)),
                AuthScheme::Bearer => (AUTHORIZATION, format!("Bearer {}", token)),
            };
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
        })
    }

    /// `POST /auth`, returning the issued token
    pub async fn request_token(&self, credentials: &Credentials) -> ApiResult<String> {
        let url = self.url(AUTH_ENDPOINT);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(credentials).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Auth endpoint returned {}", status);
            return Err(ApiError::AuthenticationFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body: AuthResponse = response.json().await?;
        body.token.ok_or_else(|| ApiError::AuthenticationFailed {
            status: status.as_u16(),
            reason: body.reason.unwrap_or_else(|| "no token in response".to_string()),
        })
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.kind, SessionKind::Authenticated { .. })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
