/// Backend connection settings.
///
/// Resolution order for each setting: command-line flag, then environment
/// variable, then built-in default.
use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const API_URL_ENV: &str = "GYM_STATS_API_URL";
pub const TOKEN_ENV: &str = "GYM_STATS_TOKEN";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer token for the backend. Redacted in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Always ends with `/` so endpoint paths join underneath it
    pub base_url: Url,
    pub credential: Option<Credential>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ApiConfig {
            base_url: normalize_base_url(base_url)?,
            credential: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Resolve from flags and the process environment.
    pub fn resolve(api_url: Option<String>, token: Option<String>) -> Result<Self> {
        Self::resolve_with(api_url, token, |key| env::var(key).ok())
    }

    /// Resolve from flags and an arbitrary variable lookup.
    pub fn resolve_with(
        api_url: Option<String>,
        token: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_url = api_url
            .or_else(|| lookup(API_URL_ENV))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = token
            .or_else(|| lookup(TOKEN_ENV))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let config = ApiConfig::new(&api_url)
            .with_context(|| format!("Invalid backend URL: {}", api_url))?;

        Ok(match token {
            Some(t) => config.with_credential(Credential::new(t)),
            None => config,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).context("Failed to parse URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme: {}", url.scheme());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
