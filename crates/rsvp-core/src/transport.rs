//! HTTP transport
//!
//! A single entry point for every REST call. Requests carry the session
//! cookies from a shared jar and mirror the CSRF cookie into a request
//! header. Responses are parsed as JSON on 2xx and mapped to an
//! [`ApiError`] kind otherwise.
//!
//! The transport holds no state besides the cookie jar and is cheap to clone.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;

/// Error body shape used by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// REST transport bound to the configured API
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: String,
    csrf_cookie: String,
    csrf_header: String,
    csrf_prime_path: Option<String>,
}

impl Transport {
    /// Create a transport with an empty cookie jar
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_jar(config, Arc::new(Jar::default()))
    }

    /// Create a transport sharing an existing cookie jar
    pub fn with_jar(config: &Config, jar: Arc<Jar>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(concat!("rsvp/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            jar,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            csrf_cookie: config.csrf_cookie.clone(),
            csrf_header: config.csrf_header.clone(),
            csrf_prime_path: config.csrf_prime_path.clone(),
        })
    }

    /// The cookie jar shared by every request
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Base URL every path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path (optionally with a query string) against the base URL
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };
        Url::parse(&raw).map_err(|_| ApiError::InvalidUrl(raw))
    }

    /// CSRF token currently stored in the jar for `url`
    pub fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        cookie_value(header, &self.csrf_cookie)
    }

    /// Perform a request and decode the JSON response
    ///
    /// GET requests never carry a body, even if one is given.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = self.csrf_token(&url) {
            request = request.header(self.csrf_header.as_str(), token);
        }
        if method != Method::GET {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, "Request failed: {}", e);
                return Err(e.into());
            }
        };

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "API call");

        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    /// Fetch the CSRF cookie before a state-changing call (no-op when unset)
    pub async fn prime_csrf(&self) -> Result<(), ApiError> {
        let Some(ref path) = self.csrf_prime_path else {
            return Ok(());
        };
        self.get::<Value>(path).await?;
        Ok(())
    }
}

/// Find a cookie in a `Cookie` header and percent-decode its value
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, raw)| {
            // '+' is literal in cookie values, not a space
            let escaped = raw.replace('+', "%2B");
            url::form_urlencoded::parse(format!("v={}", escaped).as_bytes())
                .next()
                .map(|(_, value)| value.into_owned())
        })
}

/// Session cookies persisted between runs
///
/// Stores the jar's `Cookie` header for the API URL as plain text.
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load saved cookies into `jar` for `url`
    pub fn restore(&self, jar: &Jar, url: &Url) -> anyhow::Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cookie file: {:?}", self.path))?;

        let mut count = 0;
        for pair in content.split(';').map(str::trim).filter(|p| p.contains('=')) {
            jar.add_cookie_str(&format!("{}; Path=/", pair), url);
            count += 1;
        }
        debug!(count, "Restored session cookies");
        Ok(count)
    }

    /// Save the cookies `jar` would send to `url`
    pub fn save(&self, jar: &Jar, url: &Url) -> anyhow::Result<()> {
        let Some(header) = jar.cookies(url) else {
            return self.clear();
        };
        let header = header
            .to_str()
            .context("Cookie header is not valid text")?
            .to_string();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::write(&self.path, header)
            .with_context(|| format!("Failed to write cookie file: {:?}", self.path))?;
        Ok(())
    }

    /// Forget saved cookies
    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove cookie file: {:?}", self.path))?;
        }
        Ok(())
    }
}
