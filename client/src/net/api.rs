//! Browser transport for the clinic API.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, raced against a
//! `gloo-timers` timeout.
//! Native builds (tests, tooling): every call returns
//! `ApiError::Unavailable` since there is no browser fetch to drive.
//!
//! ERROR HANDLING
//! ==============
//! Status and body interpretation is delegated to `eyeclinic::api`'s shared
//! parsers, so the browser and the CLI fail identically on the same payload.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use eyeclinic::api::{ClinicApi, endpoint_url};
use eyeclinic::config::DEFAULT_API_URL;
use eyeclinic::types::AuthResponse;
use eyeclinic::{ApiError, Credentials, RegisterRequest, User};

/// Give up on a request after this long.
pub const REQUEST_TIMEOUT_MS: u32 = 15_000;

/// API base URL baked in at build time from `EYECLINIC_API_URL`.
pub fn build_api_url() -> String {
    base_url_from(option_env!("EYECLINIC_API_URL"))
}

fn base_url_from(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_owned()
}

#[derive(Clone, Debug)]
pub struct BrowserApi {
    base_url: String,
    #[cfg_attr(not(feature = "csr"), allow(dead_code))]
    timeout_ms: u32,
}

impl BrowserApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout_ms: REQUEST_TIMEOUT_MS }
    }

    pub fn from_build_env() -> Self {
        Self::new(build_api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg_attr(not(feature = "csr"), allow(dead_code))]
    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }
}

#[cfg(feature = "csr")]
mod fetch {
    use eyeclinic::ApiError;
    use eyeclinic::api::bearer;
    use futures::future::{Either, select};
    use gloo_net::http::{Request, RequestBuilder};
    use gloo_timers::future::TimeoutFuture;
    use serde::Serialize;

    pub(super) fn get(url: &str, token: Option<&str>) -> RequestBuilder {
        with_auth(Request::get(url), token)
    }

    pub(super) fn post(url: &str, token: Option<&str>) -> RequestBuilder {
        with_auth(Request::post(url), token)
    }

    fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match token {
            Some(token) => builder.header("Authorization", &bearer(token)),
            None => builder,
        }
    }

    pub(super) fn json<T: Serialize>(builder: RequestBuilder, payload: &T) -> Result<Request, ApiError> {
        builder.json(payload).map_err(|e| ApiError::Transport(e.to_string()))
    }

    pub(super) fn empty(builder: RequestBuilder) -> Result<Request, ApiError> {
        builder.build().map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// Send `request`, returning status and body text.
    pub(super) async fn send(request: Request, timeout_ms: u32) -> Result<(u16, String), ApiError> {
        let url = request.url();
        let response = match select(Box::pin(request.send()), Box::pin(TimeoutFuture::new(timeout_ms))).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Transport(e.to_string()))?,
            Either::Right(_) => {
                tracing::warn!(%url, timeout_ms, "api request timed out");
                return Err(ApiError::Transport(format!("request timed out after {timeout_ms} ms")));
            }
        };
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(%url, status, bytes = body.len(), "api response");
        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl ClinicApi for BrowserApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = fetch::json(fetch::post(&self.url(eyeclinic::api::endpoints::LOGIN), None), credentials)?;
            let (status, body) = fetch::send(request, self.timeout_ms).await?;
            eyeclinic::api::parse_response(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = credentials;
            Err(ApiError::Unavailable)
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = fetch::json(fetch::post(&self.url(eyeclinic::api::endpoints::REGISTER), None), request)?;
            let (status, body) = fetch::send(request, self.timeout_ms).await?;
            eyeclinic::api::parse_response(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = fetch::empty(fetch::post(&self.url(eyeclinic::api::endpoints::LOGOUT), Some(token)))?;
            let (status, body) = fetch::send(request, self.timeout_ms).await?;
            eyeclinic::api::parse_empty(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(ApiError::Unavailable)
        }
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = fetch::empty(fetch::get(&self.url(eyeclinic::api::endpoints::CURRENT_USER), Some(token)))?;
            let (status, body) = fetch::send(request, self.timeout_ms).await?;
            eyeclinic::api::parse_current_user(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(ApiError::Unavailable)
        }
    }

    async fn get_json(&self, path: &str, token: Option<&str>) -> Result<serde_json::Value, ApiError> {
        #[cfg(feature = "csr")]
        {
            let request = fetch::empty(fetch::get(&self.url(path), token))?;
            let (status, body) = fetch::send(request, self.timeout_ms).await?;
            eyeclinic::api::parse_response(status, &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (path, token);
            Err(ApiError::Unavailable)
        }
    }
}
