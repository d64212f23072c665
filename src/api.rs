//! The clinic REST API as seen by the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ClinicApi` is the seam between the session store and the network. The
//! native `HttpApi` (feature `http`) speaks to it with `reqwest`; the WASM
//! client provides its own `gloo-net` implementation; tests use fakes.
//!
//! ERROR HANDLING
//! ==============
//! Transports only move bytes. Status and body interpretation is shared via
//! [`parse_response`] so every transport fails the same way on the same
//! payload.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::{AuthResponse, Credentials, CurrentUserResponse, RegisterRequest, User};

/// Endpoint paths relative to the configured API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const LOGOUT: &str = "/logout";
    pub const CURRENT_USER: &str = "/user";
}

/// Operations the session store and pages need from the backend.
///
/// Futures are `?Send`: the browser transport is single-threaded.
#[async_trait(?Send)]
pub trait ClinicApi {
    /// `POST /login`.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// `POST /register`.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /logout` with the bearer token.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// `GET /user` with the bearer token.
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;

    /// Authenticated (or anonymous) `GET` of an arbitrary resource path.
    async fn get_json(&self, path: &str, token: Option<&str>) -> Result<serde_json::Value, ApiError>;
}

#[async_trait(?Send)]
impl<T: ClinicApi + ?Sized> ClinicApi for Rc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        (**self).login(credentials).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        (**self).register(request).await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        (**self).logout(token).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        (**self).current_user(token).await
    }

    async fn get_json(&self, path: &str, token: Option<&str>) -> Result<serde_json::Value, ApiError> {
        (**self).get_json(path, token).await
    }
}

/// Join `base` and an endpoint `path` with exactly one slash between them.
#[must_use]
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// `Authorization` header value for a bearer token.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Interpret an HTTP status and body.
///
/// # Errors
///
/// Non-2xx statuses become [`ApiError::from_response`]; a 2xx body that does
/// not deserialize into `T` becomes [`ApiError::Decode`].
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_response(status, body));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Interpret a `GET /user` response, accepting a bare or `{user}`-wrapped body.
///
/// # Errors
///
/// See [`parse_response`].
pub fn parse_current_user(status: u16, body: &str) -> Result<User, ApiError> {
    parse_response::<CurrentUserResponse>(status, body).map(CurrentUserResponse::into_user)
}

/// Interpret a response whose body is irrelevant on success (logout).
///
/// # Errors
///
/// Non-2xx statuses become [`ApiError::from_response`].
pub fn parse_empty(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::from_response(status, body))
    }
}

// =============================================================================
// reqwest transport
// =============================================================================

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;

    use super::{ClinicApi, bearer, endpoint_url, endpoints, parse_current_user, parse_empty, parse_response};
    use crate::error::ApiError;
    use crate::types::{AuthResponse, Credentials, RegisterRequest, User};

    /// Native HTTP client for the clinic API.
    #[derive(Debug, Clone)]
    pub struct HttpApi {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpApi {
        /// # Errors
        ///
        /// Returns [`ApiError::Transport`] if the TLS backend cannot be initialized.
        pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("eyeclinic/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            Ok(Self { client, base_url: base_url.into() })
        }

        #[must_use]
        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        async fn send(&self, req: reqwest::RequestBuilder) -> Result<(u16, String), ApiError> {
            let resp = req
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            tracing::debug!(status, bytes = body.len(), "api response");
            Ok((status, body))
        }

        fn url(&self, path: &str) -> String {
            endpoint_url(&self.base_url, path)
        }
    }

    #[async_trait(?Send)]
    impl ClinicApi for HttpApi {
        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            let req = self.client.post(self.url(endpoints::LOGIN)).json(credentials);
            let (status, body) = self.send(req).await?;
            parse_response(status, &body)
        }

        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
            let req = self.client.post(self.url(endpoints::REGISTER)).json(request);
            let (status, body) = self.send(req).await?;
            parse_response(status, &body)
        }

        async fn logout(&self, token: &str) -> Result<(), ApiError> {
            let req = self
                .client
                .post(self.url(endpoints::LOGOUT))
                .header(reqwest::header::AUTHORIZATION, bearer(token));
            let (status, body) = self.send(req).await?;
            parse_empty(status, &body)
        }

        async fn current_user(&self, token: &str) -> Result<User, ApiError> {
            let req = self
                .client
                .get(self.url(endpoints::CURRENT_USER))
                .header(reqwest::header::AUTHORIZATION, bearer(token));
            let (status, body) = self.send(req).await?;
            parse_current_user(status, &body)
        }

        async fn get_json(&self, path: &str, token: Option<&str>) -> Result<serde_json::Value, ApiError> {
            let mut req = self.client.get(self.url(path));
            if let Some(token) = token {
                req = req.header(reqwest::header::AUTHORIZATION, bearer(token));
            }
            let (status, body) = self.send(req).await?;
            parse_response(status, &body)
        }
    }
}
