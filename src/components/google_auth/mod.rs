pub mod token;

pub use token::TokenManager;

use crate::error::{Error, SummaryResult};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Builds error values for one API family
pub type ErrorFn = fn(&str) -> Error;

/// Authorized access to Google REST endpoints shared by the platform bindings
#[derive(Clone)]
pub struct GoogleApi {
    client: Client,
    tokens: TokenManager,
}

impl GoogleApi {
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            tokens,
        }
    }

    /// Build `base/seg1/seg2...` with each segment percent-encoded
    pub fn endpoint(base: &str, segments: &[&str], on_error: ErrorFn) -> SummaryResult<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| on_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| on_error(&format!("URL cannot have path segments: {}", base)))?
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> SummaryResult<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn check(response: reqwest::Response, on_error: ErrorFn) -> SummaryResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(on_error(&format!("HTTP {} - {}", status, error_body)))
    }

    /// Send a request and decode a JSON response
    pub async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        on_error: ErrorFn,
    ) -> SummaryResult<T> {
        let response = Self::check(self.send(method, url, body).await?, on_error).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| on_error(&format!("Failed to parse response: {}", e)))
    }

    /// Like [`GoogleApi::json`] but maps 404 to `None`
    pub async fn json_optional<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        on_error: ErrorFn,
    ) -> SummaryResult<Option<T>> {
        let response = self.send(method, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response, on_error).await?;
        let value = response
            .json::<T>()
            .await
            .map_err(|e| on_error(&format!("Failed to parse response: {}", e)))?;
        Ok(Some(value))
    }

    /// Send a request whose response body is ignored
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        on_error: ErrorFn,
    ) -> SummaryResult<()> {
        Self::check(self.send(method, url, body).await?, on_error).await?;
        Ok(())
    }
}
