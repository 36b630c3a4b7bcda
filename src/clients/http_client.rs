//! HTTP client for Square API communication.
//!
//! This module provides the [`HttpClient`] type for making requests to the
//! Square API with the standard headers, a per-request timeout and opt-in
//! retry handling.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientSettings;

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Square API.
///
/// The client handles:
/// - Base URI selection from the environment or the base URL override
/// - Default headers: `Square-Version`, `Accept`, `User-Agent` and, when a
///   token is supplied, `Authorization: Bearer <token>`
/// - The configured request timeout
/// - Retry of 429 and 5xx responses when a request opts in with `tries > 1`
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use square_giftcard::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let client = HttpClient::new(config.settings(), Some(config.access_token().as_ref()))?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/v2/online-checkout/payment-links/LINK1")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Base URI (e.g., `https://connect.squareupsandbox.com`).
    base_uri: String,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `settings` - Environment, base URL, timeout and `Square-Version`
    /// * `bearer_token` - Sent as `Authorization: Bearer <token>` on every request
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    ///
    /// # Example
    ///
    /// ```rust
    /// use square_giftcard::clients::HttpClient;
    /// use square_giftcard::ClientSettings;
    ///
    /// let client = HttpClient::new(&ClientSettings::default(), Some("EAAA-token")).unwrap();
    /// assert_eq!(client.base_uri(), "https://connect.squareupsandbox.com");
    /// ```
    pub fn new(settings: &ClientSettings, bearer_token: Option<&str>) -> Result<Self, HttpError> {
        let user_agent_prefix = settings
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Square Gift Card SDK v{SDK_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Square-Version".to_string(),
            settings.square_version().as_str().to_string(),
        );

        if let Some(token) = bearer_token.filter(|t| !t.is_empty()) {
            default_headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            base_uri: settings.api_base_url().to_string(),
            default_headers,
            timeout: settings.timeout(),
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends an HTTP request to the Square API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No response arrives within the timeout (`Timeout`)
    /// - Another transport error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Opt-in retries are exhausted (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}", self.base_uri, request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            tracing::debug!(
                method = %request.http_method,
                path = %request.path,
                attempt = tries,
                "Sending Square API request"
            );

            let res = req_builder.send().await.map_err(|e| self.transport_error(e))?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.map_err(|e| self.transport_error(e))?;
            let body = Self::parse_body(code, &body_text);

            let response = HttpResponse::new(code, res_headers, body);

            tracing::debug!(
                method = %request.http_method,
                path = %request.path,
                status = code,
                "Received Square API response"
            );

            if response.is_ok() {
                return Ok(response);
            }

            let error = response.to_error();

            let should_retry = code == 429 || code >= 500;
            if !should_retry || request.tries == 1 {
                return Err(HttpError::Response(error));
            }

            if tries >= request.tries {
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message: error.message,
                    errors: error.errors,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(
                path = %request.path,
                status = code,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying Square API request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout {
                timeout: self.timeout,
            }
        } else {
            HttpError::Network(error)
        }
    }

    fn parse_body(code: u16, body_text: &str) -> serde_json::Value {
        if body_text.is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text).unwrap_or_else(|_| {
            // Gateways answer 5xx with HTML or plain text
            if code >= 500 {
                serde_json::json!({ "raw_body": body_text })
            } else {
                serde_json::json!({})
            }
        })
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// 429 honours `Retry-After`; everything else, and any value that is not
    /// a representable duration, waits a fixed second.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        if status == 429 {
            if let Some(delay) = response
                .retry_request_after
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            {
                return delay;
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseUrl, ClientSettings, Environment, PaymentLinksConfig};
    use crate::{AccessToken, LocationId, SquareVersion};

    fn settings_with(environment: Environment) -> ClientSettings {
        PaymentLinksConfig::builder()
            .access_token(AccessToken::new("token").unwrap())
            .location_id(LocationId::new("L1").unwrap())
            .environment(environment)
            .user_agent_prefix("GiftShop/2.0")
            .square_version("2024-06-04".parse::<SquareVersion>().unwrap())
            .timeout(Duration::from_secs(7))
            .build()
            .unwrap()
            .settings()
            .clone()
    }

    #[test]
    fn test_base_uri_follows_environment() {
        let sandbox = HttpClient::new(&settings_with(Environment::Sandbox), None).unwrap();
        assert_eq!(sandbox.base_uri(), "https://connect.squareupsandbox.com");

        let production = HttpClient::new(&settings_with(Environment::Production), None).unwrap();
        assert_eq!(production.base_uri(), "https://connect.squareup.com");
    }

    #[test]
    fn test_base_url_override() {
        let settings = PaymentLinksConfig::builder()
            .access_token(AccessToken::new("token").unwrap())
            .location_id(LocationId::new("L1").unwrap())
            .base_url(BaseUrl::new("http://127.0.0.1:4010/").unwrap())
            .build()
            .unwrap()
            .settings()
            .clone();

        let client = HttpClient::new(&settings, None).unwrap();
        assert_eq!(client.base_uri(), "http://127.0.0.1:4010");
    }

    #[test]
    fn test_default_headers() {
        let client = HttpClient::new(&settings_with(Environment::Sandbox), Some("EAAA")).unwrap();
        let headers = client.default_headers();

        assert_eq!(headers.get("Authorization"), Some(&"Bearer EAAA".to_string()));
        assert_eq!(headers.get("Square-Version"), Some(&"2024-06-04".to_string()));
        assert_eq!(headers.get("Accept"), Some(&"application/json".to_string()));

        let user_agent = headers.get("User-Agent").unwrap();
        assert!(user_agent.starts_with("GiftShop/2.0 | "));
        assert!(user_agent.contains("Square Gift Card SDK v"));
    }

    #[test]
    fn test_no_authorization_header_without_token() {
        let client = HttpClient::new(&ClientSettings::default(), None).unwrap();
        assert!(client.default_headers().get("Authorization").is_none());

        let client = HttpClient::new(&ClientSettings::default(), Some("")).unwrap();
        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_timeout_is_taken_from_settings() {
        let client = HttpClient::new(&settings_with(Environment::Sandbox), None).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_retry_delay_ignores_unrepresentable_retry_after() {
        let response_with = |value: &str| {
            let mut headers = HashMap::new();
            headers.insert("retry-after".to_string(), vec![value.to_string()]);
            HttpResponse::new(429, headers, serde_json::json!({}))
        };
        let fallback = Duration::from_secs(RETRY_WAIT_TIME);

        assert_eq!(
            HttpClient::calculate_retry_delay(&response_with("2.5"), 429),
            Duration::from_millis(2500)
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response_with("1e30"), 429),
            fallback
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response_with("-3"), 429),
            fallback
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response_with("NaN"), 429),
            fallback
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response_with("2.5"), 503),
            fallback
        );
    }

    #[test]
    fn test_parse_body_keeps_raw_5xx_text() {
        assert_eq!(HttpClient::parse_body(200, ""), serde_json::json!({}));
        assert_eq!(
            HttpClient::parse_body(502, "Bad Gateway"),
            serde_json::json!({"raw_body": "Bad Gateway"})
        );
        assert_eq!(HttpClient::parse_body(400, "<html>"), serde_json::json!({}));
    }
}
