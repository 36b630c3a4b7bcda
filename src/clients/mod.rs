//! HTTP client types for Square API communication.
//!
//! This module provides the transport layer shared by the OAuth and Payment
//! Links adapters. It handles request validation, the standard Square headers,
//! timeouts, error-body parsing and opt-in retries.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`SquareApiError`]: One entry of a Square `errors` array
//!
//! # Example
//!
//! ```rust,ignore
//! use square_giftcard::clients::{HttpClient, HttpRequest, HttpMethod};
//!
//! let client = HttpClient::new(config.settings(), Some(config.access_token().as_ref()))?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/v2/online-checkout/payment-links/LINK1")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The default `tries` is 1, meaning no automatic retries, and the adapters
//! in this crate always use the default. A request built with `.tries(n)`:
//!
//! - **429 (Rate Limited)**: Retries using `Retry-After`, or 1 second if absent
//! - **5xx (Server Error)**: Retries with a fixed 1-second delay
//! - **Other errors (4xx)**: Returns immediately without retry

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
    SquareApiError,
};
pub use http_client::{HttpClient, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
