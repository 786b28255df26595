//! Defines the [`Fetch`] trait through which the manifest and the article
//! sources are retrieved, and the [`FetchError`] it reports. In the browser the
//! implementation is [`HttpFetcher`]; tests substitute a scripted fetcher.

use std::fmt;
use std::future::Future;

/// Retrieves a static text resource by (relative) URL.
pub trait Fetch {
    /// GETs `url` and returns the response body. A response with a
    /// non-success status is an error.
    fn get_text(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<String, FetchError>>;
}

/// Represents a failed [`Fetch::get_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Returned when the request couldn't be sent or no response arrived.
    Network(String),

    /// Returned when the server answered with a non-success status.
    Status(u16),

    /// Returned when the response body couldn't be read as text.
    Body(String),
}

impl fmt::Display for FetchError {
    /// Displays a [`FetchError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "network error: {}", err),
            FetchError::Status(status) => {
                write!(f, "unexpected status: {}", status)
            }
            FetchError::Body(err) => write!(f, "reading body: {}", err),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(target_arch = "wasm32")]
pub use self::http::HttpFetcher;

#[cfg(target_arch = "wasm32")]
mod http {
    use super::{Fetch, FetchError};
    use gloo_net::http::Request;

    /// Fetches resources relative to the current document with the browser's
    /// `fetch`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct HttpFetcher;

    impl Fetch for HttpFetcher {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            let response = Request::get(url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            if !response.ok() {
                return Err(FetchError::Status(response.status()));
            }
            response
                .text()
                .await
                .map_err(|e| FetchError::Body(e.to_string()))
        }
    }
}
