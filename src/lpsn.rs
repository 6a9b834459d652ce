use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::LpsnError;

/// One GET per call. Non-success statuses are errors.
pub trait PageFetcher {
    fn get(&self, url: &str) -> Result<String, LpsnError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn get(&self, url: &str) -> Result<String, LpsnError> {
        (**self).get(url)
    }
}

#[derive(Clone)]
pub struct LpsnHttpClient {
    client: Client,
}

impl LpsnHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, LpsnError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("lpsn-genus/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| LpsnError::LpsnHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| LpsnError::LpsnHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl PageFetcher for LpsnHttpClient {
    fn get(&self, url: &str) -> Result<String, LpsnError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| LpsnError::LpsnHttp(err.to_string()))?;
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        response
            .text()
            .map_err(|err| LpsnError::LpsnHttp(err.to_string()))
    }
}

/// Error pages are whole HTML documents; only the reason phrase is kept.
fn status_error(status: StatusCode) -> LpsnError {
    LpsnError::LpsnStatus {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("LPSN request failed")
            .to_string(),
    }
}
