use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::SpiderLogError;
use crate::http::{build_client, failure_details, send_with_retries};

pub const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// Photo search by free-text query.
pub trait PhotoClient: Send + Sync {
    /// URL of the best match, `None` when the search came back empty.
    fn search_photo(&self, query: &str) -> Result<Option<String>, SpiderLogError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Clone)]
pub struct UnsplashHttpClient {
    client: Client,
    access_key: String,
}

impl UnsplashHttpClient {
    pub fn new(access_key: impl Into<String>) -> Result<Self, SpiderLogError> {
        let client = build_client(Duration::from_secs(20))
            .map_err(|err| SpiderLogError::UnsplashHttp(err.to_string()))?;
        Ok(Self {
            client,
            access_key: access_key.into(),
        })
    }
}

impl PhotoClient for UnsplashHttpClient {
    fn search_photo(&self, query: &str) -> Result<Option<String>, SpiderLogError> {
        let authorization = format!("Client-ID {}", self.access_key);
        let response = send_with_retries(|| {
            self.client
                .get(UNSPLASH_SEARCH_URL)
                .query(&[("query", query), ("per_page", "1")])
                .header("Authorization", &authorization)
        })
        .map_err(|err| SpiderLogError::UnsplashHttp(err.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = failure_details(response, "Unsplash request failed");
            return Err(SpiderLogError::UnsplashStatus { status, message });
        }
        let body = response
            .text()
            .map_err(|err| SpiderLogError::UnsplashHttp(err.to_string()))?;
        first_photo_url(&body)
    }
}

pub fn first_photo_url(body: &str) -> Result<Option<String>, SpiderLogError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|err| SpiderLogError::UnsplashHttp(err.to_string()))?;
    Ok(parsed
        .results
        .into_iter()
        .next()
        .map(|result| result.urls.regular))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_regular_url() {
        let body = r#"{"total": 2, "results": [
            {"urls": {"regular": "https://images.unsplash.com/a", "small": "x"}},
            {"urls": {"regular": "https://images.unsplash.com/b"}}
        ]}"#;
        assert_eq!(
            first_photo_url(body).unwrap().as_deref(),
            Some("https://images.unsplash.com/a")
        );
    }

    #[test]
    fn empty_results_are_none() {
        assert_eq!(first_photo_url(r#"{"results": []}"#).unwrap(), None);
        assert_eq!(first_photo_url("{}").unwrap(), None);
    }
}
