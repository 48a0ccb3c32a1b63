use reqwest::Url;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid resource path '{path}': {reason}")]
    InvalidUrl { path: String, reason: String },

    #[error("request for {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
}

/// Fetches the site's static text resources (dictionaries, partials).
///
/// Paths are resolved against the site base URL. Responses are requested with
/// `Cache-Control: no-cache` so an edited dictionary shows up on the next switch.
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl ResourceFetcher {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// GET a resource body as text. Non-2xx statuses are errors.
    pub async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}
