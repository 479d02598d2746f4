use crate::config::ClusterConfig;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RestClientError {
    #[error("no API server configured")]
    NoServer,

    #[error("failed to build REST client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Minimal REST surface needed to pull documents from an API server
pub trait RestClient {
    /// Issues a single blocking GET for `abs_path` and returns the raw body
    fn get_raw(&self, abs_path: &str, accept: &str) -> Result<Vec<u8>, RestClientError>;
}

/// Builds REST clients on demand, so sources that never talk to the
/// cluster never need a working connection
pub trait ClientFactory {
    fn rest_client(&self) -> Result<Box<dyn RestClient>, RestClientError>;
}

/// `RestClient` backed by a blocking reqwest client
pub struct HttpRestClient {
    client: Client,
    server: String,
    token: Option<String>,
}

impl HttpRestClient {
    pub fn new(config: &ClusterConfig) -> Result<Self, RestClientError> {
        let server = config
            .server
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or(RestClientError::NoServer)?
            .to_string();

        // No configured timeout means none at all, not reqwest's 30s default.
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RestClientError::Build)?;

        Ok(Self {
            client,
            server,
            token: config.token.clone(),
        })
    }
}

impl RestClient for HttpRestClient {
    fn get_raw(&self, abs_path: &str, accept: &str) -> Result<Vec<u8>, RestClientError> {
        let url = format!("{}{}", self.server, abs_path);
        debug!(%url, "issuing GET");

        let mut request = self.client.get(&url).header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| RestClientError::Transport {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RestClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .map_err(|e| RestClientError::Body { url, source: e })?;
        Ok(body.to_vec())
    }
}

/// `ClientFactory` that builds an `HttpRestClient` from cluster settings
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    config: ClusterConfig,
}

impl HttpClientFactory {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for HttpClientFactory {
    fn rest_client(&self) -> Result<Box<dyn RestClient>, RestClientError> {
        Ok(Box::new(HttpRestClient::new(&self.config)?))
    }
}
