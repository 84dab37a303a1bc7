//! HTTP transport for the Yext Answers query endpoints.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{Result, SearchError};

use super::{SearchFuture, SearchRequest, SearchResponse, SearchTransport};
use super::types::SearchEnvelope;

const UNIVERSAL_PATH: &str = "/v2/accounts/me/answers/query";
const VERTICAL_PATH: &str = "/v2/accounts/me/answers/vertical/query";

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    experience_key: String,
    version: String,
    locale: String,
    api_version: String,
}

impl HttpTransport {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(SearchError::Config(
                "backend endpoint is empty; set [backend].endpoint".to_string(),
            ));
        }
        if config.experience_key.trim().is_empty() {
            return Err(SearchError::Config(
                "backend experience_key is empty; set [backend].experience_key".to_string(),
            ));
        }
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            experience_key: config.experience_key.clone(),
            version: config.version.clone(),
            locale: config.locale.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Full query URL for `request`.
    #[must_use]
    pub fn request_url(&self, request: &SearchRequest) -> String {
        let path = if request.is_universal() {
            UNIVERSAL_PATH
        } else {
            VERTICAL_PATH
        };
        let mut params = vec![
            ("input", request.input.clone()),
            ("experienceKey", self.experience_key.clone()),
            ("api_key", self.api_key.clone()),
            ("v", self.api_version.clone()),
            ("version", self.version.clone()),
            ("locale", self.locale.clone()),
        ];
        if !request.is_universal() {
            params.push(("verticalKey", request.vertical_key.clone()));
            params.push(("offset", request.offset.to_string()));
            if let Some(limit) = request.limit {
                params.push(("limit", limit.to_string()));
            }
        }
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{path}?{query}", self.endpoint)
    }
}

impl SearchTransport for HttpTransport {
    fn search(&self, request: SearchRequest) -> SearchFuture {
        let client = self.client.clone();
        let url = self.request_url(&request);
        Box::pin(fetch(client, url, request))
    }
}

async fn fetch(
    client: reqwest::Client,
    url: String,
    request: SearchRequest,
) -> Result<SearchResponse> {
    debug!(vertical = %request.vertical_key, input = %request.input, "search request");
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "search backend error");
        return Err(SearchError::Backend {
            status: status.as_u16(),
            message,
        });
    }
    let envelope: SearchEnvelope = response.json().await?;
    Ok(envelope.response)
}
