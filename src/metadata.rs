use std::future::Future;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, AppResult};

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkPreviewCard/0.1)";

/// Anything that can look up page metadata for a link.
///
/// Implementations return the `data` object of the service response.
pub trait MetadataSource: Send + Sync + 'static {
    fn fetch(&self, web_link: &str) -> impl Future<Output = AppResult<Value>> + Send;
}

/// Client for `GET {endpoint}?q={link}`, optionally routed through a CORS
/// relay prefix.
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    http: ReqwestClient,
    endpoint: Url,
    relay: Option<String>,
}

impl HttpMetadataClient {
    pub fn new(endpoint: Url, relay: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build metadata HTTP client");
                AppError::Internal
            })?;

        Ok(Self {
            http,
            endpoint,
            relay,
        })
    }

    /// Full outbound URL for `web_link`.
    pub fn request_url(&self, web_link: &str) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().append_pair("q", web_link);

        match &self.relay {
            Some(prefix) => format!("{}{}", prefix, urlencoding::encode(url.as_str())),
            None => url.into(),
        }
    }
}

impl MetadataSource for HttpMetadataClient {
    async fn fetch(&self, web_link: &str) -> AppResult<Value> {
        let url = self.request_url(web_link);

        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Metadata service returned {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            AppError::Upstream(format!("Failed to parse metadata response: {e}"))
        })?;

        // A body without a `data` object maps every field to its fallback.
        match body.get("data") {
            Some(data @ Value::Object(_)) => Ok(data.clone()),
            _ => Ok(Value::Object(Default::default())),
        }
    }
}
