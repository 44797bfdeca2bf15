use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
  pub status: u16,
  pub body: String,
}

impl RawResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Moves one JSON POST to a URL. `Err` carries the transport error text.
#[async_trait]
pub trait Transport : Send + Sync {
  async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, String>;

  /// Reachability check; true only when a 2xx arrives before the probe timeout.
  async fn probe(&self, url: &str) -> bool;
}

pub struct HttpTransport {
  client: Client,
  request_timeout: Duration,
  probe_timeout: Duration,
}

impl HttpTransport {
  pub fn new(request_timeout: Duration, probe_timeout: Duration) -> Self {
    HttpTransport { client: Client::new(), request_timeout, probe_timeout }
  }

  fn json_headers() -> HeaderMap {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, String> {
    log::debug!("POST {} ({}ms timeout)", url, self.request_timeout.as_millis());
    let response: Response = self.client.post(url)
      .headers(Self::json_headers())
      .timeout(self.request_timeout)
      .json(body)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    let status: u16 = response.status().as_u16();
    if !response.status().is_success() {
      // The status alone decides a non-2xx; a truncated body must not turn it into a network error.
      let body: String = response.text().await.unwrap_or_default();
      return Ok(RawResponse { status, body });
    }

    let body: String = response.text().await.map_err(|e| e.to_string())?;
    Ok(RawResponse { status, body })
  }

  async fn probe(&self, url: &str) -> bool {
    match self.client.get(url).timeout(self.probe_timeout).send().await {
      Ok(response) => response.status().is_success(),
      Err(e) => {
        log::error!("API connection check failed for {}: {}", url, e);
        false
      }
    }
  }
}
