use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::pipeline::models::{AnalysisPayload, AnalysisResult, Envelope, PositionSize};
use crate::pipeline::outcome::{Failure, Outcome};
use crate::pipeline::remote::transport::{RawResponse, Transport};
use crate::pipeline::request::{AnalysisRequest, ChatRequest, Submission};

pub const ANALYSIS_FALLBACK_ERROR: &str = "Analysis failed";
pub const CHAT_FALLBACK_ERROR: &str = "Chat failed";

/// Sends submissions to the backend exactly once and folds every way a call can go wrong into a `Failure`.
#[derive(Clone)]
pub struct RemoteClient {
  transport: Arc<dyn Transport>,
}

impl RemoteClient {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    RemoteClient { transport }
  }

  pub async fn submit<B: Serialize>(&self, endpoint: &str, body: &B, fallback: &str) -> Outcome<Envelope> {
    let payload: Value = serde_json::to_value(body)
      .map_err(|e| Failure::validation(format!("Cannot encode request: {}", e)))?;

    let raw: RawResponse = match self.transport.post_json(endpoint, &payload).await {
      Ok(raw) => raw,
      Err(e) => {
        log::error!("Request to {} failed: {}", endpoint, e);
        return Err(Failure::network(e));
      }
    };

    if !raw.is_success() {
      log::error!("Request to {} returned status {}", endpoint, raw.status);
      return Err(Failure::http(raw.status));
    }

    let envelope: Envelope = serde_json::from_str(&raw.body).map_err(|e| {
      log::error!("JSON decoding error: {}. Response: {:?}", e, raw.body);
      Failure::application(format!("Invalid response from server: {}", e))
    })?;

    if !envelope.success {
      let message: String = envelope.error.clone().unwrap_or_else(|| fallback.to_string());
      log::warn!("Backend at {} reported failure: {}", endpoint, message);
      return Err(Failure::application(message));
    }

    Ok(envelope)
  }

  pub async fn analyze(&self, submission: &Submission<AnalysisRequest>) -> Outcome<AnalysisPayload> {
    let envelope: Envelope = self.submit(&submission.endpoint, &submission.body, ANALYSIS_FALLBACK_ERROR).await?;

    let data: Value = envelope.data.ok_or_else(|| Failure::application("Response did not include analysis data"))?;
    let result: AnalysisResult = serde_json::from_value(data)
      .map_err(|e| Failure::application(format!("Invalid analysis data: {}", e)))?;

    let position_size: Option<PositionSize> = match envelope.position_size {
      Some(value) => match serde_json::from_value(value) {
        Ok(size) => Some(size),
        Err(e) => {
          log::warn!("Ignoring unreadable position size for {}: {}", result.stock, e);
          None
        }
      },
      None => None,
    };

    Ok(AnalysisPayload { result, position_size })
  }

  pub async fn chat(&self, submission: &Submission<ChatRequest>) -> Outcome<String> {
    let envelope: Envelope = self.submit(&submission.endpoint, &submission.body, CHAT_FALLBACK_ERROR).await?;
    match envelope.message {
      Some(message) if !message.trim().is_empty() => Ok(message),
      _ => {
        log::warn!("Backend at {} reported success without a reply", submission.endpoint);
        Err(Failure::application(CHAT_FALLBACK_ERROR))
      }
    }
  }

  pub async fn probe(&self, url: &str) -> bool {
    self.transport.probe(url).await
  }
}
