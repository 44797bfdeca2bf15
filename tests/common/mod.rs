#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

use tradegenius_console::pipeline::remote::transport::{RawResponse, Transport};

pub const INFY_SUCCESS: &str = r#"{
  "success": true,
  "data": {
    "stock": "INFY", "tradeType": "SWING", "trend": "BULLISH",
    "entry": 1500, "target1": 1550, "target2": 1600, "stoploss": 1470,
    "riskReward": "1:2", "confidence": "HIGH", "analysis": "...", "indicators": "RSI, MACD"
  },
  "positionSize": {"quantity": 66, "totalInvestment": 99000, "riskAmount": 2000, "potentialLoss": 1980}
}"#;

/// Plays back queued replies in order and records every request it was given.
#[derive(Default)]
pub struct ScriptedTransport {
  pub replies: Mutex<VecDeque<Result<RawResponse, String>>>,
  pub calls: Mutex<Vec<(String, Value)>>,
  pub reachable: bool,
  pub gate: Option<Gate>,
}

#[derive(Default)]
pub struct Gate {
  pub entered: Notify,
  pub release: Notify,
}

impl ScriptedTransport {
  pub fn new() -> Self {
    ScriptedTransport::default()
  }

  pub fn gated() -> Self {
    ScriptedTransport { gate: Some(Gate::default()), ..ScriptedTransport::default() }
  }

  pub fn reply(self, status: u16, body: &str) -> Self {
    self.replies.lock().unwrap().push_back(Ok(RawResponse { status, body: body.to_string() }));
    self
  }

  pub fn refuse(self, error: &str) -> Self {
    self.replies.lock().unwrap().push_back(Err(error.to_string()));
    self
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl Transport for ScriptedTransport {
  async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, String> {
    self.calls.lock().unwrap().push((url.to_string(), body.clone()));
    if let Some(gate) = &self.gate {
      gate.entered.notify_one();
      gate.release.notified().await;
    }
    let next = self.replies.lock().unwrap().pop_front();
    next.unwrap_or_else(|| Err("no scripted reply left".to_string()))
  }

  async fn probe(&self, _url: &str) -> bool {
    self.reachable
  }
}
