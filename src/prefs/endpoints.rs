use serde::{Serialize, Deserialize};

use crate::pipeline::request::TradeMode;
use crate::prefs::store::PreferenceStore;

pub const ENDPOINTS_KEY: &str = "endpoints";
pub const DEFAULTS_KEY: &str = "defaults";

pub const QUICK_STOCKS: [&str; 8] = ["RELIANCE", "TCS", "INFY", "HDFCBANK", "ICICIBANK", "SBIN", "ITC", "TATASTEEL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointName {
  Analysis,
  Chat,
  Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
  pub analysis: String,
  pub chat: String,
  pub admin: String,
}

impl Default for EndpointConfig {
  fn default() -> Self {
    EndpointConfig {
      analysis: "http://localhost:3000/api/ai/analyze".to_string(),
      chat: "http://localhost:3000/api/ai/chat".to_string(),
      admin: "http://localhost:3000/api/admin/analytics".to_string(),
    }
  }
}

/// Any subset of endpoints, as saved by an older session or sent by an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
  pub analysis: Option<String>,
  pub chat: Option<String>,
  pub admin: Option<String>,
}

impl EndpointConfig {
  pub fn get(&self, name: EndpointName) -> &str {
    match name {
      EndpointName::Analysis => &self.analysis,
      EndpointName::Chat => &self.chat,
      EndpointName::Admin => &self.admin,
    }
  }

  pub fn merged(mut self, overrides: EndpointOverrides) -> Self {
    if let Some(analysis) = overrides.analysis {
      self.analysis = analysis;
    }
    if let Some(chat) = overrides.chat {
      self.chat = chat;
    }
    if let Some(admin) = overrides.admin {
      self.admin = admin;
    }
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingDefaults {
  pub capital: f64,
  pub risk_percent: f64,
  pub trade_mode: TradeMode,
}

impl Default for TradingDefaults {
  fn default() -> Self {
    TradingDefaults { capital: 100000.0, risk_percent: 2.0, trade_mode: TradeMode::Swing }
  }
}

/// Saved endpoints win over the built-in ones, field by field.
pub fn load_endpoints(store: &PreferenceStore) -> EndpointConfig {
  let saved: EndpointOverrides = store.get(ENDPOINTS_KEY, EndpointOverrides::default());
  EndpointConfig::default().merged(saved)
}

pub fn load_defaults(store: &PreferenceStore) -> TradingDefaults {
  store.get(DEFAULTS_KEY, TradingDefaults::default())
}

pub fn save(store: &PreferenceStore, endpoints: &EndpointConfig, defaults: &TradingDefaults) -> bool {
  let endpoints_saved: bool = store.set(ENDPOINTS_KEY, endpoints);
  let defaults_saved: bool = store.set(DEFAULTS_KEY, defaults);
  endpoints_saved && defaults_saved
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_store_gives_built_in_endpoints() {
    let store = PreferenceStore::in_memory();
    assert_eq!(load_endpoints(&store), EndpointConfig::default());
    assert_eq!(load_defaults(&store), TradingDefaults::default());
  }

  #[test]
  fn partial_saved_endpoints_merge_over_defaults() {
    let store = PreferenceStore::in_memory();
    store.set(ENDPOINTS_KEY, &serde_json::json!({"chat": "http://10.0.0.5:3000/api/ai/chat"}));
    let endpoints = load_endpoints(&store);
    assert_eq!(endpoints.chat, "http://10.0.0.5:3000/api/ai/chat");
    assert_eq!(endpoints.analysis, EndpointConfig::default().analysis);
    assert_eq!(endpoints.get(EndpointName::Admin), "http://localhost:3000/api/admin/analytics");
  }

  #[test]
  fn save_round_trips_through_store() {
    let store = PreferenceStore::in_memory();
    let endpoints = EndpointConfig { analysis: "http://a".to_string(), ..EndpointConfig::default() };
    let defaults = TradingDefaults { capital: 250000.0, risk_percent: 1.5, trade_mode: TradeMode::Intraday };
    assert!(save(&store, &endpoints, &defaults));
    assert_eq!(load_endpoints(&store), endpoints);
    assert_eq!(load_defaults(&store), defaults);
  }
}
