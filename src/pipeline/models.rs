use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Price level as the backend sent it. Numbers and text both render as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
  Number(f64),
  Text(String),
}

impl Default for PriceValue {
  fn default() -> Self {
    PriceValue::Text(String::new())
  }
}

impl fmt::Display for PriceValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PriceValue::Number(n) => write!(f, "{}", n),
      PriceValue::Text(text) => write!(f, "{}", text),
    }
  }
}

impl From<f64> for PriceValue {
  fn from(value: f64) -> Self {
    PriceValue::Number(value)
  }
}

/// Explicit `null` on the wire reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured trade recommendation returned by the analysis backend.
/// Every field is optional on the wire; gaps render as blanks or fall back in the projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
  #[serde(deserialize_with = "null_as_default")]
  pub stock: String,
  #[serde(deserialize_with = "null_as_default")]
  pub trade_type: String,
  #[serde(deserialize_with = "null_as_default")]
  pub trend: String,             // BULLISH, BEARISH or NEUTRAL; unknown values still render
  #[serde(deserialize_with = "null_as_default")]
  pub entry: PriceValue,
  #[serde(deserialize_with = "null_as_default")]
  pub target1: PriceValue,
  #[serde(deserialize_with = "null_as_default")]
  pub target2: PriceValue,
  #[serde(deserialize_with = "null_as_default")]
  pub stoploss: PriceValue,
  #[serde(deserialize_with = "null_as_default")]
  pub risk_reward: String,       // e.g. "1:2"
  #[serde(deserialize_with = "null_as_default")]
  pub confidence: String,        // HIGH, MEDIUM or LOW
  #[serde(deserialize_with = "null_as_default")]
  pub analysis: String,
  pub indicators: Option<String>, // comma separated, or "N/A"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSize {
  pub quantity: f64,
  pub total_investment: f64,
  pub risk_amount: f64,
  pub potential_loss: f64,
}

/// Response envelope shared by the analysis and chat endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
  pub success: bool,
  #[serde(default)]
  pub data: Option<Value>,
  #[serde(default)]
  pub position_size: Option<Value>,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPayload {
  pub result: AnalysisResult,
  pub position_size: Option<PositionSize>,
}
