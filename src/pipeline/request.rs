use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::pipeline::history::{self, ConversationTurn, HISTORY_LIMIT};
use crate::pipeline::outcome::{Failure, Outcome};
use crate::pipeline::validator::{self, Field, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeMode {
  #[default]
  Swing,
  Intraday,
}

impl TradeMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      TradeMode::Swing => "SWING",
      TradeMode::Intraday => "INTRADAY",
    }
  }
}

impl fmt::Display for TradeMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for TradeMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "swing" => Ok(TradeMode::Swing),
      "intraday" => Ok(TradeMode::Intraday),
      _ => Err(format!("Unknown trade mode: {}", s)),
    }
  }
}

/// Body posted to the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
  pub stock_name: String,
  pub trade_mode: TradeMode,
  pub capital: f64,
  pub risk_percentage: f64,
}

/// Body posted to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
  pub message: String,
  pub conversation_history: Vec<ConversationTurn>,
}

/// Dashboard form fields exactly as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisFields {
  pub stock_name: String,
  pub capital: String,
  pub risk_percentage: String,
  pub trade_mode: TradeMode,
  pub endpoint: String,
}

/// A validated request together with the URL it is bound for.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<T> {
  pub endpoint: String,
  pub body: T,
}

const REQUIRED_RULES: [Rule; 1] = [Rule::Required];
const CAPITAL_RULES: [Rule; 3] = [Rule::Required, Rule::Number, Rule::Positive];
const RISK_RULES: [Rule; 4] = [Rule::Required, Rule::Number, Rule::Positive, Rule::Max(100.0)];
const ENDPOINT_RULES: [Rule; 2] = [Rule::Required, Rule::Url];

fn first_violation(fields: &[Field]) -> Outcome<()> {
  let report = validator::validate_fields(fields);
  match report.first_error() {
    Some(error) => Err(Failure::validation(error)),
    None => Ok(()),
  }
}

fn parsed(value: &str, label: &str) -> Outcome<f64> {
  validator::parse_number(value).ok_or_else(|| Failure::validation(format!("{} must be a number", label)))
}

pub fn build_analysis_request(raw: &RawAnalysisFields) -> Outcome<Submission<AnalysisRequest>> {
  first_violation(&[
    Field::new("stockName", &raw.stock_name, &REQUIRED_RULES),
    Field::new("capital", &raw.capital, &CAPITAL_RULES),
    Field::new("riskPercentage", &raw.risk_percentage, &RISK_RULES),
    Field::new("endpoint", &raw.endpoint, &ENDPOINT_RULES),
  ])?;

  let body = AnalysisRequest {
    stock_name: raw.stock_name.trim().to_string(),
    trade_mode: raw.trade_mode,
    capital: parsed(&raw.capital, "capital")?,
    risk_percentage: parsed(&raw.risk_percentage, "riskPercentage")?,
  };

  Ok(Submission { endpoint: raw.endpoint.trim().to_string(), body })
}

pub fn build_chat_request(message: &str, history: &[ConversationTurn], endpoint: &str) -> Outcome<Submission<ChatRequest>> {
  first_violation(&[
    Field::new("message", message, &REQUIRED_RULES),
    Field::new("endpoint", endpoint, &ENDPOINT_RULES),
  ])?;

  let body = ChatRequest {
    message: message.trim().to_string(),
    conversation_history: history::truncate(history.to_vec(), HISTORY_LIMIT),
  };

  Ok(Submission { endpoint: endpoint.trim().to_string(), body })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::outcome::ErrorKind;

  fn raw(stock: &str, capital: &str, risk: &str) -> RawAnalysisFields {
    RawAnalysisFields {
      stock_name: stock.to_string(),
      capital: capital.to_string(),
      risk_percentage: risk.to_string(),
      trade_mode: TradeMode::Swing,
      endpoint: "http://localhost:3000/api/ai/analyze".to_string(),
    }
  }

  fn rejection(fields: &RawAnalysisFields) -> String {
    let failure = build_analysis_request(fields).unwrap_err();
    assert_eq!(failure.kind, ErrorKind::ValidationError);
    failure.message
  }

  #[test]
  fn valid_fields_build_normalized_request() {
    let submission = build_analysis_request(&raw("  INFY ", "100000", " 2 ")).unwrap();
    assert_eq!(submission.endpoint, "http://localhost:3000/api/ai/analyze");
    assert_eq!(submission.body, AnalysisRequest {
      stock_name: "INFY".to_string(),
      trade_mode: TradeMode::Swing,
      capital: 100000.0,
      risk_percentage: 2.0,
    });
  }

  #[test]
  fn request_serializes_with_wire_names() {
    let submission = build_analysis_request(&raw("INFY", "100000", "2")).unwrap();
    let json = serde_json::to_value(&submission.body).unwrap();
    assert_eq!(json, serde_json::json!({
      "stockName": "INFY", "tradeMode": "SWING", "capital": 100000.0, "riskPercentage": 2.0
    }));
  }

  #[test]
  fn each_bad_field_is_named() {
    assert!(rejection(&raw("   ", "100000", "2")).contains("stockName"));
    assert!(rejection(&raw("INFY", "lots", "2")).contains("capital"));
    assert!(rejection(&raw("INFY", "100000", "two")).contains("riskPercentage"));
    assert!(rejection(&raw("INFY", "-5", "2")).contains("capital"));
    assert!(rejection(&raw("INFY", "100000", "0")).contains("riskPercentage"));
    assert!(rejection(&raw("INFY", "100000", "100.5")).contains("riskPercentage"));
    assert!(build_analysis_request(&raw("INFY", "100000", "100")).is_ok());
  }

  #[test]
  fn endpoint_must_be_present_and_well_formed() {
    let mut fields = raw("INFY", "100000", "2");
    fields.endpoint = " ".to_string();
    assert_eq!(rejection(&fields), "endpoint is required");
    fields.endpoint = "localhost 3000".to_string();
    assert_eq!(rejection(&fields), "endpoint must be a valid URL");
  }

  #[test]
  fn chat_request_rejects_blank_and_trims_history() {
    let endpoint = "http://localhost:3000/api/ai/chat";
    let blank = build_chat_request("  \n ", &[], endpoint).unwrap_err();
    assert_eq!(blank.kind, ErrorKind::ValidationError);

    let history: Vec<ConversationTurn> = (0..25).map(|i| ConversationTurn::user(format!("t{}", i))).collect();
    let submission = build_chat_request(" hello ", &history, endpoint).unwrap();
    assert_eq!(submission.body.message, "hello");
    assert_eq!(submission.body.conversation_history.len(), HISTORY_LIMIT);
    assert_eq!(submission.body.conversation_history[0].content, "t5");
  }

  #[test]
  fn trade_mode_parses_loosely() {
    assert_eq!("intraday".parse::<TradeMode>(), Ok(TradeMode::Intraday));
    assert_eq!(" SWING ".parse::<TradeMode>(), Ok(TradeMode::Swing));
    assert!("scalp".parse::<TradeMode>().is_err());
  }
}
