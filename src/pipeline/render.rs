use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

use crate::pipeline::format::{format_inr, format_number, time_only};
use crate::pipeline::history::Role;
use crate::pipeline::models::{AnalysisResult, PositionSize, PriceValue};
use crate::pipeline::outcome::Failure;

pub const NO_POSITION_PLACEHOLDER: &str = "Position size calculation not available";
pub const TROUBLESHOOTING: [&str; 3] = [
  "Backend server is running",
  "API endpoint URL is correct",
  "OpenAI API key is configured",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
  pub text: String,
  pub class: String,
}

impl Badge {
  fn new(text: &str, class: &str) -> Self {
    Badge { text: text.to_string(), class: format!("badge-{}", class) }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
  pub entry: PriceValue,
  pub target1: PriceValue,
  pub target2: PriceValue,
  pub stoploss: PriceValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRow {
  pub label: String,
  pub value: String,
  pub value_class: Option<String>,
  pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
  pub label: String,
  pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcCell {
  pub label: String,
  pub value: String,
  pub danger: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Calculator {
  Available { cells: Vec<CalcCell> },
  Unavailable { placeholder: String },
}

/// Everything the dashboard result panel shows for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
  pub stock_name: String,
  pub trade_badge: Badge,
  pub trend_badge: Badge,
  pub levels: PriceLevels,
  pub trade_table: Vec<TradeRow>,
  pub confidence: Confidence,
  pub analysis: String,
  pub indicator_tags: Vec<String>,
  pub calculator: Calculator,
  pub rendered_at: Option<String>,
}

impl DashboardView {
  pub fn stamped(mut self, at: String) -> Self {
    self.rendered_at = Some(at);
    self
  }
}

pub fn trend_class(trend: &str) -> &'static str {
  match trend {
    "BULLISH" => "success",
    "BEARISH" => "danger",
    _ => "warning",
  }
}

pub fn trade_class(trade_type: &str) -> &'static str {
  if trade_type == "SWING" { "success" } else { "info" }
}

pub fn confidence_percent(confidence: &str) -> u8 {
  match confidence {
    "HIGH" => 85,
    "MEDIUM" => 60,
    "LOW" => 35,
    _ => 50,
  }
}

pub fn indicator_tags(indicators: Option<&str>) -> Vec<String> {
  match indicators {
    None | Some("N/A") => Vec::new(),
    Some(list) => list.split(',').map(|tag| tag.trim().to_string()).collect(),
  }
}

fn trade_table(result: &AnalysisResult) -> Vec<TradeRow> {
  let row = |label: &str, value: String, class: Option<&str>, note: &str| TradeRow {
    label: label.to_string(),
    value,
    value_class: class.map(|c| c.to_string()),
    note: note.to_string(),
  };

  vec![
    row("Risk:Reward Ratio", result.risk_reward.clone(), Some("badge-success"), "Potential reward vs risk"),
    row("Entry Price", result.entry.to_string(), None, "Recommended buy price"),
    row("Target 1", result.target1.to_string(), Some("text-success"), "First profit booking level"),
    row("Target 2", result.target2.to_string(), Some("text-success"), "Maximum profit target"),
    row("Stop Loss", result.stoploss.to_string(), Some("text-danger"), "Maximum loss limit"),
  ]
}

fn calculator(position_size: Option<&PositionSize>) -> Calculator {
  match position_size {
    Some(size) => Calculator::Available {
      cells: vec![
        CalcCell { label: "Quantity".to_string(), value: format_number(size.quantity), danger: false },
        CalcCell { label: "Investment".to_string(), value: format_inr(size.total_investment), danger: false },
        CalcCell { label: "Risk Amount".to_string(), value: format_inr(size.risk_amount), danger: false },
        CalcCell { label: "Max Loss".to_string(), value: format_inr(size.potential_loss), danger: true },
      ],
    },
    None => Calculator::Unavailable { placeholder: NO_POSITION_PLACEHOLDER.to_string() },
  }
}

/// Maps a backend result onto the dashboard panel. Pure; the caller stamps the render time.
pub fn project(result: &AnalysisResult, position_size: Option<&PositionSize>) -> DashboardView {
  DashboardView {
    stock_name: result.stock.clone(),
    trade_badge: Badge::new(&result.trade_type, trade_class(&result.trade_type)),
    trend_badge: Badge::new(&result.trend, trend_class(&result.trend)),
    levels: PriceLevels {
      entry: result.entry.clone(),
      target1: result.target1.clone(),
      target2: result.target2.clone(),
      stoploss: result.stoploss.clone(),
    },
    trade_table: trade_table(result),
    confidence: Confidence {
      label: result.confidence.clone(),
      percent: confidence_percent(&result.confidence),
    },
    analysis: result.analysis.clone(),
    indicator_tags: indicator_tags(result.indicators.as_deref()),
    calculator: calculator(position_size),
    rendered_at: None,
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub message: String,
  pub checklist: Vec<String>,
}

impl Diagnostic {
  /// Single block of text: error line, then the numbered checklist when there is one.
  pub fn text(&self) -> String {
    if self.checklist.is_empty() {
      return self.message.clone();
    }
    let items: Vec<String> = self.checklist.iter().enumerate()
      .map(|(i, item)| format!("{}. {}", i + 1, item))
      .collect();
    format!("{}\n\nPlease check:\n{}", self.message, items.join("\n"))
  }
}

/// Validation problems are the user's to fix, so they skip the backend checklist.
pub fn project_error(failure: &Failure) -> Diagnostic {
  let checklist: Vec<String> = if failure.is_validation() {
    Vec::new()
  } else {
    TROUBLESHOOTING.iter().map(|item| item.to_string()).collect()
  };
  Diagnostic { message: format!("Error: {}", failure.message), checklist }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRow {
  pub role: Role,
  pub avatar: String,
  pub body: String,
  pub time: String,
}

fn escape_html(text: &str) -> String {
  let mut escaped: String = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

pub fn project_message(role: Role, text: &str, at: NaiveDateTime) -> MessageRow {
  let avatar: &str = match role {
    Role::Assistant => "robot",
    Role::User => "user",
  };
  MessageRow {
    role,
    avatar: avatar.to_string(),
    body: escape_html(text).replace("\r\n", "\n").replace('\n', "<br>"),
    time: time_only(at),
  }
}
