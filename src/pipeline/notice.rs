use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
  Success,
  Error,
  Warning,
  Info,
}

impl NoticeLevel {
  pub fn icon(&self) -> &'static str {
    match self {
      NoticeLevel::Success => "check-circle",
      NoticeLevel::Error => "exclamation-circle",
      NoticeLevel::Warning => "exclamation-triangle",
      NoticeLevel::Info => "info-circle",
    }
  }
}

/// Short-lived toast shown alongside a response. Only the newest one is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub level: NoticeLevel,
  pub icon: String,
  pub message: String,
  pub dismiss_after_ms: u64,
}

impl Notice {
  pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
    Notice { level, icon: level.icon().to_string(), message: message.into(), dismiss_after_ms: 5000 }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Success, message)
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Error, message)
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Info, message)
  }
}
