use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
  /// Local input was missing or malformed. Never reaches the network.
  ValidationError,
  /// Transport failure: refused connection, DNS, timeout or abort.
  NetworkError,
  /// The backend answered with a non-2xx status.
  HttpError,
  /// The backend answered 2xx but reported `success: false`, or sent a body we could not read.
  ApplicationError,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorKind::ValidationError => write!(f, "ValidationError"),
      ErrorKind::NetworkError => write!(f, "NetworkError"),
      ErrorKind::HttpError => write!(f, "HttpError"),
      ErrorKind::ApplicationError => write!(f, "ApplicationError"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct Failure {
  pub kind: ErrorKind,
  pub message: String,
}

impl Failure {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Failure { kind, message: message.into() }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::ValidationError, message)
  }

  pub fn network(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::NetworkError, message)
  }

  pub fn http(status: u16) -> Self {
    Self::new(ErrorKind::HttpError, format!("HTTP error! status: {}", status))
  }

  pub fn application(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::ApplicationError, message)
  }

  pub fn is_validation(&self) -> bool {
    self.kind == ErrorKind::ValidationError
  }
}

/// Normalized result of every pipeline step and remote call.
pub type Outcome<T> = std::result::Result<T, Failure>;
