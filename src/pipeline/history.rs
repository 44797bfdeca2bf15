use serde::{Serialize, Deserialize};
use std::fmt;

/// Most recent turns threaded into each chat request.
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::User => write!(f, "user"),
      Role::Assistant => write!(f, "assistant"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
  pub role: Role,
  pub content: String,
}

impl ConversationTurn {
  pub fn user(content: impl Into<String>) -> Self {
    ConversationTurn { role: Role::User, content: content.into() }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    ConversationTurn { role: Role::Assistant, content: content.into() }
  }
}

/// Keeps the last `limit` turns, dropping the oldest first.
pub fn truncate(mut history: Vec<ConversationTurn>, limit: usize) -> Vec<ConversationTurn> {
  if history.len() > limit {
    let excess: usize = history.len() - limit;
    history.drain(..excess);
  }
  history
}

/// Records one completed exchange: user turn, then assistant turn, then trims to `HISTORY_LIMIT`.
pub fn append(mut history: Vec<ConversationTurn>, user: ConversationTurn, assistant: ConversationTurn) -> Vec<ConversationTurn> {
  history.push(user);
  history.push(assistant);
  truncate(history, HISTORY_LIMIT)
}

pub fn clear() -> Vec<ConversationTurn> {
  Vec::new()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn filled(n: usize) -> Vec<ConversationTurn> {
    (0..n).map(|i| if i % 2 == 0 {
      ConversationTurn::user(format!("q{}", i))
    } else {
      ConversationTurn::assistant(format!("a{}", i))
    }).collect()
  }

  #[test]
  fn append_grows_until_limit() {
    for n in (0..=18).step_by(2) {
      let next = append(filled(n), ConversationTurn::user("u"), ConversationTurn::assistant("a"));
      assert_eq!(next.len(), n + 2);
      assert_eq!(next[..n], filled(n)[..]);
      assert_eq!(next[n], ConversationTurn::user("u"));
      assert_eq!(next[n + 1], ConversationTurn::assistant("a"));
    }
  }

  #[test]
  fn append_drops_oldest_past_limit() {
    for n in [19usize, 20] {
      let before = filled(n);
      let next = append(before.clone(), ConversationTurn::user("u"), ConversationTurn::assistant("a"));
      let dropped = n + 2 - HISTORY_LIMIT;
      assert_eq!(next.len(), HISTORY_LIMIT);
      assert_eq!(next[..HISTORY_LIMIT - 2], before[dropped..]);
      assert_eq!(next[HISTORY_LIMIT - 2], ConversationTurn::user("u"));
      assert_eq!(next[HISTORY_LIMIT - 1], ConversationTurn::assistant("a"));
    }
  }

  #[test]
  fn trimming_once_matches_trimming_every_step() {
    let mut stepwise: Vec<ConversationTurn> = Vec::new();
    let mut untrimmed: Vec<ConversationTurn> = Vec::new();
    for i in 0..30 {
      let u = ConversationTurn::user(format!("u{}", i));
      let a = ConversationTurn::assistant(format!("a{}", i));
      stepwise = append(stepwise, u.clone(), a.clone());
      untrimmed.push(u);
      untrimmed.push(a);
    }
    assert_eq!(stepwise, truncate(untrimmed, HISTORY_LIMIT));
  }

  #[test]
  fn truncate_keeps_exactly_limit() {
    assert_eq!(truncate(filled(25), HISTORY_LIMIT).len(), 20);
    assert_eq!(truncate(filled(20), HISTORY_LIMIT), filled(20));
    assert_eq!(truncate(filled(3), HISTORY_LIMIT).len(), 3);
    assert!(clear().is_empty());
  }

  #[test]
  fn roles_serialize_lowercase() {
    let json = serde_json::to_string(&ConversationTurn::assistant("hi")).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
  }
}
