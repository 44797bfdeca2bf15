use chrono::Local;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use anyhow::{anyhow, Error};

use crate::app::services::service::Reply;
use crate::app::services::settings_service::SettingsService;
use crate::pipeline::history::{self, ConversationTurn, Role};
use crate::pipeline::notice::Notice;
use crate::pipeline::outcome::Failure;
use crate::pipeline::remote::client::RemoteClient;
use crate::pipeline::render::{self, Diagnostic, MessageRow};
use crate::pipeline::request;
use crate::prefs::endpoints::EndpointName;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI trading assistant. Ask me about any stock, \
trading strategies, technical indicators, or market analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
  Idle,
  Validating,
  Sending,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
  pub phase: Phase,
  pub status: String,
  pub history: Vec<ConversationTurn>,
  pub transcript: Vec<MessageRow>,
}

impl Conversation {
  fn new() -> Self {
    let welcome: MessageRow = render::project_message(Role::Assistant, WELCOME_MESSAGE, Local::now().naive_local());
    Conversation { phase: Phase::Idle, status: "Ready".to_string(), history: history::clear(), transcript: vec![welcome] }
  }

  fn post(&mut self, role: Role, text: &str) -> MessageRow {
    let row: MessageRow = render::project_message(role, text, Local::now().naive_local());
    self.transcript.push(row.clone());
    row
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
  #[serde(default)]
  pub message: String,
  pub endpoint: Option<String>,
}

/// Rows added to the transcript by one submission, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
  pub rows: Vec<MessageRow>,
  pub status: String,
}

/// Puts the conversation back to `Idle` even when the request future is dropped mid-flight.
struct SendingGuard {
  conversation: Arc<Mutex<Conversation>>,
}

impl Drop for SendingGuard {
  fn drop(&mut self) {
    match self.conversation.lock() {
      Ok(mut conversation) => conversation.phase = Phase::Idle,
      Err(mut poisoned) => poisoned.get_mut().phase = Phase::Idle,
    }
  }
}

pub struct ChatService {
  client: RemoteClient,
  settings: Arc<SettingsService>,
  conversations: Mutex<HashMap<String, Arc<Mutex<Conversation>>>>,
}

fn locked(conversation: &Mutex<Conversation>) -> Result<MutexGuard<'_, Conversation>, Error> {
  conversation.lock().map_err(|e| anyhow!("Conversation state unavailable: {}", e))
}

impl ChatService {
  pub fn new(client: RemoteClient, settings: Arc<SettingsService>) -> Self {
    ChatService { client, settings, conversations: Mutex::new(HashMap::new()) }
  }

  fn conversation(&self, id: &str) -> Result<Arc<Mutex<Conversation>>, Error> {
    let mut conversations = self.conversations.lock().map_err(|e| anyhow!("Conversation table unavailable: {}", e))?;
    let conversation = conversations.entry(id.to_string()).or_insert_with(|| {
      log::info!("Starting conversation {}", id);
      Arc::new(Mutex::new(Conversation::new()))
    });
    Ok(conversation.clone())
  }

  pub fn snapshot(&self, id: &str) -> Result<Conversation, Error> {
    let conversation = self.conversation(id)?;
    let guard = locked(&conversation)?;
    Ok(guard.clone())
  }

  /// Drops everything but the welcome row and forgets the history.
  pub fn clear(&self, id: &str) -> Result<(Conversation, Notice), Error> {
    let conversation = self.conversation(id)?;
    let mut guard = locked(&conversation)?;
    guard.transcript.truncate(1);
    guard.history = history::clear();
    Ok((guard.clone(), Notice::info("Chat cleared")))
  }

  pub async fn quick_analyze(&self, id: &str, stock: &str) -> Result<Reply<Exchange>, Error> {
    let form = ChatForm { message: format!("Analyze {} for swing trading", stock.trim()), endpoint: None };
    self.send(id, form).await
  }

  pub async fn send(&self, id: &str, form: ChatForm) -> Result<Reply<Exchange>, Error> {
    let endpoint: String = match form.endpoint.as_deref() {
      Some(endpoint) => {
        self.settings.remember(EndpointName::Chat, endpoint)?;
        endpoint.to_string()
      }
      None => self.settings.endpoint(EndpointName::Chat)?,
    };

    let conversation = self.conversation(id)?;

    let (submission, user_row) = {
      let mut guard = locked(&conversation)?;
      if guard.phase != Phase::Idle {
        log::warn!("Conversation {} already has a message in flight", id);
        return Ok(Reply::Busy);
      }

      guard.phase = Phase::Validating;
      let submission = match request::build_chat_request(&form.message, &guard.history, &endpoint) {
        Ok(submission) => submission,
        Err(failure) => {
          guard.phase = Phase::Idle;
          return Ok(Reply::Rejected(render::project_error(&failure)));
        }
      };

      let user_row: MessageRow = guard.post(Role::User, &submission.body.message);
      guard.phase = Phase::Sending;
      guard.status = "Sending...".to_string();
      (submission, user_row)
    };

    let _sending = SendingGuard { conversation: conversation.clone() };
    let outcome: Result<String, Failure> = self.client.chat(&submission).await;

    let mut guard = locked(&conversation)?;
    let reply: Reply<Exchange> = match outcome {
      Ok(answer) => {
        let ai_row: MessageRow = guard.post(Role::Assistant, &answer);
        let previous: Vec<ConversationTurn> = std::mem::take(&mut guard.history);
        guard.history = history::append(previous, ConversationTurn::user(submission.body.message.clone()), ConversationTurn::assistant(answer));
        guard.status = "Online".to_string();
        Reply::Rendered(Exchange { rows: vec![user_row, ai_row], status: guard.status.clone() }, None)
      }
      Err(failure) => {
        log::error!("Chat error: {}", failure);
        let diagnostic: Diagnostic = render::project_error(&failure);
        guard.post(Role::Assistant, &format!("❌ {}", diagnostic.text()));
        guard.status = "Error".to_string();
        Reply::Failed(diagnostic, Notice::error(failure.message))
      }
    };
    drop(guard);

    Ok(reply)
  }
}
