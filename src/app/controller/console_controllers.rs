use std::sync::Arc;
use anyhow::Error;
use serde::Serialize;

use crate::app::services::chat_service::{ChatForm, Conversation, Exchange};
use crate::app::services::dashboard_service::AnalyzeForm;
use crate::app::services::service::{ConsoleServices, Reply};
use crate::app::services::settings_service::{ProbeView, SettingsEdit, SettingsView};
use crate::pipeline::notice::Notice;
use crate::pipeline::render::DashboardView;
use crate::prefs::endpoints::{EndpointName, TradingDefaults};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
  pub view: Option<DashboardView>,
  pub analyzing: bool,
  pub defaults: TradingDefaults,
  pub endpoint: String,
}

pub struct ConsoleController {
  services : Arc<ConsoleServices>
}

impl ConsoleController {
  pub fn new(services: Arc<ConsoleServices>) -> Self {
    ConsoleController { services }
  }

  fn logged<T>(context: &str, result: Result<T, Error>) -> Result<T, Error> {
    if let Err(e) = &result {
      log::error!("{} failed with error: {}", context, e);
    }
    result
  }

  fn dashboard_state(&self) -> Result<DashboardState, Error> {
    Ok(DashboardState {
      view: self.services.dashboard.last_view()?,
      analyzing: self.services.dashboard.is_analyzing(),
      defaults: self.services.settings.defaults()?,
      endpoint: self.services.settings.endpoint(EndpointName::Analysis)?,
    })
  }

  pub fn dashboard(&self) -> Result<DashboardState, Error> {
    Self::logged("Loading dashboard", self.dashboard_state())
  }

  pub async fn analyze(&self, form: AnalyzeForm) -> Result<Reply<DashboardView>, Error> {
    Self::logged("Stock analysis", self.services.dashboard.analyze(form).await)
  }

  pub async fn send_message(&self, conversation: &str, form: ChatForm) -> Result<Reply<Exchange>, Error> {
    Self::logged("Sending chat message", self.services.chat.send(conversation, form).await)
  }

  pub async fn quick_analyze(&self, conversation: &str, stock: &str) -> Result<Reply<Exchange>, Error> {
    Self::logged("Quick analysis", self.services.chat.quick_analyze(conversation, stock).await)
  }

  pub fn conversation(&self, conversation: &str) -> Result<Conversation, Error> {
    Self::logged("Loading conversation", self.services.chat.snapshot(conversation))
  }

  pub fn clear_conversation(&self, conversation: &str) -> Result<(Conversation, Notice), Error> {
    Self::logged("Clearing conversation", self.services.chat.clear(conversation))
  }

  pub fn settings(&self) -> Result<SettingsView, Error> {
    Self::logged("Loading settings", self.services.settings.view())
  }

  pub fn update_settings(&self, edit: SettingsEdit) -> Result<(SettingsView, Notice), Error> {
    Self::logged("Saving settings", self.services.settings.update(edit))
  }

  pub fn reset_settings(&self) -> Result<(SettingsView, Notice), Error> {
    Self::logged("Resetting settings", self.services.settings.reset())
  }

  pub async fn probe(&self, target: EndpointName) -> Result<ProbeView, Error> {
    Self::logged("Connection check", self.services.settings.probe(target).await)
  }
}
