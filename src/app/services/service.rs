use std::sync::Arc;

use crate::pipeline::notice::Notice;
use crate::pipeline::remote::client::RemoteClient;
use crate::pipeline::render::Diagnostic;
use crate::prefs::store::PreferenceStore;

use super::chat_service::ChatService;
use super::dashboard_service::DashboardService;
use super::settings_service::SettingsService;

/// How a submission ended, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
  Rendered(T, Option<Notice>),
  /// Blocked before any network call.
  Rejected(Diagnostic),
  Failed(Diagnostic, Notice),
  /// Another submission for the same target is still in flight.
  Busy,
}

pub struct ConsoleServices {
  pub settings: Arc<SettingsService>,
  pub dashboard: DashboardService,
  pub chat: ChatService,
}

impl ConsoleServices {

  pub fn new(client: RemoteClient, store: Arc<PreferenceStore>) -> Self {
    let settings: Arc<SettingsService> = Arc::new(SettingsService::new(store, client.clone()));
    let dashboard: DashboardService = DashboardService::new(client.clone(), settings.clone());
    let chat: ChatService = ChatService::new(client, settings.clone());
    ConsoleServices { settings, dashboard, chat }
  }
}
