use actix_web::{web, App};
use std::sync::Arc;

use crate::app::config::Config;
use crate::app::routes::console_routes::Routes;
use crate::pipeline::remote::client::RemoteClient;
use crate::pipeline::remote::transport::{HttpTransport, Transport};
use crate::prefs::store::PreferenceStore;

use super::controller::console_controllers::ConsoleController;
use super::services::service::ConsoleServices;

#[derive(Clone)]
pub struct AppState {
  pub console_controller: Arc<ConsoleController>
}

impl AppState {

  pub fn new(app_config: &Config) -> Self {
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(app_config.request_timeout, app_config.probe_timeout));
    let store: Arc<PreferenceStore> = Arc::new(PreferenceStore::open(&app_config.preferences_path));
    Self::with_parts(transport, store)
  }

  /// Wires the console around an explicit transport and store.
  pub fn with_parts(transport: Arc<dyn Transport>, store: Arc<PreferenceStore>) -> Self {
    let client : RemoteClient = RemoteClient::new(transport);
    let services : Arc<ConsoleServices> = Arc::new(ConsoleServices::new(client, store));
    let console_controller : Arc<ConsoleController> = Arc::new(ConsoleController::new(services));
    AppState { console_controller }
  }
}

pub struct CreateApp {
  app_state: AppState,
}

impl CreateApp {
  pub fn new(app_state: AppState) -> Self {
    CreateApp { app_state }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.console_controller.clone()))
    .configure(Routes::configure)
  }
}
