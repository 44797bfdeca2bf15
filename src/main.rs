use actix_web::HttpServer;
use std::env; 

use tradegenius_console::app::config::Config;
use tradegenius_console::app::factory::{AppState, CreateApp};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  if env::var_os("RUST_LOG").is_none() {
    env::set_var("RUST_LOG", "actix_web=debug,debug");
  }
  env_logger::init();

  let config : Config = Config::load();

  // Built once so every worker shares the same preferences, results and conversations.
  let app_state : AppState = AppState::new(&config);

  let server_builder = HttpServer::new(move || {
    let factory: CreateApp = CreateApp::new(app_state.clone());
    factory.build_app().wrap(actix_web::middleware::Logger::default())
  });

  log::info!("TradeGenius console listening on {}:{}", config.host, config.port);
  let server = server_builder.bind((config.host.as_str(), config.port))?;

  server.run().await?;

  Ok(())
}
