use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::controller::console_controllers::ConsoleController;
use crate::app::services::chat_service::ChatForm;
use crate::app::services::dashboard_service::AnalyzeForm;
use crate::app::services::service::Reply;
use crate::app::services::settings_service::SettingsEdit;
use crate::pipeline::format;
use crate::pipeline::render::Diagnostic;
use crate::prefs::endpoints::{EndpointName, QUICK_STOCKS};

fn diagnostic_json(diagnostic: &Diagnostic) -> Value {
  json!({
    "message": diagnostic.message,
    "checklist": diagnostic.checklist,
    "text": diagnostic.text(),
  })
}

fn internal_error(e: anyhow::Error) -> HttpResponse {
  HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
}

fn reply_response<T: Serialize>(reply: Reply<T>) -> HttpResponse {
  match reply {
    Reply::Rendered(view, notice) => HttpResponse::Ok().json(json!({
      "status": "ok",
      "view": view,
      "notice": notice,
    })),
    Reply::Rejected(diagnostic) => HttpResponse::UnprocessableEntity().json(json!({
      "status": "rejected",
      "diagnostic": diagnostic_json(&diagnostic),
    })),
    Reply::Failed(diagnostic, notice) => HttpResponse::Ok().json(json!({
      "status": "failed",
      "diagnostic": diagnostic_json(&diagnostic),
      "notice": notice,
    })),
    Reply::Busy => HttpResponse::Conflict().json(json!({
      "status": "busy",
      "error": "A submission is already in flight",
    })),
  }
}

fn endpoint_name(target: &str) -> Option<EndpointName> {
  match target {
    "analysis" => Some(EndpointName::Analysis),
    "chat" => Some(EndpointName::Chat),
    "admin" => Some(EndpointName::Admin),
    _ => None,
  }
}

pub struct Routes;

impl Routes {

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(Self::health)));
    cfg.service(web::resource("/stocks").route(web::get().to(Self::stocks)));
    cfg.service(web::resource("/charts/symbol/{input}").route(web::get().to(Self::chart_symbol)));
    cfg.service(web::resource("/dashboard").route(web::get().to(Self::dashboard)));
    cfg.service(web::resource("/dashboard/analyze").route(web::post().to(Self::analyze)));
    cfg.service(web::resource("/assistant/{conversation}")
      .route(web::get().to(Self::conversation))
      .route(web::delete().to(Self::clear_conversation)));
    cfg.service(web::resource("/assistant/{conversation}/messages").route(web::post().to(Self::send_message)));
    cfg.service(web::resource("/assistant/{conversation}/quick/{stock}").route(web::post().to(Self::quick_analyze)));
    cfg.service(web::resource("/settings").route(web::get().to(Self::settings)));
    cfg.service(web::resource("/settings/endpoints").route(web::put().to(Self::update_settings)));
    cfg.service(web::resource("/settings/reset").route(web::post().to(Self::reset_settings)));
    cfg.service(web::resource("/settings/probe/{target}").route(web::get().to(Self::probe)));
  }

  async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
      "status": "ok",
      "Info": "Welcome to TradeGenius console.",
      "code": 200,
    }))
  }

  async fn stocks() -> impl Responder {
    HttpResponse::Ok().json(QUICK_STOCKS)
  }

  async fn chart_symbol(input: web::Path<String>) -> impl Responder {
    match format::normalize_chart_symbol(&input) {
      Some(symbol) => HttpResponse::Ok().json(json!({"symbol": symbol})),
      None => HttpResponse::UnprocessableEntity().json(json!({"error": "symbol is required"})),
    }
  }

  async fn dashboard(controller: web::Data<Arc<ConsoleController>>) -> impl Responder {
    match controller.dashboard() {
      Ok(state) => HttpResponse::Ok().json(state),
      Err(e) => internal_error(e),
    }
  }

  async fn analyze(controller: web::Data<Arc<ConsoleController>>, form: web::Json<AnalyzeForm>) -> impl Responder {
    match controller.analyze(form.into_inner()).await {
      Ok(reply) => reply_response(reply),
      Err(e) => internal_error(e),
    }
  }

  async fn conversation(controller: web::Data<Arc<ConsoleController>>, path: web::Path<String>) -> impl Responder {
    match controller.conversation(&path) {
      Ok(conversation) => HttpResponse::Ok().json(conversation),
      Err(e) => internal_error(e),
    }
  }

  async fn clear_conversation(controller: web::Data<Arc<ConsoleController>>, path: web::Path<String>) -> impl Responder {
    match controller.clear_conversation(&path) {
      Ok((conversation, notice)) => HttpResponse::Ok().json(json!({"conversation": conversation, "notice": notice})),
      Err(e) => internal_error(e),
    }
  }

  async fn send_message(controller: web::Data<Arc<ConsoleController>>, path: web::Path<String>, form: web::Json<ChatForm>) -> impl Responder {
    match controller.send_message(&path, form.into_inner()).await {
      Ok(reply) => reply_response(reply),
      Err(e) => internal_error(e),
    }
  }

  async fn quick_analyze(controller: web::Data<Arc<ConsoleController>>, path: web::Path<(String, String)>) -> impl Responder {
    let (conversation, stock) = path.into_inner();
    match controller.quick_analyze(&conversation, &stock).await {
      Ok(reply) => reply_response(reply),
      Err(e) => internal_error(e),
    }
  }

  async fn settings(controller: web::Data<Arc<ConsoleController>>) -> impl Responder {
    match controller.settings() {
      Ok(view) => HttpResponse::Ok().json(view),
      Err(e) => internal_error(e),
    }
  }

  async fn update_settings(controller: web::Data<Arc<ConsoleController>>, edit: web::Json<SettingsEdit>) -> impl Responder {
    match controller.update_settings(edit.into_inner()) {
      Ok((view, notice)) => HttpResponse::Ok().json(json!({"settings": view, "notice": notice})),
      Err(e) => internal_error(e),
    }
  }

  async fn reset_settings(controller: web::Data<Arc<ConsoleController>>) -> impl Responder {
    match controller.reset_settings() {
      Ok((view, notice)) => HttpResponse::Ok().json(json!({"settings": view, "notice": notice})),
      Err(e) => internal_error(e),
    }
  }

  async fn probe(controller: web::Data<Arc<ConsoleController>>, path: web::Path<String>) -> impl Responder {
    let Some(target) = endpoint_name(&path) else {
      return HttpResponse::NotFound().json(json!({"error": format!("Unknown endpoint: {}", path.as_str())}));
    };
    match controller.probe(target).await {
      Ok(view) => HttpResponse::Ok().json(view),
      Err(e) => internal_error(e),
    }
  }

}
