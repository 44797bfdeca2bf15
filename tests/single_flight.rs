mod common;

use std::sync::Arc;

use common::{ScriptedTransport, INFY_SUCCESS};
use tradegenius_console::app::services::chat_service::{ChatForm, Phase};
use tradegenius_console::app::services::dashboard_service::AnalyzeForm;
use tradegenius_console::app::services::service::{ConsoleServices, Reply};
use tradegenius_console::pipeline::remote::client::RemoteClient;
use tradegenius_console::prefs::store::PreferenceStore;

fn form(message: &str) -> ChatForm {
  ChatForm { message: message.to_string(), endpoint: None }
}

#[tokio::test]
async fn second_submission_while_sending_is_refused() {
  let transport = Arc::new(ScriptedTransport::gated().reply(200, r#"{"success": true, "message": "done"}"#));
  let services = ConsoleServices::new(RemoteClient::new(transport.clone()), Arc::new(PreferenceStore::in_memory()));
  let gate = transport.gate.as_ref().unwrap();

  let (first, second) = tokio::join!(
    services.chat.send("desk", form("first question")),
    async {
      gate.entered.notified().await;
      let snapshot = services.chat.snapshot("desk").unwrap();
      assert_eq!(snapshot.phase, Phase::Sending);
      assert_eq!(snapshot.status, "Sending...");
      let second = services.chat.send("desk", form("second question")).await;
      gate.release.notify_one();
      second
    }
  );

  assert_eq!(second.unwrap(), Reply::Busy);
  match first.unwrap() {
    Reply::Rendered(exchange, _) => assert_eq!(exchange.rows.len(), 2),
    other => panic!("expected a rendered exchange, got {:?}", other),
  }
  assert_eq!(transport.call_count(), 1);

  let after = services.chat.snapshot("desk").unwrap();
  assert_eq!(after.phase, Phase::Idle);
  assert_eq!(after.history.len(), 2);
}

#[tokio::test]
async fn other_conversations_are_not_blocked() {
  let transport = Arc::new(ScriptedTransport::gated()
    .reply(200, r#"{"success": true, "message": "one"}"#)
    .reply(200, r#"{"success": true, "message": "two"}"#));
  let services = ConsoleServices::new(RemoteClient::new(transport.clone()), Arc::new(PreferenceStore::in_memory()));
  let gate = transport.gate.as_ref().unwrap();

  let (first, second) = tokio::join!(
    services.chat.send("left", form("q1")),
    async {
      gate.entered.notified().await;
      let (second, _) = tokio::join!(
        services.chat.send("right", form("q2")),
        async {
          gate.entered.notified().await;
          gate.release.notify_waiters();
        }
      );
      second
    }
  );

  assert!(matches!(first.unwrap(), Reply::Rendered(..)));
  assert!(matches!(second.unwrap(), Reply::Rendered(..)));
}

#[tokio::test]
async fn dropped_submission_releases_conversation() {
  let transport = Arc::new(ScriptedTransport::gated().reply(200, r#"{"success": true, "message": "late"}"#));
  let services = ConsoleServices::new(RemoteClient::new(transport.clone()), Arc::new(PreferenceStore::in_memory()));
  let gate = transport.gate.as_ref().unwrap();

  tokio::select! {
    _ = services.chat.send("desk", form("abandoned")) => panic!("submission should not finish"),
    _ = gate.entered.notified() => {}
  }

  let snapshot = services.chat.snapshot("desk").unwrap();
  assert_eq!(snapshot.phase, Phase::Idle);
  assert!(snapshot.history.is_empty());
}

fn infy_form() -> AnalyzeForm {
  AnalyzeForm { stock_name: "INFY".to_string(), ..AnalyzeForm::default() }
}

#[tokio::test]
async fn second_analysis_while_pending_is_refused() {
  let transport = Arc::new(ScriptedTransport::gated().reply(200, INFY_SUCCESS));
  let services = ConsoleServices::new(RemoteClient::new(transport.clone()), Arc::new(PreferenceStore::in_memory()));
  let gate = transport.gate.as_ref().unwrap();

  let (first, second) = tokio::join!(
    services.dashboard.analyze(infy_form()),
    async {
      gate.entered.notified().await;
      assert!(services.dashboard.is_analyzing());
      let second = services.dashboard.analyze(AnalyzeForm { stock_name: "TCS".to_string(), ..AnalyzeForm::default() }).await;
      gate.release.notify_one();
      second
    }
  );

  assert!(matches!(second.unwrap(), Reply::Busy));
  assert!(matches!(first.unwrap(), Reply::Rendered(..)));
  assert_eq!(transport.call_count(), 1);
  assert!(!services.dashboard.is_analyzing());
  assert_eq!(services.dashboard.last_view().unwrap().unwrap().levels.entry.to_string(), "1500");
}

#[tokio::test]
async fn dropped_analysis_releases_dashboard() {
  let transport = Arc::new(ScriptedTransport::gated()
    .reply(200, INFY_SUCCESS)
    .reply(200, INFY_SUCCESS));
  let services = ConsoleServices::new(RemoteClient::new(transport.clone()), Arc::new(PreferenceStore::in_memory()));
  let gate = transport.gate.as_ref().unwrap();

  tokio::select! {
    _ = services.dashboard.analyze(infy_form()) => panic!("analysis should not finish"),
    _ = gate.entered.notified() => {}
  }
  assert!(!services.dashboard.is_analyzing());
  assert!(services.dashboard.last_view().unwrap().is_none());

  let (again, _) = tokio::join!(
    services.dashboard.analyze(infy_form()),
    async {
      gate.entered.notified().await;
      gate.release.notify_one();
    }
  );
  assert!(matches!(again.unwrap(), Reply::Rendered(..)));
}
