use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use anyhow::{anyhow, Error};

use crate::app::services::service::Reply;
use crate::app::services::settings_service::SettingsService;
use crate::pipeline::format;
use crate::pipeline::models::AnalysisPayload;
use crate::pipeline::notice::Notice;
use crate::pipeline::outcome::Failure;
use crate::pipeline::remote::client::RemoteClient;
use crate::pipeline::render::{self, DashboardView};
use crate::pipeline::request::{self, RawAnalysisFields, TradeMode};
use crate::prefs::endpoints::{EndpointName, TradingDefaults};

/// Dashboard form as posted. Omitted fields fall back to the saved trading defaults and endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeForm {
  #[serde(default)]
  pub stock_name: String,
  pub capital: Option<Value>,
  pub risk_percentage: Option<Value>,
  pub trade_mode: Option<String>,
  pub endpoint: Option<String>,
}

fn field_text(value: Option<&Value>, default: f64) -> String {
  match value {
    None | Some(Value::Null) => default.to_string(),
    Some(Value::String(text)) => text.clone(),
    Some(other) => other.to_string(),
  }
}

/// Clears the in-flight flag when the analysis finishes or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).ok()?;
    Some(InFlight(flag))
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

pub struct DashboardService {
  client: RemoteClient,
  settings: Arc<SettingsService>,
  last_view: Mutex<Option<DashboardView>>,
  in_flight: AtomicBool,
}

impl DashboardService {
  pub fn new(client: RemoteClient, settings: Arc<SettingsService>) -> Self {
    DashboardService { client, settings, last_view: Mutex::new(None), in_flight: AtomicBool::new(false) }
  }

  pub fn last_view(&self) -> Result<Option<DashboardView>, Error> {
    let guard = self.last_view.lock().map_err(|e| anyhow!("Dashboard state unavailable: {}", e))?;
    Ok(guard.clone())
  }

  fn raw_fields(&self, form: &AnalyzeForm) -> Result<Result<RawAnalysisFields, Failure>, Error> {
    let defaults: TradingDefaults = self.settings.defaults()?;

    let trade_mode: TradeMode = match form.trade_mode.as_deref() {
      Some(mode) => match mode.parse::<TradeMode>() {
        Ok(mode) => mode,
        Err(_) => return Ok(Err(Failure::validation("tradeMode must be SWING or INTRADAY"))),
      },
      None => defaults.trade_mode,
    };

    let endpoint: String = match form.endpoint.as_deref() {
      Some(endpoint) => {
        self.settings.remember(EndpointName::Analysis, endpoint)?;
        endpoint.to_string()
      }
      None => self.settings.endpoint(EndpointName::Analysis)?,
    };

    Ok(Ok(RawAnalysisFields {
      stock_name: form.stock_name.clone(),
      capital: field_text(form.capital.as_ref(), defaults.capital),
      risk_percentage: field_text(form.risk_percentage.as_ref(), defaults.risk_percent),
      trade_mode,
      endpoint,
    }))
  }

  pub fn is_analyzing(&self) -> bool {
    self.in_flight.load(Ordering::Acquire)
  }

  /// Validates, submits once and renders. A failure leaves the previous result in place.
  /// While one analysis is pending a second one is refused with `Reply::Busy`.
  pub async fn analyze(&self, form: AnalyzeForm) -> Result<Reply<DashboardView>, Error> {
    let _in_flight = match InFlight::acquire(&self.in_flight) {
      Some(guard) => guard,
      None => {
        log::warn!("Analysis already in flight, ignoring {}", form.stock_name.trim());
        return Ok(Reply::Busy);
      }
    };

    let submission = match self.raw_fields(&form)?.and_then(|raw| request::build_analysis_request(&raw)) {
      Ok(submission) => submission,
      Err(failure) => {
        log::info!("Analysis request rejected: {}", failure.message);
        return Ok(Reply::Rejected(render::project_error(&failure)));
      }
    };

    log::info!("Analyzing {} ({}) via {}", submission.body.stock_name, submission.body.trade_mode, submission.endpoint);

    match self.client.analyze(&submission).await {
      Ok(AnalysisPayload { result, position_size }) => {
        let view: DashboardView = render::project(&result, position_size.as_ref())
          .stamped(format::timestamp(Local::now().naive_local()));
        {
          let mut guard = self.last_view.lock().map_err(|e| anyhow!("Dashboard state unavailable: {}", e))?;
          *guard = Some(view.clone());
        }
        Ok(Reply::Rendered(view, Some(Notice::success("Analysis completed successfully!"))))
      }
      Err(failure) => {
        log::error!("Analysis error: {}", failure);
        Ok(Reply::Failed(render::project_error(&failure), Notice::error(failure.message)))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn in_flight_flag_admits_one_holder() {
    let flag = AtomicBool::new(false);
    let held = InFlight::acquire(&flag);
    assert!(held.is_some());
    assert!(InFlight::acquire(&flag).is_none());
    drop(held);
    assert!(InFlight::acquire(&flag).is_some());
  }

  #[test]
  fn form_values_accept_text_numbers_and_gaps() {
    assert_eq!(field_text(None, 100000.0), "100000");
    assert_eq!(field_text(Some(&Value::Null), 2.0), "2");
    assert_eq!(field_text(Some(&serde_json::json!("2.5")), 2.0), "2.5");
    assert_eq!(field_text(Some(&serde_json::json!(50000)), 2.0), "50000");
    assert_eq!(field_text(Some(&serde_json::json!(true)), 2.0), "true");
  }
}
