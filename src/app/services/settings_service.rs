use serde::{Serialize, Deserialize};
use std::sync::{Arc, Mutex};
use anyhow::{anyhow, Error};

use crate::pipeline::notice::Notice;
use crate::pipeline::remote::client::RemoteClient;
use crate::prefs::endpoints::{self, EndpointConfig, EndpointName, EndpointOverrides, TradingDefaults, QUICK_STOCKS};
use crate::prefs::store::PreferenceStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsView {
  pub endpoints: EndpointConfig,
  pub defaults: TradingDefaults,
  pub stocks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsEdit {
  #[serde(default)]
  pub endpoints: EndpointOverrides,
  #[serde(default)]
  pub defaults: Option<TradingDefaults>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeView {
  pub target: EndpointName,
  pub url: String,
  pub reachable: bool,
  pub status: String,
}

/// Owns the endpoint table and trading defaults for the session and keeps them in the preference store.
pub struct SettingsService {
  store: Arc<PreferenceStore>,
  client: RemoteClient,
  endpoints: Mutex<EndpointConfig>,
  defaults: Mutex<TradingDefaults>,
}

impl SettingsService {
  pub fn new(store: Arc<PreferenceStore>, client: RemoteClient) -> Self {
    let endpoints: EndpointConfig = endpoints::load_endpoints(&store);
    let defaults: TradingDefaults = endpoints::load_defaults(&store);
    log::info!("Loaded endpoints: analysis={} chat={} admin={}", endpoints.analysis, endpoints.chat, endpoints.admin);
    SettingsService { store, client, endpoints: Mutex::new(endpoints), defaults: Mutex::new(defaults) }
  }

  pub fn endpoints(&self) -> Result<EndpointConfig, Error> {
    let guard = self.endpoints.lock().map_err(|e| anyhow!("Endpoint table unavailable: {}", e))?;
    Ok(guard.clone())
  }

  pub fn defaults(&self) -> Result<TradingDefaults, Error> {
    let guard = self.defaults.lock().map_err(|e| anyhow!("Trading defaults unavailable: {}", e))?;
    Ok(guard.clone())
  }

  pub fn endpoint(&self, name: EndpointName) -> Result<String, Error> {
    Ok(self.endpoints()?.get(name).to_string())
  }

  pub fn view(&self) -> Result<SettingsView, Error> {
    Ok(SettingsView {
      endpoints: self.endpoints()?,
      defaults: self.defaults()?,
      stocks: QUICK_STOCKS.iter().map(|s| s.to_string()).collect(),
    })
  }

  fn persist(&self, endpoints: &EndpointConfig, defaults: &TradingDefaults) {
    if !endpoints::save(&self.store, endpoints, defaults) {
      log::error!("Configuration could not be written to the preference store");
    }
  }

  /// A page typed a different URL into its endpoint box; remember it like an edit.
  pub fn remember(&self, name: EndpointName, url: &str) -> Result<(), Error> {
    let url: &str = url.trim();
    let mut overrides: EndpointOverrides = EndpointOverrides::default();
    match name {
      EndpointName::Analysis => overrides.analysis = Some(url.to_string()),
      EndpointName::Chat => overrides.chat = Some(url.to_string()),
      EndpointName::Admin => overrides.admin = Some(url.to_string()),
    }

    let updated: EndpointConfig = {
      let mut guard = self.endpoints.lock().map_err(|e| anyhow!("Endpoint table unavailable: {}", e))?;
      if url.is_empty() || guard.get(name) == url {
        return Ok(());
      }
      *guard = guard.clone().merged(overrides);
      guard.clone()
    };
    log::info!("Endpoint {:?} changed to {}", name, url);
    self.persist(&updated, &self.defaults()?);
    Ok(())
  }

  pub fn update(&self, edit: SettingsEdit) -> Result<(SettingsView, Notice), Error> {
    let endpoints: EndpointConfig = {
      let mut guard = self.endpoints.lock().map_err(|e| anyhow!("Endpoint table unavailable: {}", e))?;
      *guard = guard.clone().merged(edit.endpoints);
      guard.clone()
    };
    let defaults: TradingDefaults = {
      let mut guard = self.defaults.lock().map_err(|e| anyhow!("Trading defaults unavailable: {}", e))?;
      if let Some(defaults) = edit.defaults {
        *guard = defaults;
      }
      guard.clone()
    };
    self.persist(&endpoints, &defaults);
    Ok((self.view()?, Notice::success("Configuration saved!")))
  }

  pub fn reset(&self) -> Result<(SettingsView, Notice), Error> {
    let endpoints: EndpointConfig = EndpointConfig::default();
    {
      let mut guard = self.endpoints.lock().map_err(|e| anyhow!("Endpoint table unavailable: {}", e))?;
      *guard = endpoints.clone();
    }
    self.persist(&endpoints, &self.defaults()?);
    Ok((self.view()?, Notice::info("Configuration reset to defaults!")))
  }

  pub async fn probe(&self, target: EndpointName) -> Result<ProbeView, Error> {
    let url: String = self.endpoint(target)?;
    let reachable: bool = self.client.probe(&url).await;
    let status: &str = if reachable { "Online" } else { "Offline" };
    Ok(ProbeView { target, url, reachable, status: status.to_string() })
  }
}
