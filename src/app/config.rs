use std::env;
use std::str::FromStr;
use std::time::Duration;

use log; 

#[derive(Clone, Debug)]
pub struct Config {
  pub host: String,
  pub port: u16,
  pub preferences_path: String,
  pub request_timeout: Duration,
  pub probe_timeout: Duration,
}

fn env_or<T: FromStr + ToString>(key: &str, default: T) -> T {
  match env::var(key) {
    Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
      log::warn!("Warning: {} has unreadable value {:?}, using default {}", key, raw, default.to_string());
      default
    }),
    Err(_) => {
      log::warn!("Warning: {} not found, using default {}", key, default.to_string());
      default
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Config {
      host: "127.0.0.1".to_string(),
      port: 8080,
      preferences_path: "preferences.json".to_string(),
      request_timeout: Duration::from_millis(30_000),
      probe_timeout: Duration::from_millis(5_000),
    }
  }
}

impl Config {

  pub fn load() -> Self {
    match dotenv::dotenv() {
      Ok(_) => log::info!("Loaded .env file"),
      Err(_) => log::warn!("No .env file found"),
    }

    let defaults: Config = Config::default();

    let host: String = env_or("CONSOLE_HOST", defaults.host);
    let port: u16 = env_or("CONSOLE_PORT", defaults.port);
    let preferences_path: String = env_or("PREFERENCES_PATH", defaults.preferences_path);
    let request_timeout_ms: u64 = env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout.as_millis() as u64);
    let probe_timeout_ms: u64 = env_or("PROBE_TIMEOUT_MS", defaults.probe_timeout.as_millis() as u64);

    return Config {
      host,
      port,
      preferences_path,
      request_timeout: Duration::from_millis(request_timeout_ms),
      probe_timeout: Duration::from_millis(probe_timeout_ms),
    }
  }

}
