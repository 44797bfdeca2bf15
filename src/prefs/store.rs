use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Small persisted key-value store holding user preferences as one JSON object.
/// Failures are logged and reported as `false`, never raised.
pub struct PreferenceStore {
  path: Option<PathBuf>,
  entries: Mutex<Map<String, Value>>,
}

impl PreferenceStore {
  pub fn open(path: impl Into<PathBuf>) -> Self {
    let path: PathBuf = path.into();
    let entries: Map<String, Value> = match fs::read_to_string(&path) {
      Ok(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
        Ok(entries) => entries,
        Err(e) => {
          log::error!("Error reading preferences from {}: {}. Starting empty.", path.display(), e);
          Map::new()
        }
      },
      Err(_) => {
        log::info!("No preferences at {}, starting empty.", path.display());
        Map::new()
      }
    };
    PreferenceStore { path: Some(path), entries: Mutex::new(entries) }
  }

  /// Store that lives only as long as the process.
  pub fn in_memory() -> Self {
    PreferenceStore { path: None, entries: Mutex::new(Map::new()) }
  }

  fn flush(&self, entries: &Map<String, Value>) -> bool {
    let Some(path) = self.path.as_ref() else {
      return true;
    };
    let text: String = match serde_json::to_string_pretty(entries) {
      Ok(text) => text,
      Err(e) => {
        log::error!("Error encoding preferences: {}", e);
        return false;
      }
    };
    match fs::write(path, text) {
      Ok(_) => true,
      Err(e) => {
        log::error!("Error saving preferences to {}: {}", path.display(), e);
        false
      }
    }
  }

  pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
    let entries = match self.entries.lock() {
      Ok(guard) => guard,
      Err(e) => {
        log::error!("Preference store lock poisoned: {}", e);
        return default;
      }
    };
    match entries.get(key) {
      Some(value) => match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
          log::error!("Error reading preference {}: {}", key, e);
          default
        }
      },
      None => default,
    }
  }

  pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
    let value: Value = match serde_json::to_value(value) {
      Ok(value) => value,
      Err(e) => {
        log::error!("Error saving preference {}: {}", key, e);
        return false;
      }
    };
    match self.entries.lock() {
      Ok(mut entries) => {
        entries.insert(key.to_string(), value);
        self.flush(&entries)
      }
      Err(e) => {
        log::error!("Preference store lock poisoned: {}", e);
        false
      }
    }
  }

  pub fn remove(&self, key: &str) -> bool {
    match self.entries.lock() {
      Ok(mut entries) => {
        entries.remove(key);
        self.flush(&entries)
      }
      Err(e) => {
        log::error!("Error removing preference {}: {}", key, e);
        false
      }
    }
  }

  pub fn clear(&self) -> bool {
    match self.entries.lock() {
      Ok(mut entries) => {
        entries.clear();
        self.flush(&entries)
      }
      Err(e) => {
        log::error!("Error clearing preferences: {}", e);
        false
      }
    }
  }
}
