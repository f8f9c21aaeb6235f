//! Loading the item pool from TOML.
//!
//! Schema:
//! ```toml
//! name = "JLPT N5 sample"
//!
//! [[items]]
//! id = "火"
//! hints = ["ひ", "ほ"]
//! glosses = ["fire", "flame"]
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{Item, Pool};
use crate::error::DrillError;
use crate::seeds::{seed_items, SEED_POOL_NAME};
use crate::state::SessionLimits;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PoolConfig {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub items: Vec<Item>,
}

impl PoolConfig {
  pub fn from_toml(s: &str) -> Result<Self, DrillError> {
    toml::from_str(s).map_err(|e| DrillError::Config(e.to_string()))
  }

  pub fn into_pool(self) -> Result<(String, Pool), DrillError> {
    let name = self.name.unwrap_or_else(|| "custom".into());
    Ok((name, Pool::new(self.items)?))
  }
}

/// Pool named by POOL_CONFIG_PATH, or the built-in seeds when unset or unusable.
pub fn load_pool_from_env() -> Result<(String, Pool), DrillError> {
  if let Some(found) = std::env::var("POOL_CONFIG_PATH").ok().and_then(|path| load_pool_file(&path)) {
    return Ok(found);
  }
  info!(target: "pick_drill", name = SEED_POOL_NAME, "Using built-in seed pool");
  Ok((SEED_POOL_NAME.to_string(), Pool::new(seed_items())?))
}

/// Session store bounds from MAX_SESSIONS and SESSION_IDLE_SECS.
pub fn session_limits_from_env() -> SessionLimits {
  let max = std::env::var("MAX_SESSIONS").ok();
  let idle = std::env::var("SESSION_IDLE_SECS").ok();
  parse_session_limits(max.as_deref(), idle.as_deref())
}

fn parse_session_limits(max: Option<&str>, idle_secs: Option<&str>) -> SessionLimits {
  let mut limits = SessionLimits::default();
  if let Some(raw) = max {
    match raw.parse::<usize>() {
      Ok(n) if n > 0 => limits.max_sessions = n,
      _ => warn!(target: "pick_drill", value = %raw, "Ignoring invalid MAX_SESSIONS"),
    }
  }
  if let Some(raw) = idle_secs {
    match raw.parse::<u64>() {
      Ok(n) if n > 0 => limits.idle_ttl = Duration::from_secs(n),
      _ => warn!(target: "pick_drill", value = %raw, "Ignoring invalid SESSION_IDLE_SECS"),
    }
  }
  limits
}

fn load_pool_file(path: &str) -> Option<(String, Pool)> {
  let s = match std::fs::read_to_string(path) {
    Ok(s) => s,
    Err(e) => {
      error!(target: "pick_drill", %path, error = %e, "Failed to read pool file");
      return None;
    }
  };
  match PoolConfig::from_toml(&s).and_then(PoolConfig::into_pool) {
    Ok((name, pool)) => {
      info!(target: "pick_drill", %path, %name, items = pool.len(), "Loaded pool (TOML)");
      if pool.len() < 3 {
        warn!(target: "pick_drill", %name, items = pool.len(), "Pool has fewer than 3 items; rounds will offer fewer choices");
      }
      Some((name, pool))
    }
    Err(e) => {
      error!(target: "pick_drill", %path, error = %e, "Invalid pool file; falling back to seeds");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn session_limits_parse_and_fall_back() {
    let limits = parse_session_limits(Some("16"), Some("90"));
    assert_eq!(limits.max_sessions, 16);
    assert_eq!(limits.idle_ttl, Duration::from_secs(90));

    assert_eq!(parse_session_limits(None, None), SessionLimits::default());
    assert_eq!(parse_session_limits(Some("0"), Some("soon")), SessionLimits::default());
  }

  #[test]
  fn parses_items_and_defaults_hints() {
    let cfg = PoolConfig::from_toml(
      r#"
        name = "elements"
        [[items]]
        id = "火"
        hints = ["ひ"]
        glosses = ["fire"]

        [[items]]
        id = "水"
        glosses = ["water"]
      "#,
    )
    .unwrap();
    let (name, pool) = cfg.into_pool().unwrap();
    assert_eq!(name, "elements");
    assert_eq!(pool.len(), 2);
    assert!(pool.get("水").unwrap().hints.is_empty());
  }

  #[test]
  fn empty_file_is_an_empty_pool() {
    let cfg = PoolConfig::from_toml("").unwrap();
    assert_eq!(cfg.into_pool().unwrap_err(), DrillError::EmptyPool);
  }

  #[test]
  fn malformed_toml_is_a_config_error() {
    assert!(matches!(PoolConfig::from_toml("items = 3"), Err(DrillError::Config(_))));
  }

  #[test]
  fn missing_file_falls_back() {
    assert!(load_pool_file("/definitely/not/here.toml").is_none());
  }
}
