//! Wiring for the onboarding server binary.
//!
//! Holds the runtime configuration and assembles the HTTP application from a
//! store and a clock.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use onboard_api::{AppState, api_router};
use onboard_core::{
  clock::{Clock, LocalClock, UtcClock},
  store::OnboardingStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which wall clock stamps `created_at`, `updated_at` and `upload_date`.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClockKind {
  /// The host's local time zone.
  #[default]
  Local,
  Utc,
}

impl ClockKind {
  pub fn clock(self) -> Arc<dyn Clock> {
    match self {
      Self::Local => Arc::new(LocalClock),
      Self::Utc => Arc::new(UtcClock),
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `ONBOARD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub clock:      ClockKind,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the full HTTP application with request tracing.
pub fn app<S>(store: S, clock: Arc<dyn Clock>) -> Router
where
  S: OnboardingStore + 'static,
{
  let state = AppState {
    store: Arc::new(store),
    clock,
  };
  api_router(state).layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
