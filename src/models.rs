//! Data structures produced and consumed while rendering the client bundle.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BuildError, BuildResult, IoResultExt};

/// Content-hashed assets found at the bundle root, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
  /// Stylesheet references.
  pub css: Vec<String>,
  /// Script references.
  pub js: Vec<String>,
}

impl AssetManifest {
  /// Returns `true` when no assets were found.
  pub fn is_empty(&self) -> bool {
    self.css.is_empty() && self.js.is_empty()
  }
}

/// Build manifest written by `meteor build` as `star.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarManifest {
  /// Release identifier, e.g. `METEOR@2.16`.
  pub meteor_release: String,
}

/// User settings document passed with `--settings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSettings {
  /// Settings exposed to the client.
  #[serde(default)]
  pub public: Option<Value>,
}

/// Environment block of the runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteorEnv {
  /// Node environment reported to client code.
  #[serde(rename = "NODE_ENV")]
  pub node_env: String,
}

/// Configuration object the client reads as `__meteor_runtime_config__` at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
  /// Release identifier copied from the build manifest.
  #[serde(rename = "meteorRelease")]
  pub meteor_release: String,
  /// Path prefix the app is served under.
  #[serde(rename = "ROOT_URL_PATH_PREFIX")]
  pub root_url_path_prefix: String,
  /// Environment block.
  #[serde(rename = "meteorEnv")]
  pub meteor_env: MeteorEnv,
  /// Server used for the DDP connection; empty when none was given.
  #[serde(rename = "DDP_DEFAULT_CONNECTION_URL")]
  pub ddp_default_connection_url: String,
  /// Absolute app URL, omitted when the serving origin should be used.
  #[serde(rename = "ROOT_URL", default, skip_serializing_if = "Option::is_none")]
  pub root_url: Option<String>,
  /// Public part of the user settings.
  #[serde(
    rename = "PUBLIC_SETTINGS",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub public_settings: Option<Value>,
}

/// Server URL value asking the client to connect back to wherever it is served from.
pub const SERVING_ORIGIN_URL: &str = "default";

impl RuntimeConfig {
  /// Assemble the runtime configuration from the build manifest, user settings and server URL.
  pub fn new(star: &StarManifest, settings: &UserSettings, server_url: Option<&str>) -> Self {
    let server_url = server_url.filter(|url| !url.is_empty());
    let url = server_url.unwrap_or_default();
    let root_url = (server_url != Some(SERVING_ORIGIN_URL)).then(|| url.to_string());

    Self {
      meteor_release: star.meteor_release.clone(),
      root_url_path_prefix: String::new(),
      meteor_env: MeteorEnv {
        node_env: "production".into(),
      },
      ddp_default_connection_url: url.to_string(),
      root_url,
      public_settings: settings.public.clone(),
    }
  }
}

/// Load `star.json` from disk.
pub fn load_star_manifest(path: &Path) -> BuildResult<StarManifest> {
  load_json(path)
}

/// Load the user settings document, or empty settings when no path is given.
pub fn load_user_settings(path: Option<&Path>) -> BuildResult<UserSettings> {
  match path {
    Some(path) => load_json(path),
    None => Ok(UserSettings::default()),
  }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> BuildResult<T> {
  let content =
    fs::read_to_string(path).io_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).map_err(|source| BuildError::Config {
    context: format!("failed to parse {}", path.display()),
    source,
  })
}
