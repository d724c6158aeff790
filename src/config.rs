//! Project configuration loader for describing the bundle layout.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::project::BundleLayout;

/// Configuration file looked up in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "client-bundler.config.json";

/// Discoverable project configuration overriding well-known bundle paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Executable invoked to build the app.
    pub build_program: String,
    /// Intermediate server bundle directory.
    pub bundle_dir: String,
    /// Client program directories relocated to the output root.
    pub client_program_dirs: Vec<String>,
    /// Entry skipped while relocating.
    pub relocation_excluded_entry: String,
    /// Build manifest holding the release identifier.
    pub star_manifest: String,
    /// Client program manifest deleted during cleanup.
    pub program_manifest: String,
    /// Head fragment rendered by the app.
    pub head_fragment: String,
    /// File name of the rendered document.
    pub index_html_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            build_program: "meteor".into(),
            bundle_dir: "bundle".into(),
            client_program_dirs: vec![
                "bundle/programs/web.browser".into(),
                "bundle/programs/web.browser/app".into(),
            ],
            relocation_excluded_entry: "app".into(),
            star_manifest: "bundle/star.json".into(),
            program_manifest: "program.json".into(),
            head_fragment: "head.html".into(),
            index_html_file: "index.html".into(),
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the provided project directory.
    ///
    /// A missing file yields the defaults. A malformed file is reported and also falls back
    /// to the defaults so a stray config never blocks a build.
    pub fn discover(project_dir: &Path) -> Self {
        let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(Some(config)) => {
                log::debug!("loaded project config from {}", candidate.display());
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("ignoring {}: {err}", candidate.display());
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file, `None` when it does not exist.
    pub fn from_path(path: &Path) -> Result<Option<Self>, serde_json::Error> {
        let Ok(content) = fs::read_to_string(path) else {
            return Ok(None);
        };
        serde_json::from_str(&content).map(Some)
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> BundleLayout {
        BundleLayout {
            build_program: self.build_program,
            bundle_dir: self.bundle_dir,
            client_program_dirs: self.client_program_dirs,
            relocation_excluded_entry: self.relocation_excluded_entry,
            star_manifest: self.star_manifest,
            program_manifest: self.program_manifest,
            head_fragment: self.head_fragment,
            index_html_file: self.index_html_file,
        }
    }
}
