//! Directory scanning for content-hashed stylesheets and scripts.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BuildResult, IoResultExt};
use crate::models::AssetManifest;

/// Kind of a content-hashed asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Stylesheet.
    Css,
    /// Script.
    Js,
}

fn hashed_asset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]{40}\.(css|js)$").expect("invalid hashed asset regex")
    })
}

/// Classify a file name as a content-hashed asset: 40 lowercase hex-ish characters plus extension.
pub fn classify_asset(file_name: &str) -> Option<AssetKind> {
    let captures = hashed_asset_pattern().captures(file_name)?;
    match captures.get(1)?.as_str() {
        "css" => Some(AssetKind::Css),
        "js" => Some(AssetKind::Js),
        _ => None,
    }
}

/// List `dir` (non-recursively) and collect its content-hashed assets, sorted by name.
pub fn scan_assets(dir: &Path) -> BuildResult<AssetManifest> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).io_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry.io_context(|| format!("failed to read {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .io_context(|| format!("failed to inspect {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        names.push(name.to_string());
    }
    names.sort();

    let mut manifest = AssetManifest::default();
    for name in names {
        match classify_asset(&name) {
            Some(AssetKind::Css) => manifest.css.push(name),
            Some(AssetKind::Js) => manifest.js.push(name),
            None => {}
        }
    }

    log::debug!(
        "found {} stylesheet(s) and {} script(s) in {}",
        manifest.css.len(),
        manifest.js.len(),
        dir.display()
    );
    Ok(manifest)
}
