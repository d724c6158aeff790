//! Rewriting asset references to root-relative or prefixed public paths.

use std::fs;
use std::path::Path;

use crate::error::{BuildResult, IoResultExt};
use crate::models::AssetManifest;

/// Point root-relative `url(...)` references in a stylesheet at `prefix`.
///
/// Only `url('/` and `url(/` are rewritten. Applying this twice prefixes twice.
pub fn prefix_css_urls(css: &str, prefix: &str) -> String {
    css.replace("url('/", &format!("url('{prefix}"))
        .replace("url(/", &format!("url({prefix}"))
}

/// Turn scanned asset file names into the references used by the rendered document.
///
/// With a prefix every stylesheet in `bundle_dir` is rewritten in place and every entry becomes
/// `<prefix><name>`; without one every entry becomes `/<name>`. A failure part way through
/// leaves already rewritten stylesheets as they are.
pub fn rewrite_asset_paths(
    manifest: AssetManifest,
    prefix: Option<&str>,
    bundle_dir: &Path,
) -> BuildResult<AssetManifest> {
    let Some(prefix) = prefix else {
        return Ok(AssetManifest {
            css: manifest.css.iter().map(|name| format!("/{name}")).collect(),
            js: manifest.js.iter().map(|name| format!("/{name}")).collect(),
        });
    };

    let mut css = Vec::with_capacity(manifest.css.len());
    for name in &manifest.css {
        let path = bundle_dir.join(name);
        let content = fs::read_to_string(&path)
            .io_context(|| format!("failed to read stylesheet {}", path.display()))?;
        fs::write(&path, prefix_css_urls(&content, prefix))
            .io_context(|| format!("failed to write stylesheet {}", path.display()))?;
        css.push(format!("{prefix}{name}"));
    }

    log::info!("prefixed {} stylesheet(s) with {prefix}", css.len());
    Ok(AssetManifest {
        css,
        js: manifest.js.iter().map(|name| format!("{prefix}{name}")).collect(),
    })
}
