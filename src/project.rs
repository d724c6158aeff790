//! Layout of a Meteor client build and the per-build context threaded through every stage.

use std::path::{Path, PathBuf};

/// Names of the well-known files and directories produced by `meteor build --directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
  /// Executable used to produce the bundle.
  pub build_program: String,
  /// Intermediate server bundle directory below the output root.
  pub bundle_dir: String,
  /// Client program directories whose contents are moved to the output root, in order.
  pub client_program_dirs: Vec<String>,
  /// Entry name left behind when relocating client program directories.
  pub relocation_excluded_entry: String,
  /// Build manifest carrying the release identifier, relative to the output root.
  pub star_manifest: String,
  /// Client program manifest removed during cleanup.
  pub program_manifest: String,
  /// Head fragment rendered by the app, relative to the output root.
  pub head_fragment: String,
  /// Name of the rendered HTML document.
  pub index_html_file: String,
}

impl BundleLayout {
  /// Path of the intermediate bundle directory inside `output_dir`.
  pub fn bundle_path(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.bundle_dir)
  }

  /// Path of the build manifest inside `output_dir`.
  pub fn star_manifest_path(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.star_manifest)
  }

  /// Path of the head fragment inside `output_dir`.
  pub fn head_fragment_path(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.head_fragment)
  }

  /// Path of the rendered document inside `output_dir`.
  pub fn index_html_path(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.index_html_file)
  }

  /// Scratch files deleted once the document has been rendered.
  pub fn scratch_files(&self) -> [&str; 2] {
    [self.program_manifest.as_str(), self.head_fragment.as_str()]
  }
}

/// Options supplied by the caller for a single build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Directory the client bundle is written to.
  pub output_dir: PathBuf,
  /// Server the client should connect to; `default` connects to the serving origin.
  pub server_url: Option<String>,
  /// JSON settings file whose `public` key is exposed to the client.
  pub settings_path: Option<PathBuf>,
  /// Custom template document; the embedded default is used otherwise.
  pub template_path: Option<PathBuf>,
  /// Absolute prefix prepended to every asset reference, e.g. a CDN base.
  pub asset_path_prefix: Option<String>,
}

impl BuildOptions {
  /// Whether the client is told about a server to connect to.
  pub fn has_server_url(&self) -> bool {
    self.server_url().is_some()
  }

  /// Server URL, with an empty value treated as absent.
  pub fn server_url(&self) -> Option<&str> {
    self.server_url.as_deref().filter(|url| !url.is_empty())
  }
}

/// Everything a build needs, constructed once before the pipeline starts.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Meteor application directory the build command runs in.
  pub project_dir: PathBuf,
  /// Names of well-known paths inside the bundle.
  pub layout: BundleLayout,
  /// Caller supplied options.
  pub options: BuildOptions,
}

impl BuildContext {
  /// Output directory of this build.
  pub fn output_dir(&self) -> &Path {
    &self.options.output_dir
  }
}
