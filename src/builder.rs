//! Client build orchestrator running every stage from `meteor build` to cleanup.

use std::fs;
use std::path::PathBuf;

use crate::assets::{rewrite_asset_paths, scan_assets};
use crate::cleanup::{clean_up, clear_output_dir};
use crate::error::{BuildResult, IoResultExt};
use crate::models::{AssetManifest, RuntimeConfig, load_star_manifest, load_user_settings};
use crate::project::BuildContext;
use crate::relocate::relocate_client_programs;
use crate::shell::{CommandRunner, ShellCommand};
use crate::template::{AssemblyInput, assemble_document, load_head_fragment, load_template};

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
  /// Path of the rendered document.
  pub index_path: PathBuf,
  /// Asset references written into the document.
  pub assets: AssetManifest,
}

/// High-level helper turning a Meteor app into a standalone client bundle.
pub struct ClientBuilder {
  context: BuildContext,
}

impl ClientBuilder {
  /// Create a builder for the provided build context.
  ///
  /// A relative output directory is resolved against the current working directory, since
  /// the build command itself runs inside the project directory.
  pub fn new(mut context: BuildContext) -> Self {
    match std::path::absolute(&context.options.output_dir) {
      Ok(output_dir) => context.options.output_dir = output_dir,
      Err(err) => log::warn!(
        "could not resolve {}: {err}",
        context.options.output_dir.display()
      ),
    }
    Self { context }
  }

  /// Context this builder was created with.
  pub fn context(&self) -> &BuildContext {
    &self.context
  }

  /// Build the app with `runner` and turn its output into the client bundle.
  pub fn build<R: CommandRunner>(&self, runner: &R) -> BuildResult<BuildReport> {
    let output_dir = self.context.output_dir();
    clear_output_dir(output_dir)?;

    runner.run(&ShellCommand::meteor_build(&self.context))?;

    let moved = relocate_client_programs(&self.context.layout, output_dir)?;
    log::debug!("moved {moved} client entries into {}", output_dir.display());

    let report = self.render_index()?;
    clean_up(&self.context.layout, output_dir)?;

    log::info!("client bundle ready at {}", output_dir.display());
    Ok(report)
  }

  /// Render `index.html` from an already relocated bundle.
  pub fn render_index(&self) -> BuildResult<BuildReport> {
    let layout = &self.context.layout;
    let options = &self.context.options;
    let output_dir = self.context.output_dir();

    let star = load_star_manifest(&layout.star_manifest_path(output_dir))?;
    let settings = load_user_settings(options.settings_path.as_deref())?;
    let config = RuntimeConfig::new(&star, &settings, options.server_url());

    let scanned = scan_assets(output_dir)?;
    let assets = rewrite_asset_paths(scanned, options.asset_path_prefix.as_deref(), output_dir)?;

    let template = load_template(options.template_path.as_deref())?;
    let head = load_head_fragment(&layout.head_fragment_path(output_dir))?;

    let document = assemble_document(AssemblyInput {
      template: &template,
      head: &head,
      assets: &assets,
      config: &config,
      has_server_url: options.has_server_url(),
    })?;

    let index_path = layout.index_html_path(output_dir);
    fs::write(&index_path, document)
      .io_context(|| format!("failed to write {}", index_path.display()))?;
    log::info!(
      "wrote {} with {} stylesheet(s) and {} script(s)",
      index_path.display(),
      assets.css.len(),
      assets.js.len()
    );

    Ok(BuildReport { index_path, assets })
  }
}
