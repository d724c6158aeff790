//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ProjectConfig;
use crate::project::{BuildContext, BuildOptions};

/// Build a Meteor app's client into a standalone static bundle.
#[derive(Debug, Parser)]
#[command(name = "meteor-client-bundler", version, about)]
pub struct Cli {
  /// Directory the client bundle is written to. It is removed first if it exists.
  pub output: PathBuf,

  /// Server the client connects to; `default` connects to wherever the bundle is served from.
  #[arg(short, long)]
  pub url: Option<String>,

  /// Settings JSON file whose `public` key is exposed to the client.
  #[arg(short, long)]
  pub settings: Option<PathBuf>,

  /// Custom index.html template with `{{> head}}`, `{{> css}}`, `{{> config}}` and
  /// `{{> scripts}}` placeholders.
  #[arg(short, long)]
  pub template: Option<PathBuf>,

  /// Absolute prefix for asset references, e.g. `https://cdn.example.com/`.
  #[arg(short, long)]
  pub path: Option<String>,

  /// Meteor application directory.
  #[arg(long, default_value = ".")]
  pub project: PathBuf,
}

impl Cli {
  /// Convert parsed arguments into the options for a single build.
  pub fn into_options(self) -> BuildOptions {
    BuildOptions {
      output_dir: self.output,
      server_url: self.url.filter(|url| !url.is_empty()),
      settings_path: self.settings,
      template_path: self.template,
      asset_path_prefix: self.path,
    }
  }

  /// Build the full context, discovering project configuration from the project directory.
  pub fn into_context(self) -> BuildContext {
    let project_dir = self.project.clone();
    let layout = ProjectConfig::discover(&project_dir).into_layout();
    BuildContext {
      project_dir,
      layout,
      options: self.into_options(),
    }
  }
}
