//! Removal of intermediate build artifacts once the document has been rendered.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{BuildResult, IoResultExt};
use crate::project::BundleLayout;

/// Delete the intermediate bundle directory and scratch files from `output_dir`.
///
/// Anything already gone is skipped, so running this twice is harmless.
pub fn clean_up(layout: &BundleLayout, output_dir: &Path) -> BuildResult<()> {
  let bundle = layout.bundle_path(output_dir);
  match fs::remove_dir_all(&bundle) {
    Ok(()) => log::debug!("removed {}", bundle.display()),
    Err(err) if err.kind() == ErrorKind::NotFound => {
      log::debug!("{} already removed", bundle.display());
    }
    Err(err) => {
      return Err(err).io_context(|| format!("failed to remove {}", bundle.display()));
    }
  }

  for name in layout.scratch_files() {
    let path = output_dir.join(name);
    match fs::remove_file(&path) {
      Ok(()) => log::debug!("removed {}", path.display()),
      Err(err) if err.kind() == ErrorKind::NotFound => {
        log::info!("didn't remove {name}; it doesn't exist");
      }
      Err(err) => {
        return Err(err).io_context(|| format!("failed to remove {}", path.display()));
      }
    }
  }

  Ok(())
}

/// Remove a previous build's output directory before starting a new one.
pub fn clear_output_dir(output_dir: &Path) -> BuildResult<()> {
  match fs::remove_dir_all(output_dir) {
    Ok(()) => {
      log::info!("removed previous build at {}", output_dir.display());
      Ok(())
    }
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
    Err(err) => Err(err).io_context(|| format!("failed to remove {}", output_dir.display())),
  }
}
