//! Moving the generated client program folders up to the output root.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{BuildResult, IoResultExt};
use crate::project::BundleLayout;

/// Move the contents of every client program directory into `output_dir`.
///
/// Returns the number of entries moved. Missing program directories are skipped and
/// existing destinations are never overwritten.
pub fn relocate_client_programs(layout: &BundleLayout, output_dir: &Path) -> BuildResult<usize> {
  let mut moved = 0;
  for program_dir in &layout.client_program_dirs {
    moved += move_dir_contents(
      &output_dir.join(program_dir),
      output_dir,
      &layout.relocation_excluded_entry,
    )?;
  }
  Ok(moved)
}

fn move_dir_contents(source: &Path, destination: &Path, excluded: &str) -> BuildResult<usize> {
  let entries = match fs::read_dir(source) {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      log::debug!("{} does not exist, nothing to relocate", source.display());
      return Ok(0);
    }
    Err(err) => {
      return Err(err).io_context(|| format!("failed to read {}", source.display()));
    }
  };

  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.io_context(|| format!("failed to read {}", source.display()))?;
    names.push(entry.file_name());
  }
  names.sort();

  let mut moved = 0;
  for name in names {
    if name == excluded {
      continue;
    }

    let from = source.join(&name);
    let to = destination.join(&name);
    if to.exists() {
      log::warn!(
        "not moving {} because {} already exists",
        from.display(),
        to.display()
      );
      continue;
    }

    fs::rename(&from, &to)
      .io_context(|| format!("failed to move {} to {}", from.display(), to.display()))?;
    moved += 1;
  }

  Ok(moved)
}
