//! Placeholder scanning and rendering of the client document.

mod assemble;
mod scanner;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub use assemble::{
  AssemblyInput, CSS_LINK_CLASS, CSS_RESOURCE_QUERY, DISCONNECT_SCRIPT, assemble_document,
  encode_runtime_config, runtime_config_script,
};
pub use scanner::{ScannedTemplate, Slot, Token};

use crate::error::{BuildError, BuildResult, IoResultExt};

/// Template used when no custom template is supplied.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Read the template at `path`, or the embedded default when `path` is `None`.
pub fn load_template(path: Option<&Path>) -> BuildResult<String> {
  let Some(path) = path else {
    return Ok(DEFAULT_TEMPLATE.to_string());
  };
  fs::read_to_string(path).map_err(|source| BuildError::TemplateRead {
    path: path.display().to_string(),
    source,
  })
}

/// Read the head fragment rendered by the app; a missing fragment yields an empty head.
pub fn load_head_fragment(path: &Path) -> BuildResult<String> {
  match fs::read_to_string(path) {
    Ok(head) => Ok(head),
    Err(err) if err.kind() == ErrorKind::NotFound => {
      log::info!("no <head> found in the Meteor app ({} is missing)", path.display());
      Ok(String::new())
    }
    Err(err) => Err(err).io_context(|| format!("failed to read {}", path.display())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn default_template_has_every_slot() {
    let scanned = ScannedTemplate::scan(DEFAULT_TEMPLATE);
    for slot in Slot::ALL {
      assert!(scanned.has_slot(slot), "missing {}", slot.name());
    }
  }

  #[test]
  fn unreadable_template_is_a_template_error() {
    let dir = tempdir().unwrap();
    let err = load_template(Some(&dir.path().join("missing.html"))).unwrap_err();
    assert!(matches!(err, BuildError::TemplateRead { .. }));
  }

  #[test]
  fn loads_custom_template() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.html");
    fs::write(&path, "<body>{{> scripts}}</body>").unwrap();

    assert_eq!(load_template(Some(&path)).unwrap(), "<body>{{> scripts}}</body>");
  }

  #[test]
  fn missing_head_fragment_is_empty() {
    let dir = tempdir().unwrap();
    assert_eq!(load_head_fragment(&dir.path().join("head.html")).unwrap(), "");
  }
}
