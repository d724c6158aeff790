//! Error type shared by every stage of the client build.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Generic build result type used across the crate.
pub type BuildResult<T> = Result<T, BuildError>;

/// Failures that abort the client build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The external build command could not be started.
  #[error("failed to start `{command}`: {source}")]
  Spawn {
    /// Command line that was attempted.
    command: String,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
  /// The external build command ran but did not succeed.
  #[error("`{command}` exited with {status}: {stderr}")]
  Process {
    /// Command line that was run.
    command: String,
    /// Exit status reported by the process.
    status: ExitStatus,
    /// Trimmed standard error output.
    stderr: String,
  },
  /// A filesystem path was missing, unreadable or unwritable.
  #[error("{context}: {source}")]
  Io {
    /// What was being attempted, including the path involved.
    context: String,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
  /// An external JSON document was malformed, or the runtime config could not be encoded.
  #[error("{context}: {source}")]
  Config {
    /// What was being parsed or encoded.
    context: String,
    /// Source JSON error.
    #[source]
    source: serde_json::Error,
  },
  /// The template document could not be read.
  #[error("failed to read template {path}: {source}")]
  TemplateRead {
    /// Template path shown to the user.
    path: String,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
  /// The template lacks a placeholder that rendered content must go into.
  #[error("template has no `{{{{> {slot}}}}}` placeholder for {pending}")]
  MissingSlot {
    /// Placeholder name.
    slot: &'static str,
    /// Description of the content that would be lost.
    pending: String,
  },
}

impl BuildError {
  /// Returns `true` for errors raised by the external build command.
  pub fn is_process(&self) -> bool {
    matches!(self, Self::Spawn { .. } | Self::Process { .. })
  }
}

/// Attach a human readable context to I/O failures, in the spirit of `anyhow::Context`.
pub trait IoResultExt<T> {
  /// Convert an I/O error into [`BuildError::Io`] using a lazily built message.
  fn io_context<F>(self, context: F) -> BuildResult<T>
  where
    F: FnOnce() -> String;
}

impl<T> IoResultExt<T> for io::Result<T> {
  fn io_context<F>(self, context: F) -> BuildResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|source| BuildError::Io {
      context: context(),
      source,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn io_context_keeps_message_and_source() {
    let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
    let err = result
      .io_context(|| "failed to read /tmp/x".to_string())
      .unwrap_err();

    assert_eq!(err.to_string(), "failed to read /tmp/x: gone");
    assert!(std::error::Error::source(&err).is_some());
    assert!(!err.is_process());
  }

  #[test]
  fn missing_slot_message_names_placeholder() {
    let err = BuildError::MissingSlot {
      slot: "scripts",
      pending: "2 script elements".into(),
    };
    assert_eq!(
      err.to_string(),
      "template has no `{{> scripts}}` placeholder for 2 script elements"
    );
  }
}
