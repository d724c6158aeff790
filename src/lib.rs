#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assets;
pub mod builder;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod project;
pub mod relocate;
pub mod shell;
pub mod template;

pub use builder::{BuildReport, ClientBuilder};
pub use error::{BuildError, BuildResult};
pub use models::{AssetManifest, RuntimeConfig};
pub use project::{BuildContext, BuildOptions, BundleLayout};
pub use shell::{CommandRunner, ShellCommand, SystemRunner};
