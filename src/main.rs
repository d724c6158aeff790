use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use meteor_client_bundler::cli::Cli;
use meteor_client_bundler::{ClientBuilder, SystemRunner};

fn main() -> ExitCode {
  env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let builder = ClientBuilder::new(cli.into_context());
  let output_dir = builder.context().output_dir().display().to_string();
  let report = builder
    .build(&SystemRunner)
    .with_context(|| format!("failed to build the client bundle into {output_dir}"))?;
  println!("{}", report.index_path.display());
  Ok(())
}
