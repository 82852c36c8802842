//! Mojo extractor CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mojo_extractor::{
    encode_toon, AnalysisConfig, Cli, DefaultPluginToolsRequest, ExtractorError,
    KotlinMojoDescriptorExtractor, MojoDescriptorExtractor, OutputFormat,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Logs go to stderr; stdout carries only the descriptors
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> mojo_extractor::Result<String> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    config.verbose |= cli.verbose;

    let request = DefaultPluginToolsRequest::new(cli.project());
    let descriptors = KotlinMojoDescriptorExtractor::with_config(config).execute(&request)?;

    match cli.format {
        OutputFormat::Toon => encode_toon(&descriptors),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&descriptors).map_err(|e| ExtractorError::Serialization {
                message: format!("JSON serialization failed: {}", e),
            })
        }
    }
}
