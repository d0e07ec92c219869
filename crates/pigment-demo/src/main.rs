//! Pigment Demo: command-line driver for the image engine.
//!
//! Stands in for an interactive front end: loads an image as the base layer,
//! runs the requested edits through the engine and writes the composite.

mod cli;
mod config;
mod image_loader;
mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::config::DemoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match DemoConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing(&DemoConfig::default().log_filter);
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);

    match pipeline::run(&args, &config).await {
        Ok(summary) => {
            tracing::info!(
                output = %args.output.display(),
                width = summary.width,
                height = summary.height,
                display_width = summary.display_width,
                display_height = summary.display_height,
                layers = summary.layers,
                filtered = summary.filter_applied,
                source_format = summary.input.format.label(),
                "wrote composite"
            );
            if let Some(sample) = &summary.sample {
                tracing::info!(
                    x = sample.position.0,
                    y = sample.position.1,
                    hex = %sample.hex,
                    l = sample.lab.l,
                    a = sample.lab.a,
                    b = sample.lab.b,
                    "color at sample point"
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
