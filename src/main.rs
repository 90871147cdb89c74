// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use distcheck::inspect::render_report;
use distcheck::{CheckEngine, Config, Outcome};
use std::process::ExitCode;

/// Exit status for configuration problems; nothing has been opened yet
const CONFIG_ERROR_EXIT: u8 = 2;

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, engine) = match configure(&cli) {
        Ok(configured) => configured,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };

    ExitCode::from(check_all(&cli, &config, &engine).exit_code())
}

/// Resolve configuration and build the engine; all config errors surface here
fn configure(cli: &Cli) -> Result<(Config, CheckEngine)> {
    let mut config = Config::default();
    config
        .update_from_toml(&cli.config)
        .with_context(|| format!("loading configuration from '{}'", cli.config.display()))?;
    config.apply(cli.overrides());

    let engine = CheckEngine::new(&config)?;
    Ok((config, engine))
}

fn check_all(cli: &Cli, config: &Config, engine: &CheckEngine) -> Outcome {
    // validated by CheckEngine::new
    let settings = config.check_settings().ok();
    let batch = engine.check_files(&cli.filenames);

    for report in &batch.reports {
        println!("checking '{}'", report.path.display());

        if config.inspect {
            if let (Some(summary), Some(settings)) = (&report.summary, &settings) {
                print!(
                    "{}",
                    render_report(
                        summary,
                        settings.output_file_size_precision,
                        settings.output_file_size_unit
                    )
                );
            }
        }

        match &report.result {
            Ok(messages) => {
                for (i, message) in messages.iter().enumerate() {
                    println!("{}. {}", i + 1, message);
                }
                println!("errors found while checking: {}", messages.len());
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    batch.outcome()
}
