use anyhow::{Context, Result};
use clap::Parser;
use class_decompiler::cli::Cli;
use class_decompiler::config::{Config, init_thread_pool};
use class_decompiler::decompile::run;
use class_decompiler::scan::collect_inputs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(&cli)?;
    init_thread_pool(config.jobs)?;

    let inputs = collect_inputs(&cli.inputs)?;
    tracing::info!(
        inputs = inputs.len(),
        output = %config.output_dir.display(),
        "collected class files"
    );

    let report = run(&config, &inputs);
    if cli.report {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
        );
    }

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("[class-decompiler] {}: {}", failure.origin, failure.error);
        }
        std::process::exit(1);
    }
    Ok(())
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, defaulting to `info`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
