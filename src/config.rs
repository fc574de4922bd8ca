use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};

pub const OUTPUT_ENV: &str = "CLASS_DECOMPILER_OUT";
pub const JOBS_ENV: &str = "CLASS_DECOMPILER_JOBS";

/// Settings for one run, resolved from flags, then the environment, then
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    /// `None` leaves the pool size to rayon.
    pub jobs: Option<usize>,
    pub format: OutputFormat,
    pub overwrite: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            output_dir: resolve_output_dir(cli),
            jobs: resolve_jobs(cli)?,
            format: cli.format,
            overwrite: cli.overwrite,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            jobs: None,
            format: OutputFormat::Java,
            overwrite: false,
        }
    }
}

pub fn resolve_output_dir(cli: &Cli) -> PathBuf {
    if let Some(p) = cli.output.clone() {
        return p;
    }
    match env::var_os(OUTPUT_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from("."),
    }
}

pub fn resolve_jobs(cli: &Cli) -> Result<Option<usize>> {
    if let Some(n) = cli.jobs {
        return Ok(Some(n));
    }
    match env::var(JOBS_ENV) {
        Ok(v) if !v.trim().is_empty() => {
            let n = v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{JOBS_ENV} is not a thread count: {v}"))?;
            Ok(Some(n))
        }
        _ => Ok(None),
    }
}

/// Sizes the global rayon pool; `0` or `None` keeps rayon's default.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<()> {
    if let Some(n) = jobs.filter(|n| *n > 0) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_win_over_defaults() {
        let cli = Cli::parse_from(["class-decompiler", "-o", "out", "-j", "3", "--overwrite", "A.class"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.jobs, Some(3));
        assert!(config.overwrite);
        assert_eq!(config.format, OutputFormat::Java);
    }

    #[test]
    fn format_selects_extension() {
        let cli = Cli::parse_from(["class-decompiler", "--format", "ast", "A.class"]);
        assert_eq!(cli.format.extension(), "json");
        assert_eq!(OutputFormat::Java.extension(), "java");
    }
}
