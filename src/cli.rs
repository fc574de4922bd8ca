use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-decompiler")]
#[command(about = "Rebuild Java declarations (types, fields, method signatures) from class files and jars")]
pub struct Cli {
    /// Class files, jars, or directories holding either.
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Java)]
    pub format: OutputFormat,

    /// Print a JSON run report on stdout.
    #[arg(long)]
    pub report: bool,

    #[arg(long)]
    pub overwrite: bool,

    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Java source.
    Java,
    /// The declaration tree as JSON.
    Ast,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Java => "java",
            OutputFormat::Ast => "json",
        }
    }
}
