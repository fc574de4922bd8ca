//! Drives a run: bytes to declaration tree, tree to output file.
//!
//! A class goes through two passes. The structure pass builds every member
//! with a `Pending` body; the body pass then fills bodies in parallel, each
//! member finding its `MethodModel` through `method_index`. Inputs are
//! processed in parallel too, and every failure is logged and reported.

use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use crate::ast::CompilationUnit;
use crate::body::{BodyDecompiler, StubBodies};
use crate::class;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::emit::render;
use crate::error::{DecompileError, Result};
use crate::member::attach_body;
use crate::model::ClassModel;
use crate::output::{hash_content, write_atomic};
use crate::reader::read_class;
use crate::scan::ClassInput;
use crate::structure::{SourceSummary, check_source};

pub fn decompile_class(bytes: &[u8], bodies: &dyn BodyDecompiler) -> Result<CompilationUnit> {
    let class = read_class(bytes)?;
    let mut unit = class::decompile_class(&class, bodies)?;
    attach_bodies(&class, &mut unit, bodies)?;
    Ok(unit)
}

pub fn attach_bodies(class: &ClassModel, unit: &mut CompilationUnit, bodies: &dyn BodyDecompiler) -> Result<()> {
    unit.declaration
        .members
        .par_iter_mut()
        .try_for_each(|member| attach_body(class, member, bodies))
}

/// `org/example/A.class` becomes `org/example/A.{extension}`. Names that
/// would resolve outside the output directory are rejected.
pub fn output_file_name(name: &str, extension: &str) -> Result<String> {
    let escapes = Path::new(name)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(DecompileError::UnsafeOutputPath(name.to_string()));
    }
    match name.strip_suffix(".class") {
        Some(stem) if !stem.is_empty() && !stem.ends_with('/') => Ok(format!("{stem}.{extension}")),
        _ => Err(DecompileError::NotAClassFile(name.to_string())),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub inputs: usize,
    pub written: Vec<Written>,
    pub failures: Vec<Failure>,
    pub elapsed_ms: u128,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Written {
    pub origin: String,
    pub path: PathBuf,
    pub sha256: String,
    /// `None` for AST output, which is not Java.
    pub syntax_ok: Option<bool>,
    /// What tree-sitter saw in the emitted source.
    pub structure: Option<SourceSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub origin: String,
    pub error: String,
}

pub fn run(config: &Config, inputs: &[ClassInput]) -> Report {
    run_with(config, inputs, &StubBodies)
}

pub fn run_with(config: &Config, inputs: &[ClassInput], bodies: &dyn BodyDecompiler) -> Report {
    let start = Instant::now();
    let total = inputs.len();

    let results: Vec<std::result::Result<Written, Failure>> = inputs
        .par_iter()
        .enumerate()
        .map(|(i, input)| {
            tracing::info!("Decompiling [{} of {}] {} from {}", i + 1, total, input.name, input.origin);
            process(config, input, bodies).map_err(|e| {
                tracing::warn!(origin = %input.origin, "{e:#}");
                Failure {
                    origin: input.origin.clone(),
                    error: format!("{e:#}"),
                }
            })
        })
        .collect();

    let mut written = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(w) => written.push(w),
            Err(f) => failures.push(f),
        }
    }

    let elapsed_ms = start.elapsed().as_millis();
    tracing::info!(
        written = written.len(),
        failed = failures.len(),
        elapsed_ms,
        "run finished"
    );
    Report {
        inputs: total,
        written,
        failures,
        elapsed_ms,
    }
}

fn process(config: &Config, input: &ClassInput, bodies: &dyn BodyDecompiler) -> anyhow::Result<Written> {
    let file_name = output_file_name(&input.name, config.format.extension())?;
    let unit = decompile_class(&input.bytes, bodies)?;

    let (contents, syntax_ok, structure) = match config.format {
        OutputFormat::Java => {
            let source = render(&unit)?;
            let structure = check_source(&source);
            let ok = structure.as_ref().is_some_and(|s| !s.has_errors);
            if !ok {
                tracing::warn!(origin = %input.origin, "emitted source does not parse cleanly");
            }
            (source, Some(ok), structure)
        }
        OutputFormat::Ast => (
            serde_json::to_string_pretty(&unit).context("Failed to serialize declaration tree")?,
            None,
            None,
        ),
    };

    let path = config.output_dir.join(&file_name);
    write_atomic(&path, &contents, config.overwrite)?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(Written {
        origin: input.origin.clone(),
        sha256: hash_content(&contents),
        path,
        syntax_ok,
        structure,
    })
}
