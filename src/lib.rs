//! # class-decompiler
//!
//! Rebuilds Java declarations from compiled class files: the type header,
//! fields with constant initializers, and method and constructor signatures
//! with generics, annotations and parameter names. Method bodies come from a
//! pluggable [`body::BodyDecompiler`].
//!
//! ## Architecture
//!
//! - **reader**: class-file bytes to a [`model::ClassModel`]
//! - **descriptor** / **signature**: JVM type grammars to AST types
//! - **flags**: access flags to modifiers and back
//! - **literal** / **annotation**: constants and annotation values to expressions
//! - **params**: reconciles descriptor, signature and MethodParameters
//! - **member** / **class**: declaration builders
//! - **decompile**: two-pass orchestration and the parallel run
//! - **emit**: Java source rendering
//! - **structure**: tree-sitter syntax check of emitted source
//! - **scan** / **output**: input discovery and atomic output files

pub mod annotation;
pub mod ast;
pub mod body;
pub mod class;
pub mod cli;
pub mod config;
pub mod decompile;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod flags;
pub mod literal;
pub mod member;
pub mod model;
pub mod name;
pub mod output;
pub mod params;
pub mod reader;
pub mod scan;
pub mod signature;
pub mod structure;
