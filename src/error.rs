//! Errors raised while turning a class file into declarations.
//!
//! Three families: the input is malformed (`ClassFormat`, `InvalidDescriptor`,
//! `InvalidSignature`), the model has a shape the decoders do not accept
//! (`UnmatchedValueKind`, `InvalidEnumValue`, `ParameterMismatch`, `NotAName`),
//! or an input name cannot become an output path (`NotAClassFile`,
//! `UnsafeOutputPath`).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompileError {
    #[error("malformed class file: {reason}")]
    ClassFormat { reason: String },
    #[error("invalid descriptor `{descriptor}`: {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },
    #[error("invalid signature `{signature}`: {reason}")]
    InvalidSignature { signature: String, reason: String },
    #[error("unmatched value kind: {kind}")]
    UnmatchedValueKind { kind: String },
    #[error("invalid enum value shape: {descriptor}.{constant}")]
    InvalidEnumValue { descriptor: String, constant: String },
    #[error("cannot reconcile parameter types: descriptor {descriptor}, signature {signature}, parameters {parameters}")]
    ParameterMismatch {
        descriptor: usize,
        signature: usize,
        parameters: usize,
    },
    #[error("type `{0}` cannot be used as a name")]
    NotAName(String),
    #[error("invalid file name: {0} does not end with .class")]
    NotAClassFile(String),
    #[error("output path escapes the output directory: {0}")]
    UnsafeOutputPath(String),
    #[error("no method at index {0} in the class model")]
    MissingMethod(usize),
    #[error("method body of `{0}` has not been decompiled")]
    PendingBody(String),
}

impl DecompileError {
    pub fn class_format(reason: impl Into<String>) -> Self {
        Self::ClassFormat {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = DecompileError> = std::result::Result<T, E>;
