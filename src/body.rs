//! Seam for method-body decompilation.
//!
//! Control-flow reconstruction lives behind [`BodyDecompiler`]; the crate
//! itself ships only [`StubBodies`].

use crate::ast::{Block, CallableDeclaration, Statement};
use crate::error::Result;
use crate::model::{ClassModel, MethodModel};

pub trait BodyDecompiler: Sync {
    /// True when the method has no code to decompile.
    fn is_abstract(&self, method: &MethodModel) -> bool {
        method.code.is_none()
    }

    /// `stub` carries the finished signature; `None` means no body.
    fn decompile_body(
        &self,
        class: &ClassModel,
        method: &MethodModel,
        stub: &CallableDeclaration,
    ) -> Result<Option<Block>>;
}

/// Leaves a comment with the code size where the body would go.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBodies;

impl BodyDecompiler for StubBodies {
    fn decompile_body(
        &self,
        _class: &ClassModel,
        method: &MethodModel,
        _stub: &CallableDeclaration,
    ) -> Result<Option<Block>> {
        Ok(method.code.as_ref().map(|code| Block {
            statements: vec![Statement::Comment(format!(
                "{} bytes of bytecode, max_stack={}, max_locals={}",
                code.code_length, code.max_stack, code.max_locals
            ))],
        }))
    }
}
