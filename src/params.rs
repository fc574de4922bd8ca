//! Reconciles the three sources of parameter information a method carries:
//! the erased descriptor, the generic signature (which omits parameters the
//! compiler synthesized) and the optional `MethodParameters` table.

use crate::annotation::decompile_annotations;
use crate::ast::{Parameter, Type};
use crate::error::{DecompileError, Result};
use crate::flags::{self, DeclarationKind, Flag};
use crate::model::{AnnotationModel, MethodModel, ParameterModel};

fn is_synthesized(param: &ParameterModel) -> bool {
    flags::has(param.access, DeclarationKind::Parameter, Flag::Synthetic)
        || flags::has(param.access, DeclarationKind::Parameter, Flag::Mandated)
}

/// Synthesized parameters take their type from the descriptor, the rest
/// from the signature. Without a parameter table the signature alone is
/// authoritative.
pub fn parameter_types(desc: &[Type], sig: &[Type], params: &[ParameterModel]) -> Result<Vec<Type>> {
    match (desc, sig, params) {
        ([head, desc_tail @ ..], _, [param, params_tail @ ..]) if is_synthesized(param) => {
            prepend(head, parameter_types(desc_tail, sig, params_tail)?)
        }
        ([_, desc_tail @ ..], [head, sig_tail @ ..], [_, params_tail @ ..]) => {
            prepend(head, parameter_types(desc_tail, sig_tail, params_tail)?)
        }
        (_, _, []) => Ok(sig.to_vec()),
        _ => Err(DecompileError::ParameterMismatch {
            descriptor: desc.len(),
            signature: sig.len(),
            parameters: params.len(),
        }),
    }
}

/// The parameter list a signature would carry for `desc`: descriptor
/// positions the table marks as synthesized are dropped.
pub fn unsynthesized_types(desc: &[Type], params: &[ParameterModel]) -> Vec<Type> {
    desc.iter()
        .enumerate()
        .filter(|(index, _)| !params.get(*index).is_some_and(is_synthesized))
        .map(|(_, ty)| ty.clone())
        .collect()
}

fn prepend(head: &Type, mut tail: Vec<Type>) -> Result<Vec<Type>> {
    tail.insert(0, head.clone());
    Ok(tail)
}

/// Builds the parameter declarations of `method` from the already parsed
/// descriptor and signature parameter types.
pub fn decompile_parameters(method: &MethodModel, desc: &[Type], sig: &[Type]) -> Result<Vec<Parameter>> {
    let nodes = method.parameters.as_deref().unwrap_or_default();
    let types = parameter_types(desc, sig, nodes)?;
    let count = types.len();
    let is_varargs = flags::has(method.access, DeclarationKind::Method, Flag::Varargs);
    types
        .into_iter()
        .enumerate()
        .map(|(index, ty)| -> Result<Parameter> {
            let node = nodes.get(index);
            let modifiers = match node {
                Some(n) => flags::modifiers(n.access, DeclarationKind::Parameter),
                None => Vec::new(),
            };
            let annotations = decompile_annotations(&[
                annotations_at(&method.visible_parameter_annotations, index),
                annotations_at(&method.invisible_parameter_annotations, index),
            ])?;
            let name = match node {
                Some(n) if !n.name.is_empty() => n.name.clone(),
                _ => format!("parameter{}", index + 1),
            };
            Ok(Parameter {
                modifiers,
                annotations,
                ty,
                var_args: is_varargs && index + 1 == count,
                name,
            })
        })
        .collect()
}

fn annotations_at(tables: &Option<Vec<Vec<AnnotationModel>>>, index: usize) -> Option<&[AnnotationModel]> {
    tables.as_ref().and_then(|t| t.get(index)).map(Vec::as_slice)
}
