//! Field and method descriptors (JVMS §4.3): the erased type encoding.

use crate::ast::{PrimitiveType, Type};
use crate::error::{DecompileError, Result};
use crate::name::class_name_type;

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
}

pub fn field_descriptor(descriptor: &str) -> Result<Type> {
    let invalid = |reason: &str| DecompileError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
        reason: reason.to_string(),
    };
    let (ty, rest) = parse_field_type(descriptor).ok_or_else(|| invalid("expected a field type"))?;
    if !rest.is_empty() {
        return Err(invalid("trailing characters"));
    }
    Ok(ty)
}

pub fn method_descriptor(descriptor: &str) -> Result<MethodDescriptor> {
    let invalid = |reason: &str| DecompileError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
        reason: reason.to_string(),
    };
    let mut rest = descriptor
        .strip_prefix('(')
        .ok_or_else(|| invalid("expected `(`"))?;
    let mut parameter_types = Vec::new();
    while !rest.starts_with(')') {
        let (ty, tail) = parse_field_type(rest).ok_or_else(|| invalid("expected a parameter type"))?;
        parameter_types.push(ty);
        rest = tail;
    }
    rest = &rest[1..];
    let return_type = if rest == "V" {
        Type::Void
    } else {
        match parse_field_type(rest) {
            Some((ty, "")) => ty,
            Some(_) => return Err(invalid("trailing characters")),
            None => return Err(invalid("expected a return type")),
        }
    };
    Ok(MethodDescriptor {
        parameter_types,
        return_type,
    })
}

pub(crate) fn primitive(tag: u8) -> Option<PrimitiveType> {
    Some(match tag {
        b'Z' => PrimitiveType::Boolean,
        b'B' => PrimitiveType::Byte,
        b'C' => PrimitiveType::Char,
        b'S' => PrimitiveType::Short,
        b'I' => PrimitiveType::Int,
        b'J' => PrimitiveType::Long,
        b'F' => PrimitiveType::Float,
        b'D' => PrimitiveType::Double,
        _ => return None,
    })
}

fn parse_field_type(input: &str) -> Option<(Type, &str)> {
    let tag = *input.as_bytes().first()?;
    if let Some(p) = primitive(tag) {
        return Some((Type::Primitive(p), &input[1..]));
    }
    match tag {
        b'L' => {
            let end = input.find(';')?;
            let name = &input[1..end];
            if name.is_empty() {
                return None;
            }
            Some((Type::Class(class_name_type(name)), &input[end + 1..]))
        }
        b'[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Some((Type::Array(Box::new(component)), rest))
        }
        _ => None,
    }
}
