//! Generic signatures (JVMS §4.7.9.1).

use crate::ast::{ClassType, Type, TypeArgument, TypeParameter};
use crate::descriptor::primitive;
use crate::error::{DecompileError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: ClassType,
    pub interfaces: Vec<ClassType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
    pub exception_types: Vec<Type>,
}

pub fn class_signature(signature: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(signature);
    let type_parameters = p.type_parameters()?;
    let superclass = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        interfaces,
    })
}

pub fn method_signature(signature: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(signature);
    let type_parameters = p.type_parameters()?;
    p.expect(b'(')?;
    let mut parameter_types = Vec::new();
    while !p.eat(b')') {
        parameter_types.push(p.java_type()?);
    }
    let return_type = if p.eat(b'V') { Type::Void } else { p.java_type()? };
    let mut exception_types = Vec::new();
    while p.eat(b'^') {
        exception_types.push(p.reference_type()?);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameter_types,
        return_type,
        exception_types,
    })
}

/// Field signature: a single reference type.
pub fn type_signature(signature: &str) -> Result<Type> {
    let mut p = Parser::new(signature);
    let ty = p.java_type()?;
    p.finish()?;
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> DecompileError {
        DecompileError::InvalidSignature {
            signature: self.input.to_string(),
            reason: format!("{} at offset {}", reason.into(), self.pos),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", b as char)))
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut params = Vec::new();
        if !self.eat(b'<') {
            return Ok(params);
        }
        while !self.eat(b'>') {
            let name = self.identifier()?.to_string();
            self.expect(b':')?;
            let mut bounds = Vec::new();
            if matches!(self.peek(), Some(b'L' | b'T' | b'[')) {
                bounds.push(self.reference_type()?);
            }
            while self.eat(b':') {
                bounds.push(self.reference_type()?);
            }
            if bounds.len() == 1 && is_object(&bounds[0]) {
                bounds.clear();
            }
            params.push(TypeParameter { name, bounds });
        }
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn java_type(&mut self) -> Result<Type> {
        match self.peek().and_then(primitive) {
            Some(p) => {
                self.pos += 1;
                Ok(Type::Primitive(p))
            }
            None => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<Type> {
        match self.peek() {
            Some(b'L') => Ok(Type::Class(self.class_type()?)),
            Some(b'T') => {
                self.pos += 1;
                let name = self.identifier()?.to_string();
                self.expect(b';')?;
                Ok(Type::Variable(name))
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(Type::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.error("expected a reference type")),
        }
    }

    fn class_type(&mut self) -> Result<ClassType> {
        self.expect(b'L')?;
        let mut ty = ClassType::new(None, self.identifier()?);
        while self.eat(b'/') {
            ty = ClassType::new(Some(ty), self.identifier()?);
        }
        ty.arguments = self.type_arguments()?;
        while self.eat(b'.') {
            let mut inner = ClassType::new(Some(ty), self.identifier()?);
            inner.arguments = self.type_arguments()?;
            ty = inner;
        }
        self.expect(b';')?;
        Ok(ty)
    }

    fn type_arguments(&mut self) -> Result<Option<Vec<TypeArgument>>> {
        if !self.eat(b'<') {
            return Ok(None);
        }
        let mut args = Vec::new();
        while !self.eat(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    TypeArgument::Wildcard
                }
                Some(b'+') => {
                    self.pos += 1;
                    TypeArgument::Extends(self.reference_type()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    TypeArgument::Super(self.reference_type()?)
                }
                _ => TypeArgument::Type(self.reference_type()?),
            };
            args.push(arg);
        }
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(Some(args))
    }
}

fn is_object(ty: &Type) -> bool {
    matches!(ty, Type::Class(c) if c.arguments.is_none() && c.qualified_name() == "java.lang.Object")
}
