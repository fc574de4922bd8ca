//! Renders a [`CompilationUnit`] as Java source.
//!
//! Layout is fixed: four-space indentation, one blank line between members,
//! declaration annotations on their own lines.

use std::fmt;

use crate::ast::{
    Annotation, BodyDeclaration, CallableDeclaration, ClassType, CompilationUnit, Expr, FieldDeclaration,
    Literal, MethodBody, Modifier, Parameter, Statement, Type, TypeArgument, TypeDeclaration, TypeKind,
    TypeParameter,
};
use crate::error::{DecompileError, Result};

const INDENT: &str = "    ";

pub fn render(unit: &CompilationUnit) -> Result<String> {
    let mut out = String::new();
    if let Some(comment) = &unit.comment {
        out.push_str("/*\n");
        for line in comment.lines() {
            out.push_str(" * ");
            out.push_str(&comment_safe(line));
            out.push('\n');
        }
        out.push_str(" */\n");
    }
    if let Some(package) = &unit.package {
        out.push_str(&format!("package {package};\n\n"));
    }
    render_type(&mut out, &unit.declaration)?;
    Ok(out)
}

/// Keeps a line from ending the block comment it is printed in. Unicode
/// escapes are translated before lexing, so `\u002a/` is defused as well.
fn comment_safe(line: &str) -> String {
    line.replace('\\', "\\\\").replace("*/", "*\\/")
}

fn render_type(out: &mut String, decl: &TypeDeclaration) -> Result<()> {
    for annotation in &decl.annotations {
        out.push_str(&format!("{annotation}\n"));
    }
    out.push_str(&modifier_prefix(&decl.modifiers));
    out.push_str(match decl.kind {
        TypeKind::Class => "class ",
        TypeKind::Interface => "interface ",
        TypeKind::Annotation => "@interface ",
    });
    out.push_str(&decl.name);
    out.push_str(&type_parameters(&decl.type_parameters));
    if !decl.extended_types.is_empty() {
        out.push_str(&format!(" extends {}", join(&decl.extended_types, ", ")));
    }
    if !decl.implemented_types.is_empty() {
        out.push_str(&format!(" implements {}", join(&decl.implemented_types, ", ")));
    }
    if !decl.permitted_types.is_empty() {
        out.push_str(&format!(" permits {}", join(&decl.permitted_types, ", ")));
    }
    out.push_str(" {\n");

    for (i, member) in decl.members.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match member {
            BodyDeclaration::Field(field) => render_field(out, field),
            BodyDeclaration::Method(method) => render_callable(out, method, false)?,
            BodyDeclaration::Constructor(ctor) => render_callable(out, ctor, true)?,
            BodyDeclaration::Initializer(init) => {
                out.push_str(INDENT);
                out.push_str(if init.is_static { "static " } else { "" });
                render_body(out, &init.body, "<clinit>")?;
            }
        }
    }
    out.push_str("}\n");
    Ok(())
}

fn render_field(out: &mut String, field: &FieldDeclaration) {
    for annotation in &field.annotations {
        out.push_str(&format!("{INDENT}{annotation}\n"));
    }
    let declarators: Vec<String> = field
        .variables
        .iter()
        .map(|v| match &v.initializer {
            Some(init) => format!("{} = {init}", v.name),
            None => v.name.clone(),
        })
        .collect();
    let ty = field.variables.first().map(|v| v.ty.to_string()).unwrap_or_default();
    out.push_str(&format!(
        "{INDENT}{}{ty} {};\n",
        modifier_prefix(&field.modifiers),
        declarators.join(", ")
    ));
}

fn render_callable(out: &mut String, callable: &CallableDeclaration, is_constructor: bool) -> Result<()> {
    for annotation in &callable.annotations {
        out.push_str(&format!("{INDENT}{annotation}\n"));
    }
    out.push_str(INDENT);
    out.push_str(&modifier_prefix(&callable.modifiers));
    let type_params = type_parameters(&callable.type_parameters);
    if !type_params.is_empty() {
        out.push_str(&type_params);
        out.push(' ');
    }
    if !is_constructor {
        out.push_str(&format!("{} ", callable.return_type));
    }
    let params: Vec<String> = callable.parameters.iter().map(render_parameter).collect();
    out.push_str(&format!("{}({})", callable.name, params.join(", ")));
    if !callable.thrown.is_empty() {
        out.push_str(&format!(" throws {}", join(&callable.thrown, ", ")));
    }
    if let Some(default) = &callable.default_value {
        out.push_str(&format!(" default {default}"));
    }
    out.push(' ');
    render_body(out, &callable.body, &callable.name)
}

fn render_body(out: &mut String, body: &MethodBody, name: &str) -> Result<()> {
    match body {
        MethodBody::Pending => return Err(DecompileError::PendingBody(name.to_string())),
        MethodBody::Absent => {
            // Drop the space before `;`.
            if out.ends_with(' ') {
                out.pop();
            }
            out.push_str(";\n");
        }
        MethodBody::Block(block) => {
            out.push_str("{\n");
            for statement in &block.statements {
                match statement {
                    Statement::Comment(text) => {
                        for line in text.lines() {
                            out.push_str(&format!("{INDENT}{INDENT}// {line}\n"));
                        }
                    }
                    Statement::Source(text) => {
                        for line in text.lines() {
                            out.push_str(&format!("{INDENT}{INDENT}{line}\n"));
                        }
                    }
                }
            }
            out.push_str(&format!("{INDENT}}}\n"));
        }
    }
    Ok(())
}

fn render_parameter(param: &Parameter) -> String {
    let mut s = String::new();
    for annotation in &param.annotations {
        s.push_str(&format!("{annotation} "));
    }
    s.push_str(&modifier_prefix(&param.modifiers));
    match (&param.ty, param.var_args) {
        (Type::Array(component), true) => s.push_str(&format!("{component}...")),
        (ty, _) => s.push_str(&ty.to_string()),
    }
    s.push(' ');
    s.push_str(&param.name);
    s
}

fn modifier_prefix(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(|m| format!("{} ", m.keyword())).collect()
}

fn type_parameters(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", join(params, ", "))
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Class(class) => write!(f, "{class}"),
            Type::Variable(name) => f.write_str(name),
            Type::Array(component) => write!(f, "{component}[]"),
            Type::Void => f.write_str("void"),
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}.")?;
        }
        f.write_str(&self.name)?;
        if let Some(args) = &self.arguments {
            write!(f, "<{}>", join(args, ", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Type(ty) => write!(f, "{ty}"),
            TypeArgument::Wildcard => f.write_str("?"),
            TypeArgument::Extends(ty) => write!(f, "? extends {ty}"),
            TypeArgument::Super(ty) => write!(f, "? super {ty}"),
        }
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bounds.is_empty() {
            write!(f, " extends {}", join(&self.bounds, " & "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Marker { name } => write!(f, "@{name}"),
            Annotation::Normal { name, pairs } => {
                let pairs: Vec<String> = pairs.iter().map(|p| format!("{} = {}", p.name, p.value)).collect();
                write!(f, "@{name}({})", pairs.join(", "))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{literal}"),
            Expr::Class(ty) => write!(f, "{ty}.class"),
            Expr::Name(name) => f.write_str(name),
            Expr::FieldAccess { scope, name } => write!(f, "{scope}.{name}"),
            Expr::ArrayInitializer(items) => write!(f, "{{{}}}", join(items, ", ")),
            Expr::Annotation(annotation) => write!(f, "{annotation}"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Char(c) => write!(f, "'{}'", escape_char(*c, '\'')),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Long(l) => write!(f, "{l}L"),
            Literal::Double(text) => f.write_str(text),
            Literal::String(s) => {
                f.write_str("\"")?;
                for unit in s.encode_utf16() {
                    f.write_str(&escape_char(unit, '"'))?;
                }
                f.write_str("\"")
            }
        }
    }
}

/// Escapes one UTF-16 unit; surrogates and controls use `\uXXXX`.
fn escape_char(unit: u16, quote: char) -> String {
    match char::from_u32(u32::from(unit)) {
        Some('\\') => "\\\\".to_string(),
        Some('\n') => "\\n".to_string(),
        Some('\t') => "\\t".to_string(),
        Some('\r') => "\\r".to_string(),
        Some('\u{8}') => "\\b".to_string(),
        Some('\u{c}') => "\\f".to_string(),
        Some(c) if c == quote => format!("\\{c}"),
        Some(c) if !c.is_control() => c.to_string(),
        _ => format!("\\u{unit:04x}"),
    }
}
