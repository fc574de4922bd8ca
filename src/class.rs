//! Class-level assembly: package, type header and member stubs.

use crate::annotation::decompile_tables;
use crate::ast::{BodyDeclaration, ClassType, CompilationUnit, TypeDeclaration, TypeKind, TypeParameter};
use crate::body::BodyDecompiler;
use crate::error::Result;
use crate::flags::{self, ACC_ANNOTATION, ACC_INTERFACE, DeclarationKind};
use crate::member::{decompile_field, method_stub};
use crate::model::ClassModel;
use crate::name::{class_name, class_name_type};
use crate::signature::class_signature;

struct Supertypes {
    type_parameters: Vec<TypeParameter>,
    extended: Vec<ClassType>,
    implemented: Vec<ClassType>,
    permitted: Vec<ClassType>,
}

pub fn type_kind(access: u16) -> TypeKind {
    if access & ACC_ANNOTATION != 0 {
        TypeKind::Annotation
    } else if access & ACC_INTERFACE != 0 {
        TypeKind::Interface
    } else {
        TypeKind::Class
    }
}

pub fn provenance_comment(class: &ClassModel) -> String {
    format!(
        "Source File: {}\nClass-file Format Version: {}\nSource Debug Extension: {} // See JSR-45 https://www.jcp.org/en/jsr/detail?id=045",
        class.source_file.as_deref().unwrap_or("<none>"),
        class.version,
        class.source_debug.as_deref().unwrap_or("<none>"),
    )
}

/// Builds the declaration tree with every callable body still `Pending`;
/// [`crate::decompile::attach_bodies`] completes it.
pub fn decompile_class(class: &ClassModel, bodies: &dyn BodyDecompiler) -> Result<CompilationUnit> {
    let name = class_name(&class.name);
    let kind = type_kind(class.access);
    let modifiers = flags::modifiers(class.access, DeclarationKind::Class);
    let annotations = decompile_tables(&class.annotations)?;

    let mut members = Vec::with_capacity(class.fields.len() + class.methods.len());
    for field in &class.fields {
        members.push(BodyDeclaration::Field(decompile_field(field)?));
    }
    for index in 0..class.methods.len() {
        members.push(method_stub(class, index, bodies)?);
    }

    let supertypes = match kind {
        TypeKind::Annotation => Supertypes {
            type_parameters: Vec::new(),
            extended: Vec::new(),
            implemented: Vec::new(),
            permitted: Vec::new(),
        },
        TypeKind::Class | TypeKind::Interface => {
            let mut s = supertypes(class)?;
            // The interfaces an interface extends sit in the class-file slot
            // a class uses for implemented interfaces.
            if kind == TypeKind::Interface {
                s.extended = std::mem::take(&mut s.implemented);
            }
            s
        }
    };

    Ok(CompilationUnit {
        comment: Some(provenance_comment(class)),
        package: name.qualifier,
        declaration: TypeDeclaration {
            kind,
            modifiers,
            annotations,
            name: name.identifier,
            type_parameters: supertypes.type_parameters,
            extended_types: supertypes.extended,
            implemented_types: supertypes.implemented,
            permitted_types: supertypes.permitted,
            members,
        },
    })
}

/// Sealed `permits` lists are not derived and stay empty.
fn supertypes(class: &ClassModel) -> Result<Supertypes> {
    Ok(match &class.signature {
        None => Supertypes {
            type_parameters: Vec::new(),
            extended: class.super_name.iter().map(|s| class_name_type(s)).collect(),
            implemented: class.interfaces.iter().map(|i| class_name_type(i)).collect(),
            permitted: Vec::new(),
        },
        Some(signature) => {
            let s = class_signature(signature)?;
            Supertypes {
                type_parameters: s.type_parameters,
                extended: vec![s.superclass],
                implemented: s.interfaces,
                permitted: Vec::new(),
            }
        }
    })
}
