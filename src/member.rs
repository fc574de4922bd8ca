//! Field, method, constructor and initializer declarations.

use crate::annotation::{decompile_annotation_value, decompile_tables};
use crate::ast::{
    BodyDeclaration, CallableDeclaration, Expr, FieldDeclaration, InitializerDeclaration, Literal,
    MethodBody, Modifier, Type, VariableDeclarator,
};
use crate::body::BodyDecompiler;
use crate::descriptor::{field_descriptor, method_descriptor};
use crate::error::{DecompileError, Result};
use crate::flags::{self, ACC_INTERFACE, ACC_STATIC, DeclarationKind};
use crate::literal::decompile_literal;
use crate::model::{ClassModel, Constant, FieldModel};
use crate::name::{class_name, class_name_type};
use crate::params::{decompile_parameters, unsynthesized_types};
use crate::signature::{MethodSignature, method_signature, type_signature};

pub fn decompile_field(field: &FieldModel) -> Result<FieldDeclaration> {
    let modifiers = flags::modifiers(field.access, DeclarationKind::Field);
    let annotations = decompile_tables(&field.annotations)?;
    let erased = field_descriptor(&field.descriptor)?;
    let ty = match &field.signature {
        Some(signature) => type_signature(signature)?,
        None => erased.clone(),
    };
    let initializer = field
        .constant_value
        .as_ref()
        .map(|value| field_initializer(value, &erased))
        .transpose()?;

    Ok(FieldDeclaration {
        modifiers,
        annotations,
        variables: vec![VariableDeclarator {
            ty,
            name: field.name.clone(),
            initializer,
        }],
    })
}

/// `ConstantValue` stores booleans and chars as ints; the field type says
/// which literal to write.
fn field_initializer(value: &Constant, erased: &Type) -> Result<Expr> {
    use crate::ast::PrimitiveType as P;

    match (value, erased) {
        (Constant::Int(i), Type::Primitive(P::Boolean)) => Ok(Expr::Literal(Literal::Boolean(*i != 0))),
        (Constant::Int(i), Type::Primitive(P::Char)) => u16::try_from(*i)
            .map(|c| Expr::Literal(Literal::Char(c)))
            .map_err(|_| DecompileError::UnmatchedValueKind {
                kind: format!("int constant {i} on a char field"),
            }),
        (Constant::Int(_), Type::Primitive(P::Byte | P::Short | P::Int))
        | (Constant::Long(_), Type::Primitive(P::Long))
        | (Constant::Float(_), Type::Primitive(P::Float))
        | (Constant::Double(_), Type::Primitive(P::Double))
        | (Constant::String(_), Type::Class(_)) => decompile_literal(value),
        _ => Err(DecompileError::UnmatchedValueKind {
            kind: format!("{} constant on a field of type {erased:?}", value.kind()),
        }),
    }
}

/// Method with its final signature and a `Pending` body.
pub fn method_stub(class: &ClassModel, index: usize, bodies: &dyn BodyDecompiler) -> Result<BodyDeclaration> {
    let callable = callable_stub(class, index, bodies)?;
    Ok(match callable.name.as_str() {
        "<clinit>" => BodyDeclaration::Initializer(InitializerDeclaration {
            is_static: true,
            body: MethodBody::Pending,
            method_index: index,
        }),
        "<init>" => BodyDeclaration::Constructor(CallableDeclaration {
            name: class_name(&class.name).identifier,
            ..callable
        }),
        _ => BodyDeclaration::Method(callable),
    })
}

/// Stub plus the body from `bodies`.
pub fn decompile_method(class: &ClassModel, index: usize, bodies: &dyn BodyDecompiler) -> Result<BodyDeclaration> {
    let mut declaration = method_stub(class, index, bodies)?;
    attach_body(class, &mut declaration, bodies)?;
    Ok(declaration)
}

/// Fills the body of a stub through its `method_index` back-reference.
/// Fields are left untouched.
pub fn attach_body(class: &ClassModel, declaration: &mut BodyDeclaration, bodies: &dyn BodyDecompiler) -> Result<()> {
    let body = match &*declaration {
        BodyDeclaration::Field(_) => return Ok(()),
        BodyDeclaration::Method(stub) | BodyDeclaration::Constructor(stub) => {
            let method = class
                .methods
                .get(stub.method_index)
                .ok_or(DecompileError::MissingMethod(stub.method_index))?;
            bodies.decompile_body(class, method, stub)?
        }
        BodyDeclaration::Initializer(init) => {
            let method = class
                .methods
                .get(init.method_index)
                .ok_or(DecompileError::MissingMethod(init.method_index))?;
            let stub = callable_stub(class, init.method_index, bodies)?;
            bodies.decompile_body(class, method, &stub)?
        }
    };
    if let Some(slot) = declaration.body_mut() {
        *slot = MethodBody::from(body);
    }
    Ok(())
}

fn callable_stub(class: &ClassModel, index: usize, bodies: &dyn BodyDecompiler) -> Result<CallableDeclaration> {
    let method = class.methods.get(index).ok_or(DecompileError::MissingMethod(index))?;

    let mut modifiers = flags::modifiers(method.access, DeclarationKind::Method);
    // No flag encodes `default`.
    if class.access & ACC_INTERFACE != 0 && method.access & ACC_STATIC == 0 && !bodies.is_abstract(method) {
        modifiers.push(Modifier::Default);
        modifiers.sort();
    }

    let annotations = decompile_tables(&method.annotations)?;
    let descriptor = method_descriptor(&method.descriptor)?;
    let signature = match &method.signature {
        Some(signature) => method_signature(signature)?,
        None => MethodSignature {
            type_parameters: Vec::new(),
            parameter_types: unsynthesized_types(
                &descriptor.parameter_types,
                method.parameters.as_deref().unwrap_or_default(),
            ),
            return_type: descriptor.return_type.clone(),
            exception_types: method
                .exceptions
                .iter()
                .map(|e| Type::Class(class_name_type(e)))
                .collect(),
        },
    };
    let parameters = decompile_parameters(method, &descriptor.parameter_types, &signature.parameter_types)?;
    let default_value = method
        .annotation_default
        .as_ref()
        .map(decompile_annotation_value)
        .transpose()?;

    Ok(CallableDeclaration {
        modifiers,
        annotations,
        type_parameters: signature.type_parameters,
        return_type: signature.return_type,
        name: method.name.clone(),
        parameters,
        thrown: signature.exception_types,
        default_value,
        body: MethodBody::Pending,
        method_index: index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, PrimitiveType, Statement};
    use crate::body::StubBodies;
    use crate::flags::{ACC_ABSTRACT, ACC_ENUM, ACC_FINAL, ACC_MANDATED, ACC_PRIVATE, ACC_PUBLIC, ACC_SYNTHETIC};
    use crate::model::{CodeModel, MethodModel, ParameterModel};

    fn code() -> Option<CodeModel> {
        Some(CodeModel {
            max_stack: 1,
            max_locals: 1,
            code_length: 1,
        })
    }

    fn class_with(access: u16, methods: Vec<MethodModel>) -> ClassModel {
        ClassModel {
            access,
            name: "org/example/Demo".into(),
            super_name: Some("java/lang/Object".into()),
            methods,
            ..ClassModel::default()
        }
    }

    fn method(name: &str, descriptor: &str, access: u16, code: Option<CodeModel>) -> MethodModel {
        MethodModel {
            access,
            name: name.into(),
            descriptor: descriptor.into(),
            code,
            ..MethodModel::default()
        }
    }

    fn modifiers_of(decl: &BodyDeclaration) -> Vec<Modifier> {
        match decl {
            BodyDeclaration::Method(c) | BodyDeclaration::Constructor(c) => c.modifiers.clone(),
            other => panic!("not a callable: {other:?}"),
        }
    }

    #[test]
    fn field_uses_descriptor_and_constant() {
        let field = FieldModel {
            access: ACC_PUBLIC | ACC_STATIC | ACC_FINAL,
            name: "ENABLED".into(),
            descriptor: "Z".into(),
            constant_value: Some(Constant::Int(1)),
            ..FieldModel::default()
        };
        let decl = decompile_field(&field).unwrap();
        assert_eq!(decl.modifiers, vec![Modifier::Public, Modifier::Static, Modifier::Final]);
        assert_eq!(decl.variables[0].ty, Type::Primitive(PrimitiveType::Boolean));
        assert_eq!(decl.variables[0].initializer, Some(Expr::Literal(Literal::Boolean(true))));
    }

    #[test]
    fn field_without_constant_has_no_initializer() {
        let field = FieldModel {
            name: "x".into(),
            descriptor: "I".into(),
            ..FieldModel::default()
        };
        assert_eq!(decompile_field(&field).unwrap().variables[0].initializer, None);
    }

    #[test]
    fn field_prefers_signature() {
        let field = FieldModel {
            name: "items".into(),
            descriptor: "Ljava/util/List;".into(),
            signature: Some("Ljava/util/List<Ljava/lang/String;>;".into()),
            ..FieldModel::default()
        };
        let decl = decompile_field(&field).unwrap();
        let Type::Class(list) = &decl.variables[0].ty else { panic!("not a class") };
        assert!(list.arguments.is_some());
    }

    #[test]
    fn mismatched_constant_is_rejected() {
        let field = FieldModel {
            name: "x".into(),
            descriptor: "J".into(),
            constant_value: Some(Constant::String("no".into())),
            ..FieldModel::default()
        };
        assert!(matches!(
            decompile_field(&field),
            Err(DecompileError::UnmatchedValueKind { .. })
        ));
    }

    #[test]
    fn interface_method_with_code_is_default() {
        let class = class_with(
            ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            vec![
                method("greet", "()V", ACC_PUBLIC, code()),
                method("name", "()Ljava/lang/String;", ACC_PUBLIC | ACC_ABSTRACT, None),
                method("of", "()V", ACC_PUBLIC | ACC_STATIC, code()),
            ],
        );
        let greet = method_stub(&class, 0, &StubBodies).unwrap();
        assert!(modifiers_of(&greet).contains(&Modifier::Default));
        let name = method_stub(&class, 1, &StubBodies).unwrap();
        assert!(!modifiers_of(&name).contains(&Modifier::Default));
        let of = method_stub(&class, 2, &StubBodies).unwrap();
        assert!(!modifiers_of(&of).contains(&Modifier::Default));
    }

    #[test]
    fn class_method_is_never_default() {
        let class = class_with(ACC_PUBLIC, vec![method("run", "()V", ACC_PUBLIC, code())]);
        assert_eq!(
            modifiers_of(&method_stub(&class, 0, &StubBodies).unwrap()),
            vec![Modifier::Public]
        );
    }

    #[test]
    fn dispatch_on_special_names() {
        let class = class_with(
            ACC_PUBLIC,
            vec![
                method("<init>", "()V", ACC_PUBLIC, code()),
                method("<clinit>", "()V", ACC_STATIC, code()),
            ],
        );
        match method_stub(&class, 0, &StubBodies).unwrap() {
            BodyDeclaration::Constructor(c) => {
                assert_eq!(c.name, "Demo");
                assert_eq!(c.method_index, 0);
            }
            other => panic!("expected constructor, got {other:?}"),
        }
        assert!(matches!(
            method_stub(&class, 1, &StubBodies).unwrap(),
            BodyDeclaration::Initializer(InitializerDeclaration { is_static: true, method_index: 1, .. })
        ));
    }

    #[test]
    fn exceptions_come_from_raw_list_without_signature() {
        let mut m = method("read", "()I", ACC_PUBLIC, code());
        m.exceptions = vec!["java/io/IOException".into()];
        let class = class_with(ACC_PUBLIC, vec![m]);
        let BodyDeclaration::Method(c) = method_stub(&class, 0, &StubBodies).unwrap() else {
            panic!("expected method");
        };
        assert_eq!(c.thrown, vec![Type::Class(class_name_type("java/io/IOException"))]);
        assert_eq!(c.return_type, Type::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn signature_supplies_generics() {
        let mut m = method("first", "(Ljava/util/List;)Ljava/lang/Object;", ACC_PUBLIC, code());
        m.signature = Some("<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)TT;".into());
        let class = class_with(ACC_PUBLIC, vec![m]);
        let BodyDeclaration::Method(c) = method_stub(&class, 0, &StubBodies).unwrap() else {
            panic!("expected method");
        };
        assert_eq!(c.type_parameters[0].name, "T");
        assert_eq!(c.return_type, Type::Variable("T".into()));
        assert_eq!(c.parameters[0].name, "parameter1");
    }

    #[test]
    fn decompile_method_fills_body() {
        let class = class_with(
            ACC_PUBLIC | ACC_ABSTRACT,
            vec![
                method("run", "()V", ACC_PUBLIC, code()),
                method("stop", "()V", ACC_PUBLIC | ACC_ABSTRACT, None),
            ],
        );
        let run = decompile_method(&class, 0, &StubBodies).unwrap();
        assert!(matches!(
            run.body(),
            Some(MethodBody::Block(Block { statements })) if matches!(statements[0], Statement::Comment(_))
        ));
        let stop = decompile_method(&class, 1, &StubBodies).unwrap();
        assert_eq!(stop.body(), Some(&MethodBody::Absent));
    }

    #[test]
    fn stale_back_reference_is_an_error() {
        let class = class_with(ACC_PUBLIC, vec![]);
        assert_eq!(
            method_stub(&class, 3, &StubBodies).unwrap_err(),
            DecompileError::MissingMethod(3)
        );
    }

    #[test]
    fn char_constant_out_of_range_is_rejected() {
        let field = FieldModel {
            name: "c".into(),
            descriptor: "C".into(),
            constant_value: Some(Constant::Int(70_000)),
            ..FieldModel::default()
        };
        assert!(matches!(
            decompile_field(&field),
            Err(DecompileError::UnmatchedValueKind { .. })
        ));
        let field = FieldModel {
            constant_value: Some(Constant::Int(65)),
            ..field
        };
        assert_eq!(
            decompile_field(&field).unwrap().variables[0].initializer,
            Some(Expr::Literal(Literal::Char(65)))
        );
    }

    #[test]
    fn stale_initializer_back_reference_is_an_error() {
        let class = class_with(ACC_PUBLIC, vec![]);
        let mut init = BodyDeclaration::Initializer(InitializerDeclaration {
            is_static: true,
            body: MethodBody::Pending,
            method_index: 2,
        });
        assert_eq!(
            attach_body(&class, &mut init, &StubBodies).unwrap_err(),
            DecompileError::MissingMethod(2)
        );
    }

    fn param(name: &str, access: u16) -> ParameterModel {
        ParameterModel {
            name: name.into(),
            access,
        }
    }

    fn constructor_parameters(decl: BodyDeclaration) -> Vec<(String, Type)> {
        let BodyDeclaration::Constructor(c) = decl else {
            panic!("expected constructor, got {decl:?}");
        };
        c.parameters.into_iter().map(|p| (p.name, p.ty)).collect()
    }

    #[test]
    fn inner_class_constructor_keeps_mandated_outer_once() {
        let mut ctor = method("<init>", "(Lorg/example/Outer;)V", 0, code());
        ctor.parameters = Some(vec![param("this$0", ACC_FINAL | ACC_MANDATED)]);
        let mut class = class_with(ACC_PUBLIC, vec![ctor]);
        class.name = "org/example/Outer$Inner".into();

        let params = constructor_parameters(method_stub(&class, 0, &StubBodies).unwrap());
        assert_eq!(
            params,
            vec![("this$0".to_string(), Type::Class(class_name_type("org/example/Outer")))]
        );
    }

    #[test]
    fn enum_constructor_keeps_synthetic_name_and_ordinal_once() {
        let mut ctor = method("<init>", "(Ljava/lang/String;ILjava/lang/String;)V", ACC_PRIVATE, code());
        ctor.parameters = Some(vec![
            param("$enum$name", ACC_SYNTHETIC),
            param("$enum$ordinal", ACC_SYNTHETIC),
            param("label", 0),
        ]);
        let class = class_with(ACC_PUBLIC | ACC_FINAL | ACC_ENUM, vec![ctor]);

        let string = Type::Class(class_name_type("java/lang/String"));
        let params = constructor_parameters(method_stub(&class, 0, &StubBodies).unwrap());
        assert_eq!(
            params,
            vec![
                ("$enum$name".to_string(), string.clone()),
                ("$enum$ordinal".to_string(), Type::Primitive(PrimitiveType::Int)),
                ("label".to_string(), string),
            ]
        );
    }
}
