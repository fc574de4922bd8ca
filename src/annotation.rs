//! Annotation tables to annotation expressions.

use crate::ast::{Annotation, Expr, MemberValuePair, Type};
use crate::descriptor::field_descriptor;
use crate::error::{DecompileError, Result};
use crate::literal::decompile_literal;
use crate::model::{AnnotationModel, AnnotationTables, AnnotationValue};
use crate::name::type_to_name;

/// Decodes one element value: `RetentionPolicy.RUNTIME`, `@Nested(..)`,
/// `{a, b}` or a literal.
pub fn decompile_annotation_value(value: &AnnotationValue) -> Result<Expr> {
    match value {
        AnnotationValue::Enum {
            descriptor,
            constant,
        } => {
            let invalid = || DecompileError::InvalidEnumValue {
                descriptor: descriptor.clone(),
                constant: constant.clone(),
            };
            let scope = match field_descriptor(descriptor).map_err(|_| invalid())? {
                Type::Class(class) => class,
                _ => return Err(invalid()),
            };
            Ok(Expr::FieldAccess {
                scope: Box::new(Expr::Name(scope.qualified_name())),
                name: constant.clone(),
            })
        }
        AnnotationValue::Annotation(nested) => Ok(Expr::Annotation(decompile_annotation(nested)?)),
        AnnotationValue::Array(elements) => Ok(Expr::ArrayInitializer(
            elements
                .iter()
                .map(decompile_annotation_value)
                .collect::<Result<_>>()?,
        )),
        AnnotationValue::Const(constant) => decompile_literal(constant),
    }
}

/// A lone `value` pair is still written out as `value = ..`; the
/// single-member shorthand is not produced.
pub fn decompile_annotation(node: &AnnotationModel) -> Result<Annotation> {
    let name = type_to_name(&field_descriptor(&node.descriptor)?)?;
    Ok(match &node.values {
        None => Annotation::Marker { name },
        Some(values) => Annotation::Normal {
            name,
            pairs: values
                .iter()
                .map(|(key, value)| -> Result<MemberValuePair> {
                    Ok(MemberValuePair {
                        name: key.clone(),
                        value: decompile_annotation_value(value)?,
                    })
                })
                .collect::<Result<_>>()?,
        },
    })
}

/// Concatenates every present list, each in its own order.
pub fn decompile_annotations(lists: &[Option<&[AnnotationModel]>]) -> Result<Vec<Annotation>> {
    lists
        .iter()
        .flatten()
        .flat_map(|list| list.iter())
        .map(decompile_annotation)
        .collect()
}

/// Visible, invisible, visible type, invisible type.
pub fn decompile_tables(tables: &AnnotationTables) -> Result<Vec<Annotation>> {
    decompile_annotations(&[
        tables.visible.as_deref(),
        tables.invisible.as_deref(),
        tables.visible_type.as_deref(),
        tables.invisible_type.as_deref(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;
    use crate::model::Constant;

    fn enum_value(constant: &str) -> AnnotationValue {
        AnnotationValue::Enum {
            descriptor: "Ljava/lang/annotation/ElementType;".into(),
            constant: constant.into(),
        }
    }

    #[test]
    fn marker_annotation_has_no_pairs() {
        let node = AnnotationModel {
            descriptor: "Ljava/lang/Deprecated;".into(),
            values: None,
        };
        assert_eq!(
            decompile_annotation(&node).unwrap(),
            Annotation::Marker {
                name: "java.lang.Deprecated".into()
            }
        );
    }

    #[test]
    fn empty_value_list_stays_normal() {
        let node = AnnotationModel {
            descriptor: "Lorg/example/A;".into(),
            values: Some(vec![]),
        };
        assert!(matches!(
            decompile_annotation(&node).unwrap(),
            Annotation::Normal { pairs, .. } if pairs.is_empty()
        ));
    }

    #[test]
    fn single_value_pair_is_not_collapsed() {
        let node = AnnotationModel {
            descriptor: "Lorg/example/A;".into(),
            values: Some(vec![("value".into(), AnnotationValue::Const(Constant::Int(1)))]),
        };
        let Annotation::Normal { pairs, .. } = decompile_annotation(&node).unwrap() else {
            panic!("expected normal annotation");
        };
        assert_eq!(pairs[0].name, "value");
        assert_eq!(pairs[0].value, Expr::Literal(Literal::Integer(1)));
    }

    #[test]
    fn array_of_enum_constants_keeps_order() {
        let value = AnnotationValue::Array(vec![enum_value("TYPE"), enum_value("METHOD")]);
        let Expr::ArrayInitializer(items) = decompile_annotation_value(&value).unwrap() else {
            panic!("expected array");
        };
        let names: Vec<_> = items
            .iter()
            .map(|e| match e {
                Expr::FieldAccess { scope, name } => {
                    assert_eq!(**scope, Expr::Name("java.lang.annotation.ElementType".into()));
                    name.clone()
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["TYPE", "METHOD"]);
    }

    #[test]
    fn enum_with_primitive_type_is_rejected() {
        let value = AnnotationValue::Enum {
            descriptor: "I".into(),
            constant: "X".into(),
        };
        assert!(matches!(
            decompile_annotation_value(&value),
            Err(DecompileError::InvalidEnumValue { .. })
        ));
    }

    #[test]
    fn nested_annotation_recurses() {
        let inner = AnnotationModel {
            descriptor: "Lorg/example/Inner;".into(),
            values: None,
        };
        let expr = decompile_annotation_value(&AnnotationValue::Annotation(inner)).unwrap();
        assert!(matches!(expr, Expr::Annotation(Annotation::Marker { .. })));
    }

    #[test]
    fn lists_concatenate_in_table_order() {
        let a = |d: &str| AnnotationModel {
            descriptor: d.into(),
            values: None,
        };
        let tables = AnnotationTables {
            visible: Some(vec![a("LA;"), a("LB;")]),
            invisible: None,
            visible_type: Some(vec![a("LC;")]),
            invisible_type: Some(vec![a("LD;")]),
        };
        let names: Vec<_> = decompile_tables(&tables)
            .unwrap()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
}
