use crate::ast::{ClassType, Type};
use crate::error::{DecompileError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub qualifier: Option<String>,
    pub identifier: String,
}

impl QualifiedName {
    pub fn dotted(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}.{}", self.identifier),
            None => self.identifier.clone(),
        }
    }
}

/// `java/util/Map$Entry` → qualifier `java.util`, identifier `Map$Entry`.
/// Nested classes keep their `$` since they are not reconstructed.
pub fn class_name(binary_name: &str) -> QualifiedName {
    match binary_name.rsplit_once('/') {
        Some((package, identifier)) => QualifiedName {
            qualifier: Some(package.replace('/', ".")),
            identifier: identifier.to_string(),
        },
        None => QualifiedName {
            qualifier: None,
            identifier: binary_name.to_string(),
        },
    }
}

/// Class type whose scope chain is the package.
pub fn class_name_type(binary_name: &str) -> ClassType {
    binary_name
        .split('/')
        .fold(None, |scope, segment| Some(ClassType::new(scope, segment)))
        .unwrap_or_else(|| ClassType::new(None, binary_name))
}

/// Dotted name of a class type, used for annotation names.
pub fn type_to_name(ty: &Type) -> Result<String> {
    match ty {
        Type::Class(class) => Ok(class.qualified_name()),
        other => Err(DecompileError::NotAName(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PrimitiveType;

    #[test]
    fn class_name_splits_package() {
        let name = class_name("org/example/Demo");
        assert_eq!(name.qualifier.as_deref(), Some("org.example"));
        assert_eq!(name.identifier, "Demo");
        assert_eq!(name.dotted(), "org.example.Demo");
    }

    #[test]
    fn class_name_in_default_package() {
        let name = class_name("Demo");
        assert_eq!(name.qualifier, None);
        assert_eq!(name.identifier, "Demo");
    }

    #[test]
    fn class_name_type_builds_scope_chain() {
        let ty = class_name_type("java/util/Map$Entry");
        assert_eq!(ty.name, "Map$Entry");
        assert_eq!(ty.scope.as_ref().map(|s| s.name.as_str()), Some("util"));
        assert_eq!(ty.qualified_name(), "java.util.Map$Entry");
    }

    #[test]
    fn primitive_is_not_a_name() {
        let err = type_to_name(&Type::Primitive(PrimitiveType::Int)).unwrap_err();
        assert!(matches!(err, DecompileError::NotAName(_)));
    }
}
