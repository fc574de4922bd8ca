//! Java declaration tree produced by the decompiler and consumed by
//! [`crate::emit`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Variable(String),
    Array(Box<Type>),
    Void,
}

/// `scope` is either the package chain (`java` → `util` → `Map`) or, for an
/// inner class reached through a signature, the parameterized outer type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassType {
    pub scope: Option<Box<ClassType>>,
    pub name: String,
    pub arguments: Option<Vec<TypeArgument>>,
}

impl ClassType {
    pub fn new(scope: Option<ClassType>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.map(Box::new),
            name: name.into(),
            arguments: None,
        }
    }

    /// Dotted name without type arguments.
    pub fn qualified_name(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}.{}", scope.qualified_name(), self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeArgument {
    Type(Type),
    Wildcard,
    Extends(Type),
    Super(Type),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }
}

/// `Double` keeps its source text, suffix included: floats share the node
/// and are told apart by an `F` suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Char(u16),
    Integer(i32),
    Long(i64),
    Double(String),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    /// `Type.class`
    Class(Type),
    Name(String),
    FieldAccess { scope: Box<Expr>, name: String },
    ArrayInitializer(Vec<Expr>),
    Annotation(Annotation),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Annotation {
    Marker { name: String },
    Normal { name: String, pairs: Vec<MemberValuePair> },
}

impl Annotation {
    pub fn name(&self) -> &str {
        match self {
            Annotation::Marker { name } | Annotation::Normal { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberValuePair {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub ty: Type,
    pub var_args: bool,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    pub ty: Type,
    pub name: String,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub variables: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Comment(String),
    /// A statement already rendered by the body decompiler.
    Source(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// `Pending` until the body pass runs; `Absent` for abstract and native
/// methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MethodBody {
    Pending,
    Absent,
    Block(Block),
}

impl From<Option<Block>> for MethodBody {
    fn from(body: Option<Block>) -> Self {
        match body {
            Some(block) => MethodBody::Block(block),
            None => MethodBody::Absent,
        }
    }
}

/// Shared shape of methods and constructors. `method_index` points back at
/// the `MethodModel` this declaration came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallableDeclaration {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_parameters: Vec<TypeParameter>,
    pub return_type: Type,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub thrown: Vec<Type>,
    pub default_value: Option<Expr>,
    pub body: MethodBody,
    pub method_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializerDeclaration {
    pub is_static: bool,
    pub body: MethodBody,
    pub method_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BodyDeclaration {
    Field(FieldDeclaration),
    Method(CallableDeclaration),
    Constructor(CallableDeclaration),
    Initializer(InitializerDeclaration),
}

impl BodyDeclaration {
    /// Back-reference to the source method, `None` for fields.
    pub fn method_index(&self) -> Option<usize> {
        match self {
            BodyDeclaration::Field(_) => None,
            BodyDeclaration::Method(c) | BodyDeclaration::Constructor(c) => Some(c.method_index),
            BodyDeclaration::Initializer(i) => Some(i.method_index),
        }
    }

    pub fn body(&self) -> Option<&MethodBody> {
        match self {
            BodyDeclaration::Field(_) => None,
            BodyDeclaration::Method(c) | BodyDeclaration::Constructor(c) => Some(&c.body),
            BodyDeclaration::Initializer(i) => Some(&i.body),
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut MethodBody> {
        match self {
            BodyDeclaration::Field(_) => None,
            BodyDeclaration::Method(c) | BodyDeclaration::Constructor(c) => Some(&mut c.body),
            BodyDeclaration::Initializer(i) => Some(&mut i.body),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclaration {
    pub kind: TypeKind,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub extended_types: Vec<ClassType>,
    pub implemented_types: Vec<ClassType>,
    pub permitted_types: Vec<ClassType>,
    pub members: Vec<BodyDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationUnit {
    pub comment: Option<String>,
    pub package: Option<String>,
    pub declaration: TypeDeclaration,
}

impl CompilationUnit {
    /// True once no member body is still `Pending`.
    pub fn is_complete(&self) -> bool {
        self.declaration
            .members
            .iter()
            .all(|m| !matches!(m.body(), Some(MethodBody::Pending)))
    }
}
