//! In-memory shape of one class file, as produced by [`crate::reader`].
//!
//! The model is read-only input to the decompiler. Names are binary names
//! (`java/lang/String`), types are raw descriptor and signature strings.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassModel {
    pub version: ClassVersion,
    pub access: u16,
    pub name: String,
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub source_file: Option<String>,
    pub source_debug: Option<String>,
    pub annotations: AnnotationTables,
    pub fields: Vec<FieldModel>,
    pub methods: Vec<MethodModel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassVersion {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for ClassVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The four annotation attributes a class, field or method may carry.
/// `None` means the attribute was absent, which is not the same as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTables {
    pub visible: Option<Vec<AnnotationModel>>,
    pub invisible: Option<Vec<AnnotationModel>>,
    pub visible_type: Option<Vec<AnnotationModel>>,
    pub invisible_type: Option<Vec<AnnotationModel>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldModel {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub constant_value: Option<Constant>,
    pub annotations: AnnotationTables,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodModel {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub exceptions: Vec<String>,
    /// Absent when the class was compiled without `-parameters`.
    pub parameters: Option<Vec<ParameterModel>>,
    pub annotations: AnnotationTables,
    pub visible_parameter_annotations: Option<Vec<Vec<AnnotationModel>>>,
    pub invisible_parameter_annotations: Option<Vec<Vec<AnnotationModel>>>,
    pub annotation_default: Option<AnnotationValue>,
    pub code: Option<CodeModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeModel {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_length: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterModel {
    pub name: String,
    pub access: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationModel {
    pub descriptor: String,
    /// `None` for a marker annotation.
    pub values: Option<Vec<(String, AnnotationValue)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Const(Constant),
    Enum {
        descriptor: String,
        constant: String,
    },
    Annotation(AnnotationModel),
    Array(Vec<AnnotationValue>),
}

/// A loadable constant: field `ConstantValue` entries and annotation element
/// literals. `Class` holds a field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Class(String),
}

impl Constant {
    pub fn kind(&self) -> &'static str {
        match self {
            Constant::Boolean(_) => "boolean",
            Constant::Byte(_) => "byte",
            Constant::Char(_) => "char",
            Constant::Short(_) => "short",
            Constant::Int(_) => "int",
            Constant::Long(_) => "long",
            Constant::Float(_) => "float",
            Constant::Double(_) => "double",
            Constant::String(_) => "string",
            Constant::Class(_) => "class",
        }
    }
}
