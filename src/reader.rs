//! Reads the structural parts of a class file into a [`ClassModel`].
//!
//! Only what declarations need is kept: the constant pool, member headers and
//! the Signature, SourceFile, SourceDebugExtension, ConstantValue, Code,
//! Exceptions, MethodParameters, AnnotationDefault and annotation attributes.
//! Everything else is skipped by length.

use crate::error::{DecompileError, Result};
use crate::model::{
    AnnotationModel, AnnotationTables, AnnotationValue, ClassModel, ClassVersion, CodeModel, Constant,
    FieldModel, MethodModel, ParameterModel,
};

const MAGIC: u32 = 0xCAFE_BABE;

pub fn read_class(bytes: &[u8]) -> Result<ClassModel> {
    let mut reader = ClassReader::new(bytes);
    if reader.read_u4()? != MAGIC {
        return Err(DecompileError::class_format("invalid magic header"));
    }
    let minor = reader.read_u2()?;
    let major = reader.read_u2()?;
    let pool = ConstantPool::parse(&mut reader)?;

    let access = reader.read_u2()?;
    let name = pool.class_name(reader.read_u2()?)?.to_string();
    let super_index = reader.read_u2()?;
    let super_name = match super_index {
        0 => None,
        index => Some(pool.class_name(index)?.to_string()),
    };
    let interfaces_count = reader.read_u2()?;
    let mut interfaces = Vec::with_capacity(usize::from(interfaces_count));
    for _ in 0..interfaces_count {
        interfaces.push(pool.class_name(reader.read_u2()?)?.to_string());
    }

    let fields_count = reader.read_u2()?;
    let mut fields = Vec::with_capacity(usize::from(fields_count));
    for _ in 0..fields_count {
        fields.push(read_field(&mut reader, &pool)?);
    }
    let methods_count = reader.read_u2()?;
    let mut methods = Vec::with_capacity(usize::from(methods_count));
    for _ in 0..methods_count {
        methods.push(read_method(&mut reader, &pool)?);
    }

    let mut class = ClassModel {
        version: ClassVersion { major, minor },
        access,
        name,
        super_name,
        interfaces,
        fields,
        methods,
        ..ClassModel::default()
    };
    for attribute in read_attributes(&mut reader, &pool)? {
        let mut data = ClassReader::new(attribute.data);
        match attribute.name {
            "Signature" => class.signature = Some(pool.utf8(data.read_u2()?)?.to_string()),
            "SourceFile" => class.source_file = Some(pool.utf8(data.read_u2()?)?.to_string()),
            "SourceDebugExtension" => class.source_debug = Some(decode_modified_utf8(attribute.data)?),
            name => read_annotation_table(name, &mut data, &pool, &mut class.annotations)?,
        }
    }
    if reader.remaining() != 0 {
        return Err(DecompileError::class_format("trailing bytes after class attributes"));
    }
    Ok(class)
}

fn read_field(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<FieldModel> {
    let mut field = FieldModel {
        access: reader.read_u2()?,
        name: pool.utf8(reader.read_u2()?)?.to_string(),
        descriptor: pool.utf8(reader.read_u2()?)?.to_string(),
        ..FieldModel::default()
    };
    for attribute in read_attributes(reader, pool)? {
        let mut data = ClassReader::new(attribute.data);
        match attribute.name {
            "Signature" => field.signature = Some(pool.utf8(data.read_u2()?)?.to_string()),
            "ConstantValue" => field.constant_value = Some(pool.loadable(data.read_u2()?)?),
            name => read_annotation_table(name, &mut data, pool, &mut field.annotations)?,
        }
    }
    Ok(field)
}

fn read_method(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<MethodModel> {
    let mut method = MethodModel {
        access: reader.read_u2()?,
        name: pool.utf8(reader.read_u2()?)?.to_string(),
        descriptor: pool.utf8(reader.read_u2()?)?.to_string(),
        ..MethodModel::default()
    };
    for attribute in read_attributes(reader, pool)? {
        let mut data = ClassReader::new(attribute.data);
        match attribute.name {
            "Signature" => method.signature = Some(pool.utf8(data.read_u2()?)?.to_string()),
            "Code" => {
                method.code = Some(CodeModel {
                    max_stack: data.read_u2()?,
                    max_locals: data.read_u2()?,
                    code_length: data.read_u4()?,
                })
            }
            "Exceptions" => {
                let count = data.read_u2()?;
                for _ in 0..count {
                    method.exceptions.push(pool.class_name(data.read_u2()?)?.to_string());
                }
            }
            "MethodParameters" => {
                let count = data.read_u1()?;
                let mut parameters = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let name = match data.read_u2()? {
                        0 => String::new(),
                        index => pool.utf8(index)?.to_string(),
                    };
                    parameters.push(ParameterModel {
                        name,
                        access: data.read_u2()?,
                    });
                }
                method.parameters = Some(parameters);
            }
            "AnnotationDefault" => method.annotation_default = Some(read_element_value(&mut data, pool)?),
            "RuntimeVisibleParameterAnnotations" => {
                method.visible_parameter_annotations = Some(read_parameter_annotations(&mut data, pool)?)
            }
            "RuntimeInvisibleParameterAnnotations" => {
                method.invisible_parameter_annotations = Some(read_parameter_annotations(&mut data, pool)?)
            }
            name => read_annotation_table(name, &mut data, pool, &mut method.annotations)?,
        }
    }
    Ok(method)
}

struct Attribute<'p, 'd> {
    name: &'p str,
    data: &'d [u8],
}

fn read_attributes<'p, 'd>(reader: &mut ClassReader<'d>, pool: &'p ConstantPool) -> Result<Vec<Attribute<'p, 'd>>> {
    let count = reader.read_u2()?;
    let mut attributes = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let name = pool.utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        attributes.push(Attribute {
            name,
            data: reader.read_slice(length)?,
        });
    }
    Ok(attributes)
}

/// Fills the matching slot of `tables`; unknown attributes are ignored.
fn read_annotation_table(
    name: &str,
    data: &mut ClassReader<'_>,
    pool: &ConstantPool,
    tables: &mut AnnotationTables,
) -> Result<()> {
    let (slot, typed) = match name {
        "RuntimeVisibleAnnotations" => (&mut tables.visible, false),
        "RuntimeInvisibleAnnotations" => (&mut tables.invisible, false),
        "RuntimeVisibleTypeAnnotations" => (&mut tables.visible_type, true),
        "RuntimeInvisibleTypeAnnotations" => (&mut tables.invisible_type, true),
        _ => return Ok(()),
    };
    let count = data.read_u2()?;
    let mut annotations = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        if typed {
            skip_type_annotation_target(data)?;
        }
        annotations.push(read_annotation(data, pool)?);
    }
    *slot = Some(annotations);
    Ok(())
}

fn read_parameter_annotations(data: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<Vec<Vec<AnnotationModel>>> {
    let parameters = data.read_u1()?;
    let mut table = Vec::with_capacity(usize::from(parameters));
    for _ in 0..parameters {
        let count = data.read_u2()?;
        let mut annotations = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            annotations.push(read_annotation(data, pool)?);
        }
        table.push(annotations);
    }
    Ok(table)
}

/// Skips `target_info` and `type_path` (JVMS 4.7.20).
fn skip_type_annotation_target(data: &mut ClassReader<'_>) -> Result<()> {
    let target_type = data.read_u1()?;
    match target_type {
        0x00 | 0x01 | 0x16 => data.skip(1)?,
        0x10..=0x12 | 0x17 | 0x42..=0x46 => data.skip(2)?,
        0x13..=0x15 => {}
        0x40 | 0x41 => {
            let entries = data.read_u2()?;
            data.skip(usize::from(entries) * 6)?;
        }
        0x47..=0x4B => data.skip(3)?,
        other => return Err(DecompileError::class_format(format!("unknown type annotation target 0x{other:02x}"))),
    }
    let path_length = data.read_u1()?;
    data.skip(usize::from(path_length) * 2)
}

fn read_annotation(data: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<AnnotationModel> {
    let descriptor = pool.utf8(data.read_u2()?)?.to_string();
    let pairs = data.read_u2()?;
    let values = if pairs == 0 {
        None
    } else {
        let mut values = Vec::with_capacity(usize::from(pairs));
        for _ in 0..pairs {
            let name = pool.utf8(data.read_u2()?)?.to_string();
            values.push((name, read_element_value(data, pool)?));
        }
        Some(values)
    };
    Ok(AnnotationModel { descriptor, values })
}

fn read_element_value(data: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<AnnotationValue> {
    let tag = data.read_u1()?;
    Ok(match tag {
        b'B' | b'C' | b'I' | b'S' | b'Z' => {
            let value = pool.integer(data.read_u2()?)?;
            AnnotationValue::Const(match tag {
                b'B' => Constant::Byte(value as i8),
                b'C' => Constant::Char(value as u16),
                b'S' => Constant::Short(value as i16),
                b'Z' => Constant::Boolean(value != 0),
                _ => Constant::Int(value),
            })
        }
        b'J' | b'F' | b'D' | b's' => AnnotationValue::Const(match (tag, pool.get(data.read_u2()?)?) {
            (b'J', PoolEntry::Long(v)) => Constant::Long(*v),
            (b'F', PoolEntry::Float(v)) => Constant::Float(*v),
            (b'D', PoolEntry::Double(v)) => Constant::Double(*v),
            (b's', PoolEntry::Utf8(v)) => Constant::String(v.clone()),
            _ => {
                return Err(DecompileError::class_format(format!(
                    "element value tag `{}` does not match its constant",
                    tag as char
                )));
            }
        }),
        b'e' => AnnotationValue::Enum {
            descriptor: pool.utf8(data.read_u2()?)?.to_string(),
            constant: pool.utf8(data.read_u2()?)?.to_string(),
        },
        b'c' => AnnotationValue::Const(Constant::Class(pool.utf8(data.read_u2()?)?.to_string())),
        b'@' => AnnotationValue::Annotation(read_annotation(data, pool)?),
        b'[' => {
            let count = data.read_u2()?;
            let mut values = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                values.push(read_element_value(data, pool)?);
            }
            AnnotationValue::Array(values)
        }
        other => {
            return Err(DecompileError::class_format(format!(
                "unknown element value tag 0x{other:02x}"
            )));
        }
    })
}

#[derive(Debug, Clone)]
enum PoolEntry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<PoolEntry>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self> {
        let count = usize::from(reader.read_u2()?);
        let mut entries = Vec::with_capacity(count);
        entries.push(PoolEntry::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = usize::from(reader.read_u2()?);
                    PoolEntry::Utf8(decode_modified_utf8(reader.read_slice(length)?)?)
                }
                3 => PoolEntry::Integer(reader.read_u4()? as i32),
                4 => PoolEntry::Float(f32::from_bits(reader.read_u4()?)),
                5 | 6 => {
                    let bits = (u64::from(reader.read_u4()?) << 32) | u64::from(reader.read_u4()?);
                    let entry = if tag == 5 {
                        PoolEntry::Long(bits as i64)
                    } else {
                        PoolEntry::Double(f64::from_bits(bits))
                    };
                    // Eight-byte constants take two slots.
                    entries.push(entry);
                    PoolEntry::Unusable
                }
                7 => PoolEntry::Class {
                    name_index: reader.read_u2()?,
                },
                8 => PoolEntry::String {
                    string_index: reader.read_u2()?,
                },
                9..=12 | 17 | 18 => {
                    reader.skip(4)?;
                    PoolEntry::Other
                }
                15 => {
                    reader.skip(3)?;
                    PoolEntry::Other
                }
                16 | 19 | 20 => {
                    reader.skip(2)?;
                    PoolEntry::Other
                }
                other => return Err(DecompileError::class_format(format!("unsupported constant pool tag {other}"))),
            };
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&PoolEntry> {
        self.entries
            .get(usize::from(index))
            .ok_or_else(|| DecompileError::class_format(format!("invalid constant pool index {index}")))
    }

    fn mismatch(index: u16, expected: &str) -> DecompileError {
        DecompileError::class_format(format!("constant pool index {index} is not a {expected}"))
    }

    fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            PoolEntry::Utf8(value) => Ok(value),
            _ => Err(Self::mismatch(index, "Utf8 entry")),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            PoolEntry::Class { name_index } => self.utf8(*name_index),
            _ => Err(Self::mismatch(index, "Class entry")),
        }
    }

    fn integer(&self, index: u16) -> Result<i32> {
        match self.get(index)? {
            PoolEntry::Integer(value) => Ok(*value),
            _ => Err(Self::mismatch(index, "Integer entry")),
        }
    }

    /// A `ConstantValue` target.
    fn loadable(&self, index: u16) -> Result<Constant> {
        Ok(match self.get(index)? {
            PoolEntry::Integer(v) => Constant::Int(*v),
            PoolEntry::Float(v) => Constant::Float(*v),
            PoolEntry::Long(v) => Constant::Long(*v),
            PoolEntry::Double(v) => Constant::Double(*v),
            PoolEntry::String { string_index } => Constant::String(self.utf8(*string_index)?.to_string()),
            _ => return Err(Self::mismatch(index, "constant value")),
        })
    }
}

/// JVMS 4.4.7: `0` is written as two bytes and supplementary characters as
/// surrogate pairs. Unpaired surrogates become U+FFFD.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let malformed = || DecompileError::class_format("malformed modified UTF-8");
    let continuation = |b: Option<&u8>| match b {
        Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
        _ => Err(malformed()),
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 && b != 0 {
            units.push(u16::from(b));
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            units.push((u16::from(b & 0x1F) << 6) | continuation(bytes.get(i + 1))?);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            let high = continuation(bytes.get(i + 1))?;
            let low = continuation(bytes.get(i + 2))?;
            units.push((u16::from(b & 0x0F) << 12) | (high << 6) | low);
            i += 3;
        } else {
            return Err(malformed());
        }
    }
    Ok(String::from_utf16_lossy(&units))
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecompileError::class_format("unexpected end of class file"));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.read_slice(len).map(|_| ())
    }

    fn read_u1(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    fn read_u2(&mut self) -> Result<u16> {
        let b = self.read_slice(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u4(&mut self) -> Result<u32> {
        let b = self.read_slice(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
