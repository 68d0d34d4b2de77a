use crate::error::{Error, Result};
use crate::reader::Reader;

const CONSTANT_UTF8: u8 = 1;
const CONSTANT_INTEGER: u8 = 3;
const CONSTANT_FLOAT: u8 = 4;
const CONSTANT_LONG: u8 = 5;
const CONSTANT_DOUBLE: u8 = 6;
const CONSTANT_CLASS: u8 = 7;
const CONSTANT_STRING: u8 = 8;
const CONSTANT_FIELDREF: u8 = 9;
const CONSTANT_METHODREF: u8 = 10;
const CONSTANT_INTERFACE_METHODREF: u8 = 11;
const CONSTANT_NAME_AND_TYPE: u8 = 12;
const CONSTANT_METHOD_HANDLE: u8 = 15;
const CONSTANT_METHOD_TYPE: u8 = 16;
const CONSTANT_DYNAMIC: u8 = 17;
const CONSTANT_INVOKE_DYNAMIC: u8 = 18;
const CONSTANT_MODULE: u8 = 19;
const CONSTANT_PACKAGE: u8 = 20;

/// A decoded constant pool entry.
///
/// Only the entries needed to resolve type names keep their payload; everything
/// else is validated structurally and remembered by kind so mismatches can be
/// reported.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CpInfo {
    Utf8(String),
    /// Utf8 holding unpaired surrogates, as `javac` emits for `"\uD800"`.
    /// Legal in string literals but never in a name.
    UnpairedSurrogates,
    Class { name_index: u16 },
    Other(&'static str),
    /// Second slot of a `Long`/`Double`, and the reserved slot 0.
    Unusable,
}

impl CpInfo {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) | CpInfo::UnpairedSurrogates => "Utf8",
            CpInfo::Class { .. } => "Class",
            CpInfo::Other(kind) => kind,
            CpInfo::Unusable => "Unusable",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<CpInfo>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(CpInfo::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                CONSTANT_UTF8 => {
                    let len = reader.read_u2()? as usize;
                    utf8_entry(reader.read_bytes(len)?)?
                }
                CONSTANT_INTEGER => skip(reader, 4, "Integer")?,
                CONSTANT_FLOAT => skip(reader, 4, "Float")?,
                CONSTANT_LONG | CONSTANT_DOUBLE => {
                    reader.skip(8)?;
                    let kind = if tag == CONSTANT_LONG { "Long" } else { "Double" };
                    entries.push(CpInfo::Other(kind));
                    // 8-byte constants take up two slots.
                    if entries.len() < count {
                        entries.push(CpInfo::Unusable);
                    }
                    continue;
                }
                CONSTANT_CLASS => CpInfo::Class {
                    name_index: reader.read_u2()?,
                },
                CONSTANT_STRING => skip(reader, 2, "String")?,
                CONSTANT_FIELDREF => skip(reader, 4, "Fieldref")?,
                CONSTANT_METHODREF => skip(reader, 4, "Methodref")?,
                CONSTANT_INTERFACE_METHODREF => skip(reader, 4, "InterfaceMethodref")?,
                CONSTANT_NAME_AND_TYPE => skip(reader, 4, "NameAndType")?,
                CONSTANT_METHOD_HANDLE => skip(reader, 3, "MethodHandle")?,
                CONSTANT_METHOD_TYPE => skip(reader, 2, "MethodType")?,
                CONSTANT_DYNAMIC => skip(reader, 4, "Dynamic")?,
                CONSTANT_INVOKE_DYNAMIC => skip(reader, 4, "InvokeDynamic")?,
                CONSTANT_MODULE => skip(reader, 2, "Module")?,
                CONSTANT_PACKAGE => skip(reader, 2, "Package")?,
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&CpInfo> {
        match self.entries.get(index as usize) {
            None | Some(CpInfo::Unusable) => Err(Error::InvalidConstantPoolIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Utf8(value) => Ok(value),
            CpInfo::UnpairedSurrogates => Err(Error::InvalidModifiedUtf8),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    /// Resolve a `CONSTANT_Class` entry to its internal name (`java/lang/String`).
    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

fn skip(reader: &mut Reader<'_>, len: usize, kind: &'static str) -> Result<CpInfo> {
    reader.skip(len)?;
    Ok(CpInfo::Other(kind))
}

fn utf8_entry(bytes: &[u8]) -> Result<CpInfo> {
    if bytes.iter().all(|&b| (0x01..0x80).contains(&b)) {
        // Pure ASCII; the common case for type names.
        return Ok(CpInfo::Utf8(bytes.iter().map(|&b| b as char).collect()));
    }

    let units = decode_modified_utf8(bytes)?;
    Ok(match String::from_utf16(&units) {
        Ok(value) => CpInfo::Utf8(value),
        Err(_) => CpInfo::UnpairedSurrogates,
    })
}

/// Decode the JVM's "modified UTF-8" (JVMS 4.4.7) into UTF-16 code units.
///
/// NUL is encoded as `C0 80` and supplementary characters as surrogate pairs
/// of three-byte sequences. Surrogates are not paired up here.
fn decode_modified_utf8(bytes: &[u8]) -> Result<Vec<u16>> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 {
            0x01..=0x7F => {
                units.push(b0 as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = continuation(bytes, i + 1)?;
                units.push((((b0 & 0x1F) as u16) << 6) | b1);
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = continuation(bytes, i + 1)?;
                let b2 = continuation(bytes, i + 2)?;
                units.push((((b0 & 0x0F) as u16) << 12) | (b1 << 6) | b2);
                i += 3;
            }
            _ => return Err(Error::InvalidModifiedUtf8),
        }
    }

    Ok(units)
}

fn continuation(bytes: &[u8], index: usize) -> Result<u16> {
    match bytes.get(index) {
        Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        _ => Err(Error::InvalidModifiedUtf8),
    }
}
