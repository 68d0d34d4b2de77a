use std::ops::RangeInclusive;

use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

pub const CLASSFILE_MAGIC: u32 = 0xCAFEBABE;

/// Major versions accepted by [`ClassFile::parse`]: JDK 1.0.2 (45) onwards,
/// with headroom for releases newer than this crate.
pub const SUPPORTED_MAJOR_VERSIONS: RangeInclusive<u16> = 45..=127;

/// The structural header of a classfile.
///
/// Names are kept in internal form (`java/lang/String`) exactly as recorded.
/// Members and attributes are validated for shape but not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields_count: u16,
    pub methods_count: u16,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != CLASSFILE_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        if !SUPPORTED_MAJOR_VERSIONS.contains(&major_version) {
            return Err(Error::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = cp.get_class_name(reader.read_u2()?)?;
        let super_class_idx = reader.read_u2()?;
        let super_class = if super_class_idx == 0 {
            None
        } else {
            Some(cp.get_class_name(super_class_idx)?)
        };

        let interfaces_count = reader.read_u2()? as usize;
        let mut interfaces = Vec::with_capacity(interfaces_count);
        for _ in 0..interfaces_count {
            interfaces.push(cp.get_class_name(reader.read_u2()?)?);
        }

        let fields_count = reader.read_u2()?;
        for _ in 0..fields_count {
            skip_member(&mut reader, &cp)?;
        }

        let methods_count = reader.read_u2()?;
        for _ in 0..methods_count {
            skip_member(&mut reader, &cp)?;
        }

        skip_attributes(&mut reader, &cp)?;

        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields_count,
            methods_count,
        })
    }
}

fn skip_member(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<()> {
    reader.read_u2()?; // access_flags
    cp.get_utf8(reader.read_u2()?)?; // name_index
    cp.get_utf8(reader.read_u2()?)?; // descriptor_index
    skip_attributes(reader, cp)
}

fn skip_attributes(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<()> {
    let attributes_count = reader.read_u2()? as usize;
    for _ in 0..attributes_count {
        cp.get_utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typecompat_test_utils::ClassFileBuilder;

    use super::*;

    #[test]
    fn parses_header_of_generated_class() {
        let bytes = ClassFileBuilder::class("com/example/Dog")
            .extends("com/example/Animal")
            .implements("java/io/Serializable")
            .implements("java/lang/Comparable")
            .field("name", "Ljava/lang/String;")
            .method("bark", "()V")
            .attribute("SourceFile", &[0x00, 0x01])
            .build();

        let cf = ClassFile::parse(&bytes).unwrap();
        assert_eq!(
            cf,
            ClassFile {
                minor_version: 0,
                major_version: 52,
                access_flags: 0x0021,
                this_class: "com/example/Dog".to_string(),
                super_class: Some("com/example/Animal".to_string()),
                interfaces: vec![
                    "java/io/Serializable".to_string(),
                    "java/lang/Comparable".to_string()
                ],
                fields_count: 1,
                methods_count: 1,
            }
        );
    }

    #[test]
    fn string_literal_with_lone_surrogate_parses() {
        // `String s = "\uD800";`
        let bytes = ClassFileBuilder::class("com/example/Odd")
            .string_constant(&[0xD800])
            .string_constant(&[b'x' as u16, 0xDC00])
            .build();

        let cf = ClassFile::parse(&bytes).unwrap();
        assert_eq!(cf.this_class, "com/example/Odd");
        assert_eq!(cf.super_class.as_deref(), Some("java/lang/Object"));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = ClassFileBuilder::class("A").build();
        bytes[0] = 0xDE;
        assert_eq!(ClassFile::parse(&bytes), Err(Error::InvalidMagic(0xDEFEBABE)));
    }

    #[test]
    fn rejects_unsupported_versions() {
        let bytes = ClassFileBuilder::class("A").version(44, 0).build();
        assert_eq!(
            ClassFile::parse(&bytes),
            Err(Error::UnsupportedVersion { major: 44, minor: 0 })
        );
    }

    #[test]
    fn every_truncation_is_an_error() {
        let bytes = ClassFileBuilder::class("com/example/Bird")
            .implements("com/example/Flyable")
            .method("fly", "()V")
            .build();
        for len in 0..bytes.len() {
            assert!(
                ClassFile::parse(&bytes[..len]).is_err(),
                "prefix of length {len} should not parse"
            );
        }
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = ClassFileBuilder::class("A").build();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(ClassFile::parse(&bytes), Err(Error::TrailingBytes(2)));
    }

    #[test]
    fn rejects_dangling_interface_reference() {
        let bytes = ClassFileBuilder::class("A")
            .raw_interface_index(0x7FFF)
            .build();
        assert_eq!(
            ClassFile::parse(&bytes),
            Err(Error::InvalidConstantPoolIndex(0x7FFF))
        );
    }
}
