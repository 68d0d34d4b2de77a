use std::fmt;

use bitflags::bitflags;

use crate::classfile::ClassFile;
use crate::error::{Error, Result};
use crate::names::{internal_to_binary, JAVA_LANG_OBJECT};

bitflags! {
    /// Class-level access flags (JVMS table 4.1-B).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => f.write_str("class"),
            TypeKind::Interface => f.write_str("interface"),
        }
    }
}

/// What the hierarchy needs to know about one compiled type.
///
/// All names are binary names (`java.lang.String`, `a.Outer$Inner`).
/// Interfaces never carry a superclass: the `java/lang/Object` recorded in
/// their classfile is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub access: AccessFlags,
    /// `(major, minor)` classfile version; `None` for built-in descriptors.
    pub version: Option<(u16, u16)>,
}

impl TypeDescriptor {
    /// Parse classfile bytes straight into a descriptor.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::from_classfile(ClassFile::parse(bytes)?)
    }

    pub fn from_classfile(cf: ClassFile) -> Result<Self> {
        let access = AccessFlags::from_bits_retain(cf.access_flags);
        if access.contains(AccessFlags::MODULE) {
            return Err(Error::NotAType("module-info"));
        }

        let name = internal_to_binary(&cf.this_class);
        let kind = if access.contains(AccessFlags::INTERFACE) {
            TypeKind::Interface
        } else {
            TypeKind::Class
        };

        let super_class = match kind {
            TypeKind::Interface => None,
            TypeKind::Class => match cf.super_class {
                Some(super_class) => Some(internal_to_binary(&super_class)),
                None if name == JAVA_LANG_OBJECT => None,
                None => return Err(Error::MissingSuperclass(name)),
            },
        };

        Ok(Self {
            name,
            kind,
            super_class,
            interfaces: cf
                .interfaces
                .iter()
                .map(|i| internal_to_binary(i))
                .collect(),
            access,
            version: Some((cf.major_version, cf.minor_version)),
        })
    }

    /// A class descriptor not backed by a classfile.
    pub fn class(name: impl Into<String>, super_class: Option<&str>, interfaces: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            super_class: super_class.map(str::to_string),
            interfaces: interfaces.iter().map(|i| i.to_string()).collect(),
            access: AccessFlags::PUBLIC | AccessFlags::SUPER,
            version: None,
        }
    }

    /// An interface descriptor not backed by a classfile.
    pub fn interface(name: impl Into<String>, extends: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            super_class: None,
            interfaces: extends.iter().map(|i| i.to_string()).collect(),
            access: AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
            version: None,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Direct supertypes in declaration order: superclass first, then interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &str> + '_ {
        self.super_class
            .as_deref()
            .into_iter()
            .chain(self.interfaces.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typecompat_test_utils::ClassFileBuilder;

    use super::*;

    #[test]
    fn class_descriptor_uses_binary_names() {
        let bytes = ClassFileBuilder::class("com/example/Outer$Inner")
            .extends("com/example/Base")
            .implements("java/lang/Runnable")
            .build();

        let desc = TypeDescriptor::parse(&bytes).unwrap();
        assert_eq!(desc.name, "com.example.Outer$Inner");
        assert_eq!(desc.kind, TypeKind::Class);
        assert_eq!(desc.super_class.as_deref(), Some("com.example.Base"));
        assert_eq!(desc.interfaces, vec!["java.lang.Runnable".to_string()]);
        assert_eq!(desc.version, Some((52, 0)));
        assert_eq!(
            desc.direct_supertypes().collect::<Vec<_>>(),
            vec!["com.example.Base", "java.lang.Runnable"]
        );
    }

    #[test]
    fn interfaces_drop_the_object_superclass() {
        let bytes = ClassFileBuilder::interface("com/example/Flyable")
            .implements("com/example/Moving")
            .build();

        let desc = TypeDescriptor::parse(&bytes).unwrap();
        assert_eq!(desc.kind, TypeKind::Interface);
        assert!(desc.access.contains(AccessFlags::ABSTRACT));
        assert_eq!(desc.super_class, None);
        assert_eq!(desc.interfaces, vec!["com.example.Moving".to_string()]);
    }

    #[test]
    fn annotations_are_interfaces_and_enums_are_classes() {
        let annotation = ClassFileBuilder::interface("a/Marker")
            .access_flags(0x2601)
            .implements("java/lang/annotation/Annotation")
            .build();
        assert!(TypeDescriptor::parse(&annotation).unwrap().is_interface());

        let enumeration = ClassFileBuilder::class("a/Color")
            .access_flags(0x4031)
            .extends("java/lang/Enum")
            .build();
        assert_eq!(TypeDescriptor::parse(&enumeration).unwrap().kind, TypeKind::Class);
    }

    #[test]
    fn only_object_may_omit_the_superclass() {
        let object = ClassFileBuilder::class("java/lang/Object").no_super().build();
        assert_eq!(TypeDescriptor::parse(&object).unwrap().super_class, None);

        let orphan = ClassFileBuilder::class("a/Orphan").no_super().build();
        assert_eq!(
            TypeDescriptor::parse(&orphan),
            Err(Error::MissingSuperclass("a.Orphan".to_string()))
        );
    }

    #[test]
    fn module_info_is_not_a_type() {
        let bytes = ClassFileBuilder::class("module-info")
            .access_flags(0x8000)
            .no_super()
            .build();
        assert_eq!(
            TypeDescriptor::parse(&bytes),
            Err(Error::NotAType("module-info"))
        );
    }
}
