//! Reads JVM classfiles just far enough to recover a type's place in the
//! class/interface hierarchy.
//!
//! [`ClassFile::parse`] validates the whole structure (constant pool, members,
//! attributes) and keeps the header; [`TypeDescriptor`] is the view the rest
//! of the workspace works with.

#![forbid(unsafe_code)]

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod names;
mod reader;

pub use crate::classfile::{ClassFile, CLASSFILE_MAGIC, SUPPORTED_MAJOR_VERSIONS};
pub use crate::descriptor::{AccessFlags, TypeDescriptor, TypeKind};
pub use crate::error::{Error, Result};
pub use crate::names::{
    binary_name_for_class_path, internal_to_binary, normalize_type_name, JAVA_LANG_OBJECT,
};
