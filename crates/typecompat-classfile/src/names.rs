//! Conversions between the name forms found in classfiles and on disk.
//!
//! The canonical form used everywhere outside the classfile itself is the
//! dotted binary name (`java.util.Map$Entry`).

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Component, Path};

/// The universal root class.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Normalize a user-supplied type name to binary form.
///
/// Accepts binary (`java.lang.String`) and internal (`java/lang/String`)
/// names; surrounding whitespace is ignored.
pub fn normalize_type_name(name: &str) -> Cow<'_, str> {
    let name = name.trim();
    if name.contains('/') {
        Cow::Owned(internal_to_binary(name))
    } else {
        Cow::Borrowed(name)
    }
}

/// The binary name implied by a classfile's path relative to a class root,
/// e.g. `com/example/Foo.class` -> `com.example.Foo`.
///
/// Returns `None` for paths that can't name a type (no `.class` extension,
/// non-UTF-8 or non-normal components).
pub fn binary_name_for_class_path(relative: &Path) -> Option<String> {
    if relative.extension() != Some(OsStr::new("class")) {
        return None;
    }

    let stem_path = relative.with_extension("");
    let mut segments = Vec::new();
    for component in stem_path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            _ => return None,
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("."))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn converts_internal_names_to_binary() {
        assert_eq!(internal_to_binary("java/util/Map$Entry"), "java.util.Map$Entry");
        assert_eq!(internal_to_binary("Top"), "Top");
    }

    #[test]
    fn normalizes_user_supplied_names() {
        assert!(matches!(
            normalize_type_name("java.lang.String"),
            Cow::Borrowed("java.lang.String")
        ));
        assert_eq!(normalize_type_name(" java/lang/String\n"), "java.lang.String");
    }

    #[test]
    fn derives_binary_names_from_paths() {
        let path: PathBuf = ["com", "example", "Outer$Inner.class"].iter().collect();
        assert_eq!(
            binary_name_for_class_path(&path).as_deref(),
            Some("com.example.Outer$Inner")
        );
        assert_eq!(binary_name_for_class_path(Path::new("Top.class")).as_deref(), Some("Top"));
        assert_eq!(binary_name_for_class_path(Path::new("com/example/Foo.java")), None);
        assert_eq!(binary_name_for_class_path(Path::new("../Foo.class")), None);
    }
}
