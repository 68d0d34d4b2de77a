//! A small built-in slice of `java.base` (as of JDK 17).
//!
//! Class roots produced by `javac -d` don't contain the JDK, but almost every
//! hierarchy bottoms out in it. This table lets common supertypes such as
//! `java.lang.Object`, `java.io.Serializable` or `java.util.List` resolve
//! without a JDK installation. Types missing from the table are still handled
//! as opaque ancestors.

use typecompat_classfile::TypeDescriptor;

enum Stub {
    Class {
        name: &'static str,
        super_class: Option<&'static str>,
        interfaces: &'static [&'static str],
    },
    Interface {
        name: &'static str,
        extends: &'static [&'static str],
    },
}

const fn class(
    name: &'static str,
    super_class: &'static str,
    interfaces: &'static [&'static str],
) -> Stub {
    Stub::Class {
        name,
        super_class: Some(super_class),
        interfaces,
    }
}

const fn interface(name: &'static str, extends: &'static [&'static str]) -> Stub {
    Stub::Interface { name, extends }
}

const OBJECT: &str = "java.lang.Object";
const SERIALIZABLE: &str = "java.io.Serializable";
const CLONEABLE: &str = "java.lang.Cloneable";
const COMPARABLE: &str = "java.lang.Comparable";
const CONSTABLE: &str = "java.lang.constant.Constable";
const CONSTANT_DESC: &str = "java.lang.constant.ConstantDesc";

const STUBS: &[Stub] = &[
    // java.lang
    Stub::Class {
        name: OBJECT,
        super_class: None,
        interfaces: &[],
    },
    interface(CLONEABLE, &[]),
    interface(COMPARABLE, &[]),
    interface("java.lang.CharSequence", &[]),
    interface("java.lang.Appendable", &[]),
    interface("java.lang.Runnable", &[]),
    interface("java.lang.AutoCloseable", &[]),
    interface("java.lang.Iterable", &[]),
    interface("java.lang.Readable", &[]),
    interface("java.lang.annotation.Annotation", &[]),
    interface(CONSTABLE, &[]),
    interface(CONSTANT_DESC, &[]),
    class(
        "java.lang.String",
        OBJECT,
        &[
            SERIALIZABLE,
            COMPARABLE,
            "java.lang.CharSequence",
            CONSTABLE,
            CONSTANT_DESC,
        ],
    ),
    class(
        "java.lang.AbstractStringBuilder",
        OBJECT,
        &["java.lang.Appendable", "java.lang.CharSequence"],
    ),
    class(
        "java.lang.StringBuilder",
        "java.lang.AbstractStringBuilder",
        &[SERIALIZABLE, COMPARABLE, "java.lang.CharSequence"],
    ),
    class("java.lang.Number", OBJECT, &[SERIALIZABLE]),
    class("java.lang.Byte", "java.lang.Number", &[COMPARABLE, CONSTABLE]),
    class("java.lang.Short", "java.lang.Number", &[COMPARABLE, CONSTABLE]),
    class(
        "java.lang.Integer",
        "java.lang.Number",
        &[COMPARABLE, CONSTABLE, CONSTANT_DESC],
    ),
    class(
        "java.lang.Long",
        "java.lang.Number",
        &[COMPARABLE, CONSTABLE, CONSTANT_DESC],
    ),
    class(
        "java.lang.Float",
        "java.lang.Number",
        &[COMPARABLE, CONSTABLE, CONSTANT_DESC],
    ),
    class(
        "java.lang.Double",
        "java.lang.Number",
        &[COMPARABLE, CONSTABLE, CONSTANT_DESC],
    ),
    class("java.lang.Boolean", OBJECT, &[SERIALIZABLE, COMPARABLE, CONSTABLE]),
    class("java.lang.Character", OBJECT, &[SERIALIZABLE, COMPARABLE, CONSTABLE]),
    class("java.lang.Enum", OBJECT, &[CONSTABLE, COMPARABLE, SERIALIZABLE]),
    class("java.lang.Record", OBJECT, &[]),
    class("java.lang.Thread", OBJECT, &["java.lang.Runnable"]),
    class("java.lang.Throwable", OBJECT, &[SERIALIZABLE]),
    class("java.lang.Exception", "java.lang.Throwable", &[]),
    class("java.lang.Error", "java.lang.Throwable", &[]),
    class("java.lang.RuntimeException", "java.lang.Exception", &[]),
    class("java.lang.IllegalArgumentException", "java.lang.RuntimeException", &[]),
    class("java.lang.IllegalStateException", "java.lang.RuntimeException", &[]),
    class("java.lang.NullPointerException", "java.lang.RuntimeException", &[]),
    class("java.lang.ClassCastException", "java.lang.RuntimeException", &[]),
    class("java.lang.IndexOutOfBoundsException", "java.lang.RuntimeException", &[]),
    class(
        "java.lang.UnsupportedOperationException",
        "java.lang.RuntimeException",
        &[],
    ),
    // java.io
    interface(SERIALIZABLE, &[]),
    interface("java.io.Closeable", &["java.lang.AutoCloseable"]),
    interface("java.io.Flushable", &[]),
    class("java.io.IOException", "java.lang.Exception", &[]),
    class("java.io.UncheckedIOException", "java.lang.RuntimeException", &[]),
    class(
        "java.io.InputStream",
        OBJECT,
        &["java.io.Closeable"],
    ),
    class(
        "java.io.OutputStream",
        OBJECT,
        &["java.io.Closeable", "java.io.Flushable"],
    ),
    class(
        "java.io.Reader",
        OBJECT,
        &["java.lang.Readable", "java.io.Closeable"],
    ),
    class(
        "java.io.Writer",
        OBJECT,
        &["java.lang.Appendable", "java.io.Closeable", "java.io.Flushable"],
    ),
    // java.util
    interface("java.util.Iterator", &[]),
    interface("java.util.RandomAccess", &[]),
    interface("java.util.Collection", &["java.lang.Iterable"]),
    interface("java.util.List", &["java.util.Collection"]),
    interface("java.util.Set", &["java.util.Collection"]),
    interface("java.util.SortedSet", &["java.util.Set"]),
    interface("java.util.Queue", &["java.util.Collection"]),
    interface("java.util.Deque", &["java.util.Queue"]),
    interface("java.util.Map", &[]),
    interface("java.util.SortedMap", &["java.util.Map"]),
    interface("java.util.NavigableMap", &["java.util.SortedMap"]),
    class("java.util.AbstractCollection", OBJECT, &["java.util.Collection"]),
    class(
        "java.util.AbstractList",
        "java.util.AbstractCollection",
        &["java.util.List"],
    ),
    class(
        "java.util.AbstractSequentialList",
        "java.util.AbstractList",
        &[],
    ),
    class(
        "java.util.ArrayList",
        "java.util.AbstractList",
        &[
            "java.util.List",
            "java.util.RandomAccess",
            CLONEABLE,
            SERIALIZABLE,
        ],
    ),
    class(
        "java.util.LinkedList",
        "java.util.AbstractSequentialList",
        &["java.util.List", "java.util.Deque", CLONEABLE, SERIALIZABLE],
    ),
    class(
        "java.util.AbstractSet",
        "java.util.AbstractCollection",
        &["java.util.Set"],
    ),
    class(
        "java.util.HashSet",
        "java.util.AbstractSet",
        &["java.util.Set", CLONEABLE, SERIALIZABLE],
    ),
    class("java.util.AbstractMap", OBJECT, &["java.util.Map"]),
    class(
        "java.util.HashMap",
        "java.util.AbstractMap",
        &["java.util.Map", CLONEABLE, SERIALIZABLE],
    ),
    class(
        "java.util.TreeMap",
        "java.util.AbstractMap",
        &["java.util.NavigableMap", CLONEABLE, SERIALIZABLE],
    ),
    // java.util.function
    interface("java.util.function.Function", &[]),
    interface("java.util.function.Supplier", &[]),
    interface("java.util.function.Consumer", &[]),
    interface("java.util.function.Predicate", &[]),
];

/// Descriptors for the built-in `java.base` slice.
pub fn stdlib_descriptors() -> impl Iterator<Item = TypeDescriptor> {
    STUBS.iter().map(|stub| match stub {
        Stub::Class {
            name,
            super_class,
            interfaces,
        } => TypeDescriptor::class(*name, *super_class, interfaces),
        Stub::Interface { name, extends } => TypeDescriptor::interface(*name, extends),
    })
}
