//! An in-memory catalog of the types defined under a class root.
//!
//! [`TypeCatalog::load`] walks the root once, parses every `.class` file and
//! indexes the resulting [`TypeDescriptor`]s by binary name. After loading the
//! catalog is read-only: lookups never touch the filesystem.

mod stdlib;

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use typecompat_classfile::{binary_name_for_class_path, normalize_type_name, TypeDescriptor};

pub use stdlib::stdlib_descriptors;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("root directory {} not found or not readable: {reason}", .root.display())]
    RootNotFound { root: PathBuf, reason: String },
    #[error(
        "duplicate type {name}: defined by {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateType {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Why a single classfile was skipped during [`TypeCatalog::load`].
#[derive(Debug, Error)]
pub enum FileError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("classfile error: {0}")]
    ClassFile(#[from] typecompat_classfile::Error),
}

/// What to do when two classfiles declare the same binary name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the file visited last (files are visited in lexicographic path order).
    #[default]
    LastWins,
    /// Fail the load with [`CatalogError::DuplicateType`].
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Seed the catalog with a small built-in slice of `java.base`.
    pub include_stdlib_stub: bool,
    pub duplicates: DuplicatePolicy,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            include_stdlib_stub: true,
            duplicates: DuplicatePolicy::LastWins,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeSource {
    File(PathBuf),
    Stdlib,
    InMemory,
}

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub descriptor: TypeDescriptor,
    pub source: TypeSource,
}

#[derive(Debug)]
pub struct MalformedFile {
    pub path: PathBuf,
    pub error: FileError,
}

/// Two files declared the same name; `kept` is the one the catalog serves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    pub kept: PathBuf,
    pub replaced: PathBuf,
}

/// Read-only access to type descriptors by binary name.
pub trait TypeProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<&TypeDescriptor>;

    /// The parse failure recorded for the file that should have defined
    /// `binary_name`, if any.
    fn malformed_type(&self, _binary_name: &str) -> Option<&MalformedFile> {
        None
    }
}

#[derive(Debug, Default)]
pub struct TypeCatalog {
    root: PathBuf,
    types: HashMap<String, CatalogEntry>,
    malformed: HashMap<String, MalformedFile>,
    duplicates: Vec<Duplicate>,
}

impl TypeCatalog {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::load_with_options(root, &CatalogOptions::default())
    }

    pub fn load_with_options(
        root: impl AsRef<Path>,
        options: &CatalogOptions,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        check_root(root)?;

        let mut catalog = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        if options.include_stdlib_stub {
            for descriptor in stdlib_descriptors() {
                catalog.insert(descriptor, TypeSource::Stdlib);
            }
        }

        let mut files = 0usize;
        for entry in walkdir::WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        target: "typecompat.catalog",
                        error = %err,
                        "skipping unreadable directory entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("class")) {
                continue;
            }

            let path = entry.into_path();
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let implied_name = binary_name_for_class_path(relative);
            if implied_name.as_deref().is_some_and(is_ignored_class) {
                tracing::trace!(
                    target: "typecompat.catalog",
                    path = %path.display(),
                    "skipping non-type classfile"
                );
                continue;
            }

            files += 1;
            match read_descriptor(&path) {
                Ok(descriptor) => {
                    if let Some(implied) = implied_name.as_deref() {
                        if implied != descriptor.name {
                            tracing::debug!(
                                target: "typecompat.catalog",
                                path = %path.display(),
                                declared = %descriptor.name,
                                "classfile location does not match its declared name"
                            );
                        }
                    }
                    catalog.insert_file(descriptor, path, options.duplicates)?;
                }
                Err(error) => {
                    tracing::warn!(
                        target: "typecompat.catalog",
                        path = %path.display(),
                        error = %error,
                        "skipping malformed classfile"
                    );
                    if let Some(name) = implied_name {
                        catalog.malformed.insert(name, MalformedFile { path, error });
                    }
                }
            }
        }

        tracing::debug!(
            target: "typecompat.catalog",
            root = %root.display(),
            files,
            types = catalog.types.len(),
            malformed = catalog.malformed.len(),
            duplicates = catalog.duplicates.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from descriptors that don't live on disk.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            catalog.insert(descriptor, TypeSource::InMemory);
        }
        catalog
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.entry(name).map(|entry| &entry.descriptor)
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.types.get(normalize_type_name(name).as_ref())
    }

    pub fn malformed(&self, name: &str) -> Option<&MalformedFile> {
        self.malformed.get(normalize_type_name(name).as_ref())
    }

    pub fn malformed_files(&self) -> impl Iterator<Item = &MalformedFile> {
        self.malformed.values()
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert(&mut self, descriptor: TypeDescriptor, source: TypeSource) {
        self.types
            .insert(descriptor.name.clone(), CatalogEntry { descriptor, source });
    }

    fn insert_file(
        &mut self,
        descriptor: TypeDescriptor,
        path: PathBuf,
        policy: DuplicatePolicy,
    ) -> Result<(), CatalogError> {
        if let Some(existing) = self.types.get(&descriptor.name) {
            match &existing.source {
                TypeSource::File(previous) => {
                    if policy == DuplicatePolicy::Error {
                        return Err(CatalogError::DuplicateType {
                            name: descriptor.name,
                            first: previous.clone(),
                            second: path,
                        });
                    }
                    tracing::warn!(
                        target: "typecompat.catalog",
                        name = %descriptor.name,
                        kept = %path.display(),
                        replaced = %previous.display(),
                        "duplicate type name; the last file wins"
                    );
                    self.duplicates.push(Duplicate {
                        name: descriptor.name.clone(),
                        kept: path.clone(),
                        replaced: previous.clone(),
                    });
                }
                TypeSource::Stdlib | TypeSource::InMemory => {
                    tracing::debug!(
                        target: "typecompat.catalog",
                        name = %descriptor.name,
                        path = %path.display(),
                        "classfile shadows built-in type"
                    );
                }
            }
        }

        self.insert(descriptor, TypeSource::File(path));
        Ok(())
    }
}

impl TypeProvider for TypeCatalog {
    fn lookup_type(&self, binary_name: &str) -> Option<&TypeDescriptor> {
        self.lookup(binary_name)
    }

    fn malformed_type(&self, binary_name: &str) -> Option<&MalformedFile> {
        self.malformed(binary_name)
    }
}

fn check_root(root: &Path) -> Result<(), CatalogError> {
    let not_found = |reason: String| CatalogError::RootNotFound {
        root: root.to_path_buf(),
        reason,
    };

    let meta = std::fs::metadata(root).map_err(|err| not_found(err.to_string()))?;
    if !meta.is_dir() {
        return Err(not_found("not a directory".to_string()));
    }
    std::fs::read_dir(root).map_err(|err| not_found(err.to_string()))?;
    Ok(())
}

fn read_descriptor(path: &Path) -> Result<TypeDescriptor, FileError> {
    let bytes = std::fs::read(path)?;
    Ok(TypeDescriptor::parse(&bytes)?)
}

fn is_ignored_class(binary_name: &str) -> bool {
    binary_name == "module-info"
        || binary_name == "package-info"
        || binary_name.ends_with(".package-info")
}
