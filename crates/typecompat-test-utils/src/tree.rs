use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::ClassFileBuilder;

/// A temporary class root (the layout `javac -d` produces).
pub struct ClassTree {
    dir: TempDir,
}

impl ClassTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temporary class root"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `class` to `<root>/<internal name>.class`.
    pub fn add(&self, class: ClassFileBuilder) -> PathBuf {
        let relative = format!("{}.class", class.internal_name());
        self.add_raw(&relative, &class.build())
    }

    /// Write `class` under an arbitrary relative path.
    pub fn add_at(&self, relative: &str, class: ClassFileBuilder) -> PathBuf {
        self.add_raw(relative, &class.build())
    }

    /// Write raw bytes under `relative`, creating parent directories.
    pub fn add_raw(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create package directories");
        }
        std::fs::write(&path, bytes).expect("write classfile");
        path
    }

    /// Convenience for a chain of `add` calls.
    pub fn with(self, classes: impl IntoIterator<Item = ClassFileBuilder>) -> Self {
        for class in classes {
            self.add(class);
        }
        self
    }
}

impl Default for ClassTree {
    fn default() -> Self {
        Self::new()
    }
}
