use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use thiserror::Error;
use typecompat_catalog::TypeProvider;
use typecompat_classfile::{normalize_type_name, JAVA_LANG_OBJECT};

use crate::resolver::{HierarchyResolver, ResolveError, ResolverOptions};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("type {name} not found")]
    TypeNotFound { name: String },
    #[error("classfile for {name} at {} is malformed: {reason}", .path.display())]
    MalformedInput {
        name: String,
        path: PathBuf,
        reason: String,
    },
    #[error("cyclic inheritance: {}", .path.join(" -> "))]
    CyclicHierarchy { path: Vec<String> },
    #[error("hierarchy of {name} has more than {limit} types")]
    HierarchyTooLarge { name: String, limit: usize },
}

impl CheckError {
    /// Stable identifier used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::TypeNotFound { .. } => "TypeNotFound",
            CheckError::MalformedInput { .. } => "MalformedInput",
            CheckError::CyclicHierarchy { .. } => "CyclicHierarchy",
            CheckError::HierarchyTooLarge { .. } => "HierarchyTooLarge",
        }
    }
}

impl From<ResolveError> for CheckError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::TypeNotFound(name) => CheckError::TypeNotFound { name },
            ResolveError::CyclicHierarchy { path } => CheckError::CyclicHierarchy { path },
            ResolveError::HierarchyTooLarge { name, limit } => {
                CheckError::HierarchyTooLarge { name, limit }
            }
        }
    }
}

/// Answers "may `sub` be used wherever `super` is expected?".
///
/// Ancestor sets are cached inside the checker, so repeated queries against
/// the same provider share work.
pub struct CompatibilityChecker<'a, P: TypeProvider + ?Sized> {
    resolver: HierarchyResolver<'a, P>,
}

impl<'a, P: TypeProvider + ?Sized> CompatibilityChecker<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            resolver: HierarchyResolver::new(provider),
        }
    }

    pub fn with_options(provider: &'a P, options: ResolverOptions) -> Self {
        Self {
            resolver: HierarchyResolver::with_options(provider, options),
        }
    }

    /// `true` iff `sub` is `super_type` or `super_type` is one of its
    /// transitive supertypes.
    ///
    /// `sub` must be defined by the provider. `super_type` may be absent as
    /// long as it is reached as an opaque ancestor of `sub`; an absent name
    /// that is not reached is reported as an error rather than `false`.
    pub fn is_compatible(&mut self, super_type: &str, sub: &str) -> Result<bool, CheckError> {
        let super_type = normalize_type_name(super_type);
        let sub = normalize_type_name(sub);
        let provider = self.resolver.provider();

        require(provider, &sub)?;
        // Resolve even for identity so a broken hierarchy is never answered.
        let ancestors = self.resolver.ancestors_of(&sub)?;
        let compatible = if super_type == sub || ancestors.contains(&super_type) {
            true
        } else {
            require(provider, &super_type)?;
            false
        };

        tracing::debug!(
            target: "typecompat.hierarchy",
            super_type = %super_type,
            sub = %sub,
            compatible,
            opaque = ancestors.is_opaque(&super_type),
            "compatibility check"
        );
        Ok(compatible)
    }

    /// The shortest chain of direct-supertype edges from `sub` up to
    /// `super_type`, both ends included, or `None` when they are unrelated.
    pub fn supertype_path(
        &mut self,
        super_type: &str,
        sub: &str,
    ) -> Result<Option<Vec<String>>, CheckError> {
        if !self.is_compatible(super_type, sub)? {
            return Ok(None);
        }

        let super_type = normalize_type_name(super_type);
        let sub = normalize_type_name(sub);
        let provider = self.resolver.provider();

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut queue = VecDeque::from([sub.as_ref()]);
        while let Some(current) = queue.pop_front() {
            if current == super_type {
                let mut path = vec![current.to_string()];
                let mut cursor = current;
                while let Some(&parent) = parents.get(cursor) {
                    path.push(parent.to_string());
                    cursor = parent;
                }
                path.reverse();
                return Ok(Some(path));
            }
            let Some(descriptor) = provider.lookup_type(current) else {
                continue;
            };
            for supertype in descriptor.direct_supertypes() {
                if supertype != sub && !parents.contains_key(supertype) {
                    parents.insert(supertype, current);
                    queue.push_back(supertype);
                }
            }
        }

        // Object was implied above a superclass that is not in the catalog.
        if super_type == JAVA_LANG_OBJECT {
            let mut path = vec![sub.to_string()];
            let mut cursor = provider.lookup_type(&sub);
            while let Some(super_class) = cursor.and_then(|d| d.super_class.as_deref()) {
                path.push(super_class.to_string());
                cursor = provider.lookup_type(super_class);
            }
            path.push(JAVA_LANG_OBJECT.to_string());
            return Ok(Some(path));
        }
        Ok(None)
    }
}

/// One-shot convenience wrapper around [`CompatibilityChecker`].
pub fn is_compatible<P: TypeProvider + ?Sized>(
    provider: &P,
    super_type: &str,
    sub: &str,
) -> Result<bool, CheckError> {
    CompatibilityChecker::new(provider).is_compatible(super_type, sub)
}

fn require<P: TypeProvider + ?Sized>(provider: &P, name: &str) -> Result<(), CheckError> {
    if provider.lookup_type(name).is_some() {
        return Ok(());
    }
    match provider.malformed_type(name) {
        Some(malformed) => Err(CheckError::MalformedInput {
            name: name.to_string(),
            path: malformed.path.clone(),
            reason: malformed.error.to_string(),
        }),
        None => Err(CheckError::TypeNotFound {
            name: name.to_string(),
        }),
    }
}
