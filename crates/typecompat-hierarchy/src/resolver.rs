use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use typecompat_catalog::TypeProvider;
use typecompat_classfile::{normalize_type_name, TypeDescriptor, JAVA_LANG_OBJECT};

/// Upper bound on the number of types expanded while resolving one query.
pub const DEFAULT_MAX_VISITED: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    pub max_visited: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_visited: DEFAULT_MAX_VISITED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type {0} not found")]
    TypeNotFound(String),
    #[error("cyclic inheritance: {}", .path.join(" -> "))]
    CyclicHierarchy { path: Vec<String> },
    #[error("hierarchy of {name} has more than {limit} types")]
    HierarchyTooLarge { name: String, limit: usize },
}

/// The transitive supertypes of one type, excluding the type itself.
///
/// Iteration order is deterministic: each direct supertype (superclass first,
/// then interfaces in declaration order) followed by its own ancestors, with
/// names already present skipped. An implied `java.lang.Object` comes last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AncestorSet {
    // name -> opaque (not present in the catalog)
    names: IndexMap<String, bool>,
}

impl AncestorSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn is_opaque(&self, name: &str) -> bool {
        self.names.get(name).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }

    pub fn opaque(&self) -> impl Iterator<Item = &str> + '_ {
        self.names
            .iter()
            .filter(|(_, opaque)| **opaque)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, name: &str, opaque: bool) {
        if !self.names.contains_key(name) {
            self.names.insert(name.to_string(), opaque);
        }
    }

    fn extend(&mut self, other: &AncestorSet) {
        for (name, opaque) in &other.names {
            self.insert(name, *opaque);
        }
    }
}

/// A type whose direct supertypes are being expanded.
struct Frame<'a> {
    name: &'a str,
    supertypes: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(descriptor: &'a TypeDescriptor) -> Self {
        Self {
            name: &descriptor.name,
            supertypes: descriptor.direct_supertypes().collect(),
            next: 0,
        }
    }

    fn next_supertype(&mut self) -> Option<&'a str> {
        let next = self.supertypes.get(self.next).copied()?;
        self.next += 1;
        Some(next)
    }
}

/// Computes and caches ancestor sets for the lifetime of one invocation.
pub struct HierarchyResolver<'a, P: TypeProvider + ?Sized> {
    provider: &'a P,
    options: ResolverOptions,
    cache: HashMap<String, Arc<AncestorSet>>,
}

impl<'a, P: TypeProvider + ?Sized> HierarchyResolver<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self::with_options(provider, ResolverOptions::default())
    }

    pub fn with_options(provider: &'a P, options: ResolverOptions) -> Self {
        Self {
            provider,
            options,
            cache: HashMap::new(),
        }
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// All transitive supertypes of `name`.
    ///
    /// Supertypes missing from the provider are included as opaque entries
    /// but not expanded. A class always has `java.lang.Object` among its
    /// ancestors, even when its superclass chain ends at an opaque type.
    /// Fails if `name` itself is unknown or if an inheritance cycle is
    /// reachable from it.
    pub fn ancestors_of(&mut self, name: &str) -> Result<Arc<AncestorSet>, ResolveError> {
        let name = normalize_type_name(name);
        if let Some(cached) = self.cache.get(name.as_ref()) {
            return Ok(Arc::clone(cached));
        }

        let provider = self.provider;
        let root = provider
            .lookup_type(&name)
            .ok_or_else(|| ResolveError::TypeNotFound(name.to_string()))?;

        let mut set = AncestorSet::default();
        let mut stack = vec![Frame::new(root)];
        let mut on_path: HashSet<&str> = HashSet::from([root.name.as_str()]);
        let mut expanded = 1usize;

        while let Some(frame) = stack.last_mut() {
            let Some(supertype) = frame.next_supertype() else {
                let done = frame.name;
                stack.pop();
                on_path.remove(done);
                continue;
            };

            if on_path.contains(supertype) {
                return Err(ResolveError::CyclicHierarchy {
                    path: cycle_path(&stack, supertype),
                });
            }
            if set.contains(supertype) {
                continue;
            }
            if let Some(cached) = self.cache.get(supertype) {
                set.insert(supertype, false);
                set.extend(cached);
                continue;
            }
            let Some(descriptor) = provider.lookup_type(supertype) else {
                // Opaque: kept by name, never expanded.
                set.insert(supertype, true);
                continue;
            };

            expanded += 1;
            if expanded > self.options.max_visited {
                return Err(ResolveError::HierarchyTooLarge {
                    name: name.into_owned(),
                    limit: self.options.max_visited,
                });
            }
            set.insert(supertype, false);
            on_path.insert(&descriptor.name);
            stack.push(Frame::new(descriptor));
        }

        let is_class = !root.is_interface() && root.name != JAVA_LANG_OBJECT;
        if is_class && !set.contains(JAVA_LANG_OBJECT) {
            // The superclass chain left the catalog before reaching the root.
            let opaque = provider.lookup_type(JAVA_LANG_OBJECT).is_none();
            set.insert(JAVA_LANG_OBJECT, opaque);
        }

        tracing::debug!(
            target: "typecompat.hierarchy",
            name = %name,
            ancestors = set.len(),
            expanded,
            "computed ancestor set"
        );
        let set = Arc::new(set);
        self.cache.insert(name.into_owned(), Arc::clone(&set));
        Ok(set)
    }
}

fn cycle_path(stack: &[Frame<'_>], repeated: &str) -> Vec<String> {
    let start = stack
        .iter()
        .position(|frame| frame.name == repeated)
        .unwrap_or(0);
    stack[start..]
        .iter()
        .map(|frame| frame.name.to_string())
        .chain(std::iter::once(repeated.to_string()))
        .collect()
}
