//! Nominal subtyping over a [`typecompat_catalog::TypeCatalog`].
//!
//! [`HierarchyResolver`] computes the transitive supertypes of a type;
//! [`CompatibilityChecker`] answers "may `sub` be used where `super` is
//! expected?" on top of it.

mod checker;
mod resolver;

pub use checker::{is_compatible, CheckError, CompatibilityChecker};
pub use resolver::{
    AncestorSet, HierarchyResolver, ResolveError, ResolverOptions, DEFAULT_MAX_VISITED,
};
