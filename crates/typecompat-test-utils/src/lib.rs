//! Utilities shared by typecompat tests.
//!
//! Tests never check in binary fixtures: [`ClassFileBuilder`] writes real
//! classfile bytes and [`ClassTree`] lays them out in a temporary class root.

mod builder;
mod tree;

pub use builder::ClassFileBuilder;
pub use tree::ClassTree;
