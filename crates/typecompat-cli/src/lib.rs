//! Library wrapper around the `type-compat` binary.
//!
//! Compiling `main.rs` as a module lets `cargo test -p typecompat-cli --lib`
//! typecheck and unit test the CLI without building the binary test suite.

#[allow(dead_code)]
#[path = "main.rs"]
mod main_bin;
