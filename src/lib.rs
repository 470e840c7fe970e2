//! Simulated Ubuntu shell over a persisted virtual filesystem.
//!
//! The [`core`] module holds the node tree, path resolution, the user
//! registry and the command interpreter. [`shell::Shell`] is the thin front
//! end the binary drives line by line.

pub mod config;
pub mod core;
pub mod models;
pub mod shell;
pub mod utils;

pub use shell::Shell;
