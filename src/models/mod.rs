//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`FsNode`], [`NodeMeta`], [`NodeKind`], [`DirEntry`] - Virtual filesystem representation
//! - [`OutputLine`] - Terminal output types
//! - [`Session`], [`InputMode`] - Interpreter session state

mod filesystem;
mod session;
mod terminal;

pub use filesystem::{DirEntry, FsNode, NodeKind, NodeMeta};
pub use session::{InputMode, Session};
pub use terminal::{OutputLine, TextStyle};
