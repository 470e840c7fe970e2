//! Core business logic for the shell.
//!
//! This module provides:
//! - [`VirtualFs`] node tree and [`path`] resolution
//! - [`Store`] with the user registry and [`SnapshotStore`] persistence
//! - [`Command`] parsing and [`execute_command`] execution
//! - [`Interpreter`], the per-line state machine used by the front end
//! - [`CommandHistory`] and [`autocomplete`] for the input line

mod auth;
mod autocomplete;
mod commands;
pub mod error;
mod filesystem;
mod history;
mod interpreter;
pub mod path;
mod storage;
mod store;

pub use autocomplete::{AutocompleteResult, autocomplete};
pub use commands::{
    Command, CommandContext, CommandResult, PathArg, Redirect, RedirectMode, execute_command,
};
pub use error::{AuthError, FsError, StorageError};
pub use filesystem::{VirtualFs, is_canonical_mode};
pub use history::CommandHistory;
pub use interpreter::Interpreter;
pub use storage::{FileStorage, MemoryStorage, SnapshotStore, Storage};
pub use store::{Store, UserRecord, default_store, now};
