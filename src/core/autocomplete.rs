//! Tab autocomplete for command names and paths.
//!
//! This module provides completion for:
//! - Command names (e.g., "wh" → "whoami")
//! - Child names for path-taking commands (e.g., "cd Do" → "cd Documents/")
//!
//! The autocomplete system supports:
//! - Single match: Complete immediately
//! - Multiple matches: Show common prefix and all options

use crate::config::PATH_COMMANDS;
use crate::core::commands::Command;
use crate::core::store::Store;
use crate::models::DirEntry;

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single exact match - complete with this value.
    Single(String),
    /// Multiple matches - (common_prefix, all_matches).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

// ============================================================================
// Completion Context
// ============================================================================

/// Determines what type of completion is needed for the input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CompletionMode {
    /// Complete command names only.
    Command,
    /// Complete child names of a directory.
    Path,
    /// No completion available.
    None,
}

impl CompletionMode {
    /// Determine completion mode from input.
    ///
    /// A trailing space counts as an empty token, so `"cd "` completes paths.
    fn from_input(input: &str) -> (Self, Vec<&str>) {
        let parts: Vec<&str> = input.split(' ').collect();

        let mode = match parts.as_slice() {
            [_] => Self::Command,
            [cmd, _] if PATH_COMMANDS.contains(&cmd.to_lowercase().as_str()) => Self::Path,
            _ => Self::None,
        };

        (mode, parts)
    }
}

// ============================================================================
// Path Parsing
// ============================================================================

/// Parsed path components for autocomplete.
struct ParsedPath<'a> {
    /// Directory prefix as typed (e.g., "projects/" or "").
    dir_part: &'a str,
    /// Name being completed.
    name_part: &'a str,
    /// Absolute path of the directory to search.
    search_dir: String,
}

impl<'a> ParsedPath<'a> {
    fn parse(partial: &'a str, current_path: &str, store: &Store) -> Self {
        let (dir_part, name_part) = match partial.rfind('/') {
            Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
            None => ("", partial),
        };

        let search_dir = match dir_part {
            "" => current_path.to_string(),
            "/" => "/".to_string(),
            dir => store.resolve(dir.trim_end_matches('/'), current_path),
        };

        Self {
            dir_part,
            name_part,
            search_dir,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Perform autocomplete on Tab press.
///
/// Returns a completion result based on the current input and the tree.
pub fn autocomplete(input: &str, current_path: &str, store: &Store) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    let (mode, parts) = CompletionMode::from_input(input);

    match mode {
        CompletionMode::Command => complete_command(parts[0]),
        CompletionMode::Path => complete_path(parts[0], parts[1], current_path, store),
        CompletionMode::None => AutocompleteResult::None,
    }
}

// ============================================================================
// Command Completion
// ============================================================================

fn complete_command(partial: &str) -> AutocompleteResult {
    let partial_lower = partial.to_lowercase();
    let matches: Vec<String> = Command::names()
        .iter()
        .filter(|cmd| cmd.starts_with(&partial_lower))
        .map(|s| s.to_string())
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{} ", matches[0])),
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(common, matches)
        }
    }
}

// ============================================================================
// Path Completion
// ============================================================================

fn complete_path(
    cmd: &str,
    partial: &str,
    current_path: &str,
    store: &Store,
) -> AutocompleteResult {
    let parsed = ParsedPath::parse(partial, current_path, store);

    let Some(entries) = store.root.list_dir(&parsed.search_dir) else {
        return AutocompleteResult::None;
    };

    let matches: Vec<&DirEntry> = entries
        .iter()
        .filter(|entry| entry.name.starts_with(parsed.name_part))
        .collect();

    match matches.as_slice() {
        [] => AutocompleteResult::None,
        [entry] => {
            let suffix = if entry.is_dir { "/" } else { " " };
            AutocompleteResult::Single(format!(
                "{} {}{}{}",
                cmd, parsed.dir_part, entry.name, suffix
            ))
        }
        _ => {
            let names: Vec<String> = matches.iter().map(|e| e.name.clone()).collect();
            let common = find_common_prefix(&names);

            let display_names = matches
                .iter()
                .map(|entry| {
                    if entry.is_dir {
                        format!("{}/", entry.name)
                    } else {
                        entry.name.clone()
                    }
                })
                .collect();

            AutocompleteResult::Multiple(
                format!("{} {}{}", cmd, parsed.dir_part, common),
                display_names,
            )
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Find the common prefix of multiple strings.
fn find_common_prefix(strings: &[String]) -> String {
    let Some(first) = strings.first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for s in &strings[1..] {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, a), _)| i + a.len_utf8())
            .unwrap_or(0)
            .min(prefix_len);
    }

    first[..prefix_len].to_string()
}

// ============================================================================
// Tests
// ============================================================================
