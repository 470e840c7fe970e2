//! Terminal-related data types for output rendering.

use std::fmt;

/// Text styling for file listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// Directory entries (rendered with a trailing `/`)
    Directory,
    /// Regular file entries
    File,
    /// Hidden files (dimmed)
    Hidden,
}

/// A single line of command output.
///
/// The variant only tells the front end how to style the line; the text is
/// always available through [`fmt::Display`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputLine {
    /// Plain text output
    Text(String),
    /// Error message (red)
    Error(String),
    /// Success message (green)
    Success(String),
    /// Info message (yellow)
    Info(String),
    /// Empty line
    Empty,
    /// File listing entry (short `ls` format)
    ListEntry { name: String, style: TextStyle },
}

impl OutputLine {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn success(s: impl Into<String>) -> Self {
        Self::Success(s.into())
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self::Info(s.into())
    }

    pub fn empty() -> Self {
        Self::Empty
    }

    /// Create a directory listing entry
    pub fn dir_entry(name: impl Into<String>) -> Self {
        Self::ListEntry {
            name: name.into(),
            style: TextStyle::Directory,
        }
    }

    /// Create a file listing entry
    pub fn file_entry(name: impl Into<String>) -> Self {
        let name = name.into();
        let style = if name.starts_with('.') {
            TextStyle::Hidden
        } else {
            TextStyle::File
        };
        Self::ListEntry { name, style }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Error(s) | Self::Success(s) | Self::Info(s) => {
                write!(f, "{}", s)
            }
            Self::Empty => Ok(()),
            Self::ListEntry {
                name,
                style: TextStyle::Directory,
            } => write!(f, "{}/", name),
            Self::ListEntry { name, .. } => write!(f, "{}", name),
        }
    }
}
