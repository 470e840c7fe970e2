//! Command execution result type.

use crate::models::{InputMode, OutputLine};

/// Result of executing a command.
///
/// Commands produce output and may request changes the caller applies
/// afterwards: a new working directory, an input mode transition, a cleared
/// screen or a user switch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Output lines to display
    pub output: Vec<OutputLine>,
    /// Absolute path to make the working directory (e.g., for `cd`)
    pub navigate_to: Option<String>,
    /// Input mode for the next submitted line
    pub mode: Option<InputMode>,
    /// Wipe visible output before printing
    pub clear: bool,
    /// User to switch to once the command has finished
    pub switch_user: Option<String>,
}

impl CommandResult {
    /// Create a result with just output, no navigation.
    pub fn output(lines: Vec<OutputLine>) -> Self {
        Self {
            output: lines,
            ..Self::default()
        }
    }

    /// Create a result holding a single error line.
    pub fn error(message: impl Into<String>) -> Self {
        Self::output(vec![OutputLine::error(message)])
    }

    /// Create a result with navigation and no output.
    pub fn navigate(path: impl Into<String>) -> Self {
        Self {
            navigate_to: Some(path.into()),
            ..Self::default()
        }
    }

    /// Create an empty result (no output, no navigation).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a result asking the front end to clear the screen.
    pub fn clear_screen() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_switch_user(mut self, user: impl Into<String>) -> Self {
        self.switch_user = Some(user.into());
        self
    }

    /// Lines as plain text, without styling.
    pub fn text_lines(&self) -> Vec<String> {
        self.output.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let result = CommandResult::navigate("/tmp")
            .with_mode(InputMode::Normal)
            .with_switch_user("root");
        assert_eq!(result.navigate_to.as_deref(), Some("/tmp"));
        assert_eq!(result.mode, Some(InputMode::Normal));
        assert_eq!(result.switch_user.as_deref(), Some("root"));
        assert!(result.output.is_empty());
        assert!(!result.clear);
    }

    #[test]
    fn test_text_lines() {
        let result = CommandResult::output(vec![
            OutputLine::dir_entry("docs"),
            OutputLine::file_entry("a.txt"),
        ]);
        assert_eq!(result.text_lines(), vec!["docs/", "a.txt"]);
        assert!(CommandResult::error("x").output[0].is_error());
    }
}
