//! Per-session interpreter state held by the front end.

use crate::config::{DEFAULT_USER, HOME_PREFIX};

/// What the next submitted line means to the interpreter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Lines are parsed as commands.
    #[default]
    Normal,
    /// Next line is the password for `user` (started by `su`).
    AwaitingLoginPassword { user: String },
    /// Next line is the root password; `command` runs as root on success.
    AwaitingSudoPassword { command: String },
}

impl InputMode {
    /// True while the next line is a password and must not be echoed or recorded.
    pub fn is_password(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Session state passed into the interpreter on every call.
///
/// Only [`Session::apply`] mutates it, using the result of the last command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Absolute path of the working directory.
    pub current_path: String,
    /// Pending multi-step input, if any.
    pub mode: InputMode,
}

impl Session {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            mode: InputMode::Normal,
        }
    }

    /// Apply path and mode changes requested by a command result.
    pub fn apply(&mut self, result: &crate::core::CommandResult) {
        if let Some(path) = &result.navigate_to {
            self.current_path = path.clone();
        }
        if let Some(mode) = &result.mode {
            self.mode = mode.clone();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(format!("{}/{}", HOME_PREFIX, DEFAULT_USER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CommandResult;

    #[test]
    fn test_default_session() {
        let session = Session::default();
        assert_eq!(session.current_path, "/home/ubuntu");
        assert_eq!(session.mode, InputMode::Normal);
    }

    #[test]
    fn test_apply_navigation_and_mode() {
        let mut session = Session::default();
        let result = CommandResult::navigate("/tmp").with_mode(InputMode::AwaitingLoginPassword {
            user: "root".to_string(),
        });
        session.apply(&result);
        assert_eq!(session.current_path, "/tmp");
        assert!(session.mode.is_password());

        session.apply(&CommandResult::empty());
        assert_eq!(session.current_path, "/tmp");
        assert!(session.mode.is_password());
    }
}
