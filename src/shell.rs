//! Line-oriented front end around the [`Interpreter`].
//!
//! Owns everything the interpreter expects its caller to hold between
//! lines: the session, the command history and the visible scrollback.

use crate::config::{HOSTNAME, LOGIN_PROMPT, MAX_TERMINAL_HISTORY, SUDO_PROMPT};
use crate::core::{AutocompleteResult, CommandHistory, CommandResult, Interpreter, Storage, path};
use crate::models::{InputMode, OutputLine, Session};
use crate::utils::RingBuffer;

/// An interactive session over a storage backend.
pub struct Shell<S: Storage> {
    interpreter: Interpreter<S>,
    session: Session,
    history: CommandHistory,
    /// Output history (bounded by `MAX_TERMINAL_HISTORY`).
    scrollback: RingBuffer<OutputLine>,
}

impl<S: Storage> Shell<S> {
    pub fn new(storage: S) -> Self {
        Self {
            interpreter: Interpreter::new(storage),
            session: Session::default(),
            history: CommandHistory::new(),
            scrollback: RingBuffer::new(MAX_TERMINAL_HISTORY),
        }
    }

    /// Welcome banner, also recorded in the scrollback.
    pub fn welcome(&mut self) -> Vec<OutputLine> {
        let lines = Interpreter::<S>::welcome();
        for line in &lines {
            self.scrollback.push(line.clone());
        }
        lines
    }

    /// Submit one line, as if Enter was pressed.
    ///
    /// Password lines are neither recorded in history nor echoed.
    pub fn submit(&mut self, line: &str) -> CommandResult {
        let echo = if self.session.mode.is_password() {
            self.prompt()
        } else {
            self.history.push(line);
            format!("{}{}", self.prompt(), line)
        };

        let result = self.interpreter.execute(line, &self.session, &self.history);
        self.session.apply(&result);

        if result.clear {
            self.scrollback.clear();
        } else {
            self.scrollback.push(OutputLine::text(echo));
        }
        for line in &result.output {
            self.scrollback.push(line.clone());
        }
        result
    }

    /// Prompt for the next line: `user@host:path$ ` or a password prompt.
    pub fn prompt(&self) -> String {
        match &self.session.mode {
            InputMode::AwaitingLoginPassword { .. } => format!("{} ", LOGIN_PROMPT),
            InputMode::AwaitingSudoPassword { .. } => format!("{} ", SUDO_PROMPT),
            InputMode::Normal => {
                let store = self.interpreter.store();
                let sigil = if store.is_root() { '#' } else { '$' };
                format!(
                    "{}@{}:{}{} ",
                    store.current_user,
                    HOSTNAME,
                    path::display(&self.session.current_path, &store.home_dir()),
                    sigil
                )
            }
        }
    }

    /// Previous history entry (Up arrow).
    pub fn history_prev(&mut self) -> String {
        self.history.prev_entry().to_string()
    }

    /// Next history entry (Down arrow); empty past the newest.
    pub fn history_next(&mut self) -> String {
        self.history.next_entry().to_string()
    }

    /// Tab completion for the current input line.
    pub fn complete(&self, input: &str) -> AutocompleteResult {
        self.interpreter.complete(input, &self.session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Visible output, oldest first.
    pub fn scrollback(&self) -> impl Iterator<Item = &OutputLine> {
        self.scrollback.iter()
    }
}
