//! Line interpreter: the state machine between the front end and the store.
//!
//! Every call loads the full store, runs one line and saves it again. The
//! store is never cached between calls.

use std::ops::{Deref, DerefMut};

use crate::config::{ROOT_USER, WELCOME_TEXT};
use crate::core::autocomplete::{AutocompleteResult, autocomplete};
use crate::core::commands::{Command, CommandContext, CommandResult, execute_command};
use crate::core::history::CommandHistory;
use crate::core::storage::{SnapshotStore, Storage};
use crate::core::store::{Store, now};
use crate::models::{InputMode, OutputLine, Session};

/// Runs submitted lines against a persisted store.
pub struct Interpreter<S: Storage> {
    snapshots: SnapshotStore<S>,
}

impl<S: Storage> Interpreter<S> {
    pub fn new(storage: S) -> Self {
        Self {
            snapshots: SnapshotStore::new(storage),
        }
    }

    /// Interpret one submitted line in the context of `session`.
    ///
    /// The returned result carries the path and mode the session should
    /// adopt; apply it with [`Session::apply`].
    pub fn execute(
        &mut self,
        line: &str,
        session: &Session,
        history: &CommandHistory,
    ) -> CommandResult {
        let mut store = self.snapshots.load();
        let now = now();

        let mut result = match &session.mode {
            InputMode::Normal => dispatch(line, &mut store, &session.current_path, history, now),
            InputMode::AwaitingLoginPassword { user } => finish_login(&store, user, line),
            InputMode::AwaitingSudoPassword { command } => finish_sudo(
                &mut store,
                command,
                line,
                &session.current_path,
                history,
                now,
            ),
        };

        if let Some(user) = result.switch_user.take() {
            if let Err(e) = store.switch_user(&user) {
                result.output.push(OutputLine::error(format!("su: {}", e)));
                result.navigate_to = None;
            }
        }

        self.snapshots.save(&store);
        result
    }

    /// Tab completion against the current store.
    pub fn complete(&self, input: &str, session: &Session) -> AutocompleteResult {
        let store = self.snapshots.load();
        autocomplete(input, &session.current_path, &store)
    }

    /// Snapshot of the persisted store.
    pub fn store(&self) -> Store {
        self.snapshots.load()
    }

    pub fn current_user(&self) -> String {
        self.snapshots.load().current_user
    }

    /// Banner printed when a session starts.
    pub fn welcome() -> Vec<OutputLine> {
        WELCOME_TEXT.lines().map(OutputLine::info).collect()
    }
}

/// Parse and run a command line. Blank input does nothing.
fn dispatch(
    line: &str,
    store: &mut Store,
    current_path: &str,
    history: &CommandHistory,
    now: u64,
) -> CommandResult {
    let Some(cmd) = Command::parse_line(line) else {
        return CommandResult::empty();
    };
    let mut ctx = CommandContext {
        store,
        current_path,
        history,
        now,
    };
    execute_command(cmd, &mut ctx)
}

fn finish_login(store: &Store, user: &str, password: &str) -> CommandResult {
    log::debug!("login password submitted for {}", user);
    if store.authenticate(user, password) {
        CommandResult::navigate(store.home_dir_of(user))
            .with_switch_user(user)
            .with_mode(InputMode::Normal)
    } else {
        CommandResult::error("Authentication failed.").with_mode(InputMode::Normal)
    }
}

fn finish_sudo(
    store: &mut Store,
    command: &str,
    password: &str,
    current_path: &str,
    history: &CommandHistory,
    now: u64,
) -> CommandResult {
    if !store.authenticate(ROOT_USER, password) {
        log::debug!("sudo authentication failed");
        return CommandResult::error("Sorry, try again.").with_mode(InputMode::Normal);
    }

    let mut result = {
        let mut elevated = Elevation::acquire(store);
        dispatch(command, &mut elevated, current_path, history, now)
    };
    // a nested sudo or su may still ask for input
    if result.mode.is_none() {
        result.mode = Some(InputMode::Normal);
    }
    result
}

// =============================================================================
// Scoped Elevation
// =============================================================================

/// Runs as root while alive; the previous user is restored on drop.
struct Elevation<'a> {
    store: &'a mut Store,
    previous: String,
}

impl<'a> Elevation<'a> {
    fn acquire(store: &'a mut Store) -> Self {
        let previous = std::mem::replace(&mut store.current_user, ROOT_USER.to_string());
        log::debug!("elevated {} to {}", previous, ROOT_USER);
        Self { store, previous }
    }
}

impl Deref for Elevation<'_> {
    type Target = Store;

    fn deref(&self) -> &Store {
        self.store
    }
}

impl DerefMut for Elevation<'_> {
    fn deref_mut(&mut self) -> &mut Store {
        self.store
    }
}

impl Drop for Elevation<'_> {
    fn drop(&mut self) {
        self.store.current_user = std::mem::take(&mut self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;

    struct Harness {
        interpreter: Interpreter<MemoryStorage>,
        session: Session,
        history: CommandHistory,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                interpreter: Interpreter::new(MemoryStorage::new()),
                session: Session::default(),
                history: CommandHistory::new(),
            }
        }

        fn submit(&mut self, line: &str) -> Vec<String> {
            let result = self.interpreter.execute(line, &self.session, &self.history);
            self.session.apply(&result);
            result.text_lines()
        }
    }

    #[test]
    fn test_blank_line_is_noop() {
        let mut h = Harness::new();
        let result = h.interpreter.execute("   ", &h.session, &h.history);
        assert_eq!(result, CommandResult::empty());
    }

    #[test]
    fn test_sudo_wrong_password() {
        let mut h = Harness::new();
        h.submit("sudo rm -r /etc");
        assert!(h.session.mode.is_password());

        assert_eq!(h.submit("wrong"), vec!["Sorry, try again."]);
        assert_eq!(h.session.mode, InputMode::Normal);
        assert_eq!(h.interpreter.current_user(), "ubuntu");
        assert!(h.interpreter.store().root.get_node("/etc").is_some());
    }

    #[test]
    fn test_sudo_correct_password_restores_user() {
        let mut h = Harness::new();
        h.submit("sudo rm -r /etc");
        assert!(h.submit("toor").is_empty());
        assert_eq!(h.session.mode, InputMode::Normal);
        assert!(h.interpreter.store().root.get_node("/etc").is_none());
        assert_eq!(h.submit("whoami"), vec!["ubuntu"]);
    }

    #[test]
    fn test_sudo_whoami_runs_as_root() {
        let mut h = Harness::new();
        h.submit("sudo whoami");
        assert_eq!(h.submit("toor"), vec!["root"]);
        assert_eq!(h.interpreter.current_user(), "ubuntu");
    }

    #[test]
    fn test_sudo_su_keeps_switch() {
        let mut h = Harness::new();
        h.submit("sudo su");
        h.submit("toor");
        assert_eq!(h.interpreter.current_user(), "root");
        assert_eq!(h.session.current_path, "/home/ubuntu");
        assert_eq!(h.submit("whoami"), vec!["root"]);
    }

    #[test]
    fn test_su_login_flow() {
        let mut h = Harness::new();
        assert!(h.submit("su").is_empty());
        assert_eq!(
            h.session.mode,
            InputMode::AwaitingLoginPassword {
                user: "root".to_string()
            }
        );
        assert_eq!(h.submit("nope"), vec!["Authentication failed."]);
        assert_eq!(h.session.mode, InputMode::Normal);
        assert_eq!(h.interpreter.current_user(), "ubuntu");

        h.submit("su root");
        h.submit("toor");
        assert_eq!(h.interpreter.current_user(), "root");
        assert_eq!(h.session.current_path, "/root");
    }

    #[test]
    fn test_elevation_restores_on_drop() {
        let mut store = crate::core::store::default_store(0);
        {
            let elevated = Elevation::acquire(&mut store);
            assert!(elevated.is_root());
        }
        assert_eq!(store.current_user, "ubuntu");
    }

    #[test]
    fn test_welcome_lines() {
        let lines = Interpreter::<MemoryStorage>::welcome();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].to_string().starts_with("Welcome to Ubuntu"));
    }
}
