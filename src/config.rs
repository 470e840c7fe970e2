//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! Text assets are loaded at compile time using `include_str!`.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/text/help.txt");

/// Lines printed when a session starts.
pub const WELCOME_TEXT: &str = include_str!("../assets/text/welcome.txt");

// =============================================================================
// Host Identity
// =============================================================================

/// Hostname shown in the prompt and by `uname -a`.
pub const HOSTNAME: &str = "ubuntu";

/// Kernel release reported by `uname -a`.
pub const KERNEL_RELEASE: &str = "5.15.0-91-generic";

/// Distribution codename used in apt transcripts.
pub const DISTRO_CODENAME: &str = "jammy";

// =============================================================================
// Users
// =============================================================================

/// Superuser account name.
pub const ROOT_USER: &str = "root";

/// Account a fresh store starts logged in as.
pub const DEFAULT_USER: &str = "ubuntu";

/// Parent directory for home directories of regular users.
pub const HOME_PREFIX: &str = "/home";

/// Profile file seeded into every new home directory.
pub const PROFILE_FILE: &str = ".profile";

/// Content of a freshly seeded profile file.
pub const DEFAULT_PROFILE: &str = "# ~/.profile: executed by the command interpreter for login shells.\n\
export PATH=\"$HOME/bin:/usr/local/bin:/usr/bin:/bin\"\n\
export EDITOR=vim";

// =============================================================================
// Filesystem Configuration
// =============================================================================

/// Permission string given to newly created files.
pub const DEFAULT_FILE_PERMISSIONS: &str = "rw-r--r--";

/// Permission string given to newly created directories.
pub const DEFAULT_DIR_PERMISSIONS: &str = "rwxr-xr-x";

/// Commands whose single argument is completed against directory entries.
pub const PATH_COMMANDS: &[&str] = &[
    "cat", "cd", "chmod", "cp", "grep", "ls", "mkdir", "mv", "rm", "touch",
];

// =============================================================================
// Storage Configuration
// =============================================================================

/// Key under which the filesystem snapshot is persisted.
pub const STORAGE_KEY: &str = "vshell.fs";

/// Default state file used by the binary.
pub const DEFAULT_STATE_FILE: &str = "vshell-state.json";

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of output lines kept in the scrollback.
pub const MAX_TERMINAL_HISTORY: usize = 1000;

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 100;

/// Prompt shown while waiting for a `su` password.
pub const LOGIN_PROMPT: &str = "Password:";

/// Prompt shown while waiting for the root password after `sudo`.
pub const SUDO_PROMPT: &str = "[sudo] password for root:";

/// Range of pseudo-random PIDs shown by `ps` and `top`.
pub const PID_RANGE: std::ops::Range<u32> = 1000..9000;
