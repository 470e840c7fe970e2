//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed shell commands
//! - `CommandResult` for command execution results
//! - `execute_command` for running a parsed command against the store
//!
//! # Architecture
//!
//! A line is split on whitespace and parsed into the closed `Command` enum,
//! then executed via `execute_command`, a total match over every variant.
//! Unknown names become [`Command::Unknown`] instead of a runtime miss.

mod execute;
mod result;
mod system;

pub use execute::{CommandContext, execute_command};
pub use result::CommandResult;

use std::fmt;

// =============================================================================
// Path Argument Type
// =============================================================================

/// A path argument passed to a command (e.g., `cd foo`, `cat bar.txt`).
///
/// Stored exactly as typed; resolution against the working directory and
/// the existence check happen during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PathArg {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Redirection
// =============================================================================

/// Output redirection operator of `echo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>` replaces the file content
    Overwrite,
    /// `>>` appends on a new line
    Append,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub mode: RedirectMode,
    pub target: PathArg,
}

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Pwd,
    Cd(PathArg),
    Ls {
        path: Option<PathArg>,
        /// `-a`: include dot files
        all: bool,
        /// `-l`: long format
        long: bool,
    },
    Mkdir {
        paths: Vec<PathArg>,
        /// `-p`: create parents, tolerate existing directories
        parents: bool,
    },
    Touch(Vec<PathArg>),
    Cat(Vec<PathArg>),
    Echo {
        text: String,
        redirect: Option<Redirect>,
    },
    Rm {
        paths: Vec<PathArg>,
        recursive: bool,
        force: bool,
    },
    Clear,
    Whoami,
    /// Remainder of the line, run as root once the password is given
    Sudo(String),
    Su(String),
    AddUser {
        name: Option<String>,
        password: Option<String>,
    },
    Passwd {
        user: Option<String>,
        password: Option<String>,
    },
    Apt(Vec<String>),
    Grep {
        pattern: String,
        file: PathArg,
    },
    Date,
    Uname {
        all: bool,
    },
    Df,
    Ps,
    Top,
    Cp {
        src: PathArg,
        dst: PathArg,
    },
    Mv {
        src: PathArg,
        dst: PathArg,
    },
    Chmod {
        mode: String,
        path: PathArg,
    },
    Man(Option<String>),
    Help,
    History,
    Exit,
    /// Known command with unusable arguments; holds the usage error
    Invalid(String),
    Unknown {
        name: String,
        /// Second token was `--help` or `-h`
        help: bool,
    },
}

impl Command {
    /// Get all available command names for autocomplete.
    pub fn names() -> &'static [&'static str] {
        &[
            "adduser", "apt", "apt-get", "cat", "cd", "chmod", "clear", "cp", "date", "df",
            "echo", "exit", "grep", "help", "history", "ls", "man", "mkdir", "mv", "passwd",
            "ps", "pwd", "rm", "su", "sudo", "top", "touch", "uname", "whoami",
        ]
    }

    /// Parse a whole input line. Returns `None` for blank input.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        let args: Vec<String> = tokens.map(str::to_string).collect();
        Some(Self::parse(name, &args))
    }

    /// Parse command from name and arguments.
    ///
    /// The name is matched case-insensitively; arguments keep their case.
    pub fn parse(name: &str, args: &[String]) -> Self {
        match name.to_lowercase().as_str() {
            "pwd" => Self::Pwd,
            "cd" => Self::Cd(
                args.first()
                    .map(PathArg::new)
                    .unwrap_or_else(|| PathArg::new("~")),
            ),
            "ls" => {
                let (flags, operands) = split_flags(args);
                Self::Ls {
                    path: operands.first().map(|p| PathArg::new(p.as_str())),
                    all: flags.contains(&'a'),
                    long: flags.contains(&'l'),
                }
            }
            "mkdir" => {
                let (flags, operands) = split_flags(args);
                if operands.is_empty() {
                    return Self::Invalid("mkdir: missing operand".to_string());
                }
                Self::Mkdir {
                    paths: operands.iter().map(|p| PathArg::new(p.as_str())).collect(),
                    parents: flags.contains(&'p'),
                }
            }
            "touch" => match path_operands(args) {
                Some(paths) => Self::Touch(paths),
                None => Self::Invalid("touch: missing file operand".to_string()),
            },
            "cat" => match path_operands(args) {
                Some(paths) => Self::Cat(paths),
                None => Self::Invalid("cat: missing file operand".to_string()),
            },
            "echo" => parse_echo(args),
            "rm" => {
                let (flags, operands) = split_flags(args);
                if operands.is_empty() {
                    return Self::Invalid("rm: missing operand".to_string());
                }
                Self::Rm {
                    paths: operands.iter().map(|p| PathArg::new(p.as_str())).collect(),
                    recursive: flags.contains(&'r') || flags.contains(&'R'),
                    force: flags.contains(&'f'),
                }
            }
            "clear" => Self::Clear,
            "whoami" => Self::Whoami,
            "sudo" => {
                if args.is_empty() {
                    Self::Invalid("usage: sudo <command>".to_string())
                } else {
                    Self::Sudo(args.join(" "))
                }
            }
            "su" => Self::Su(
                args.iter()
                    .find(|a| !a.starts_with('-'))
                    .cloned()
                    .unwrap_or_else(|| crate::config::ROOT_USER.to_string()),
            ),
            "adduser" => Self::AddUser {
                name: args.first().cloned(),
                password: args.get(1).cloned(),
            },
            "passwd" => Self::Passwd {
                user: args.first().cloned(),
                password: args.get(1).cloned(),
            },
            "apt" | "apt-get" => Self::Apt(args.to_vec()),
            "grep" => match args {
                [pattern, file, ..] => Self::Grep {
                    pattern: unquote(pattern),
                    file: PathArg::new(file),
                },
                _ => Self::Invalid("usage: grep <pattern> <file>".to_string()),
            },
            "date" => Self::Date,
            "uname" => Self::Uname {
                all: split_flags(args).0.contains(&'a'),
            },
            "df" => Self::Df,
            "ps" => Self::Ps,
            "top" => Self::Top,
            "cp" | "mv" => parse_transfer(name.to_lowercase().as_str(), args),
            "chmod" => match args {
                [mode, path, ..] => Self::Chmod {
                    mode: mode.clone(),
                    path: PathArg::new(path),
                },
                [mode] => Self::Invalid(format!("chmod: missing operand after '{}'", mode)),
                [] => Self::Invalid("chmod: missing operand".to_string()),
            },
            "man" => Self::Man(args.first().cloned()),
            "help" => Self::Help,
            "history" => Self::History,
            "exit" | "logout" => Self::Exit,
            _ => Self::Unknown {
                name: name.to_string(),
                help: matches!(args.first().map(String::as_str), Some("--help" | "-h")),
            },
        }
    }
}

// =============================================================================
// Argument Helpers
// =============================================================================

/// Split arguments into single-letter flags and operands.
///
/// `-la` yields `['l', 'a']`; a lone `-` is an operand.
fn split_flags(args: &[String]) -> (Vec<char>, Vec<&String>) {
    let mut flags = Vec::new();
    let mut operands = Vec::new();
    for arg in args {
        match arg.strip_prefix('-') {
            Some(cluster) if !cluster.is_empty() && !cluster.starts_with('-') => {
                flags.extend(cluster.chars())
            }
            Some(long) if long.starts_with('-') => {}
            _ => operands.push(arg),
        }
    }
    (flags, operands)
}

fn path_operands(args: &[String]) -> Option<Vec<PathArg>> {
    if args.is_empty() {
        None
    } else {
        Some(args.iter().map(PathArg::new).collect())
    }
}

/// Drop quote characters, the way the shell would after word splitting.
fn unquote(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

fn parse_echo(args: &[String]) -> Command {
    let mut words = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let (mode, rest) = if let Some(rest) = arg.strip_prefix(">>") {
            (RedirectMode::Append, rest)
        } else if let Some(rest) = arg.strip_prefix('>') {
            (RedirectMode::Overwrite, rest)
        } else {
            words.push(arg.as_str());
            continue;
        };

        let target = if rest.is_empty() {
            iter.next().map(String::as_str)
        } else {
            Some(rest)
        };
        return match target {
            Some(target) => Command::Echo {
                text: unquote(&words.join(" ")),
                redirect: Some(Redirect {
                    mode,
                    target: PathArg::new(unquote(target)),
                }),
            },
            None => Command::Invalid("syntax error near unexpected token `newline'".to_string()),
        };
    }

    Command::Echo {
        text: unquote(&words.join(" ")),
        redirect: None,
    }
}

/// `cp` and `mv` share argument handling; `-r` and friends are accepted and ignored.
fn parse_transfer(name: &str, args: &[String]) -> Command {
    let (_, operands) = split_flags(args);
    match operands.as_slice() {
        [src, dst, ..] => {
            let (src, dst) = (PathArg::new(src.as_str()), PathArg::new(dst.as_str()));
            if name == "mv" {
                Command::Mv { src, dst }
            } else {
                Command::Cp { src, dst }
            }
        }
        [src] => Command::Invalid(format!(
            "{}: missing destination file operand after '{}'",
            name, src
        )),
        [] => Command::Invalid(format!("{}: missing file operand", name)),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_ls() {
        assert!(matches!(
            Command::parse("ls", &[]),
            Command::Ls {
                path: None,
                all: false,
                long: false
            }
        ));
        assert!(matches!(
            Command::parse("ls", &args(&["-la", "docs"])),
            Command::Ls { path: Some(ref p), all: true, long: true } if p == &"docs"
        ));
        assert!(matches!(
            Command::parse("ls", &args(&["-l", "-a"])),
            Command::Ls {
                path: None,
                all: true,
                long: true
            }
        ));
    }

    #[test]
    fn test_parse_cd() {
        assert_eq!(Command::parse("cd", &[]), Command::Cd(PathArg::new("~")));
        assert_eq!(
            Command::parse("cd", &args(&["/home"])),
            Command::Cd(PathArg::new("/home"))
        );
    }

    #[test]
    fn test_parse_multiple_operands() {
        assert_eq!(
            Command::parse("touch", &args(&["a", "b"])),
            Command::Touch(vec![PathArg::new("a"), PathArg::new("b")])
        );
        assert!(matches!(
            Command::parse("mkdir", &args(&["-p", "x/y", "z"])),
            Command::Mkdir { ref paths, parents: true } if paths.len() == 2
        ));
    }

    #[test]
    fn test_parse_missing_operands() {
        assert!(matches!(Command::parse("cat", &[]), Command::Invalid(_)));
        assert!(matches!(Command::parse("rm", &args(&["-rf"])), Command::Invalid(_)));
        assert!(matches!(Command::parse("sudo", &[]), Command::Invalid(_)));
        assert!(matches!(Command::parse("grep", &args(&["x"])), Command::Invalid(_)));
        assert_eq!(
            Command::parse("cp", &args(&["a"])),
            Command::Invalid("cp: missing destination file operand after 'a'".to_string())
        );
        assert_eq!(
            Command::parse("chmod", &[]),
            Command::Invalid("chmod: missing operand".to_string())
        );
    }

    #[test]
    fn test_parse_rm_flags() {
        assert!(matches!(
            Command::parse("rm", &args(&["-rf", "/etc"])),
            Command::Rm {
                recursive: true,
                force: true,
                ..
            }
        ));
        assert!(matches!(
            Command::parse("rm", &args(&["file"])),
            Command::Rm {
                recursive: false,
                force: false,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_echo_redirect() {
        assert_eq!(
            Command::parse("echo", &args(&["hello", ">", "a.txt"])),
            Command::Echo {
                text: "hello".to_string(),
                redirect: Some(Redirect {
                    mode: RedirectMode::Overwrite,
                    target: PathArg::new("a.txt"),
                }),
            }
        );
        assert_eq!(
            Command::parse("echo", &args(&["world", ">>a.txt"])),
            Command::Echo {
                text: "world".to_string(),
                redirect: Some(Redirect {
                    mode: RedirectMode::Append,
                    target: PathArg::new("a.txt"),
                }),
            }
        );
        assert!(matches!(
            Command::parse("echo", &args(&["x", ">"])),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_echo_quotes() {
        assert_eq!(
            Command::parse("echo", &args(&["\"hello", "world\""])),
            Command::Echo {
                text: "hello world".to_string(),
                redirect: None,
            }
        );
    }

    #[test]
    fn test_parse_sudo_keeps_remainder() {
        assert_eq!(
            Command::parse_line("sudo rm -r /etc"),
            Some(Command::Sudo("rm -r /etc".to_string()))
        );
    }

    #[test]
    fn test_parse_su_defaults_to_root() {
        assert_eq!(Command::parse("su", &[]), Command::Su("root".to_string()));
        assert_eq!(
            Command::parse("su", &args(&["-", "bob"])),
            Command::Su("bob".to_string())
        );
    }

    #[test]
    fn test_parse_cp_ignores_recursive_flag() {
        assert_eq!(
            Command::parse("cp", &args(&["-r", "a", "b"])),
            Command::Cp {
                src: PathArg::new("a"),
                dst: PathArg::new("b"),
            }
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert!(matches!(Command::parse("LS", &[]), Command::Ls { .. }));
        assert!(matches!(Command::parse("CD", &args(&["/"])), Command::Cd(_)));
        assert_eq!(Command::parse("HELP", &[]), Command::Help);
        assert_eq!(Command::parse("CleAr", &[]), Command::Clear);
    }

    #[test]
    fn test_parse_aliases() {
        assert!(matches!(
            Command::parse("apt-get", &args(&["update"])),
            Command::Apt(_)
        ));
        assert_eq!(Command::parse("logout", &[]), Command::Exit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("foobar", &[]),
            Command::Unknown {
                name: "foobar".to_string(),
                help: false
            }
        );
        assert_eq!(
            Command::parse("vim", &args(&["--help"])),
            Command::Unknown {
                name: "vim".to_string(),
                help: true
            }
        );
    }

    #[test]
    fn test_parse_line_blank() {
        assert_eq!(Command::parse_line(""), None);
        assert_eq!(Command::parse_line("   "), None);
    }

    #[test]
    fn test_command_names() {
        let names = Command::names();
        assert!(names.contains(&"ls"));
        assert!(names.contains(&"sudo"));
        assert!(names.contains(&"history"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }
}
