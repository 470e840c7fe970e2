//! Command execution logic.
//!
//! Contains the `execute_command` function that runs parsed commands
//! against the loaded store and returns results. Every failure becomes an
//! error line; nothing is returned as an `Err`.

use crate::config::{HELP_TEXT, ROOT_USER};
use crate::core::error::FsError;
use crate::core::history::CommandHistory;
use crate::core::path;
use crate::core::store::Store;
use crate::models::{DirEntry, FsNode, InputMode, NodeKind, OutputLine};
use crate::utils::format::{format_date_long, format_date_short};

use super::{Command, CommandResult, PathArg, Redirect, RedirectMode, system};

/// Everything a command may read or mutate.
pub struct CommandContext<'a> {
    /// Loaded store; saved by the caller afterwards
    pub store: &'a mut Store,
    /// Absolute working directory
    pub current_path: &'a str,
    pub history: &'a CommandHistory,
    /// Timestamp applied to created and modified nodes
    pub now: u64,
}

impl CommandContext<'_> {
    fn resolve(&self, arg: &PathArg) -> String {
        self.store.resolve(arg.as_str(), self.current_path)
    }
}

/// Execute a parsed command.
///
/// Navigation, mode changes and user switches are returned in the result,
/// not applied here.
pub fn execute_command(cmd: Command, ctx: &mut CommandContext) -> CommandResult {
    log::debug!("executing {:?} as {}", cmd, ctx.store.current_user);

    match cmd {
        Command::Pwd => CommandResult::output(vec![OutputLine::text(ctx.current_path)]),
        Command::Cd(path) => execute_cd(&path, ctx),
        Command::Ls { path, all, long } => execute_ls(path, all, long, ctx),
        Command::Mkdir { paths, parents } => execute_mkdir(&paths, parents, ctx),
        Command::Touch(paths) => execute_touch(&paths, ctx),
        Command::Cat(paths) => execute_cat(&paths, ctx),
        Command::Echo { text, redirect } => execute_echo(text, redirect, ctx),
        Command::Rm {
            paths,
            recursive,
            force,
        } => execute_rm(&paths, recursive, force, ctx),
        Command::Clear => CommandResult::clear_screen(),
        Command::Whoami => {
            CommandResult::output(vec![OutputLine::text(ctx.store.current_user.clone())])
        }
        Command::Sudo(command) => {
            CommandResult::empty().with_mode(InputMode::AwaitingSudoPassword { command })
        }
        Command::Su(user) => execute_su(user, ctx),
        Command::AddUser { name, password } => execute_adduser(name, password, ctx),
        Command::Passwd { user, password } => execute_passwd(user, password, ctx),
        Command::Apt(args) => CommandResult::output(system::apt(&args, ctx.store.is_root())),
        Command::Grep { pattern, file } => execute_grep(&pattern, &file, ctx),
        Command::Date => CommandResult::output(vec![OutputLine::text(format_date_long(ctx.now))]),
        Command::Uname { all } => CommandResult::output(system::uname(all)),
        Command::Df => CommandResult::output(system::df()),
        Command::Ps => CommandResult::output(system::ps(&mut rand::thread_rng())),
        Command::Top => CommandResult::output(system::top(
            &mut rand::thread_rng(),
            &ctx.store.current_user,
            ctx.now,
        )),
        Command::Cp { src, dst } => execute_cp(&src, &dst, ctx),
        Command::Mv { src, dst } => execute_mv(&src, &dst, ctx),
        Command::Chmod { mode, path } => execute_chmod(&mode, &path, ctx),
        Command::Man(page) => execute_man(page),
        Command::Help => CommandResult::output(HELP_TEXT.lines().map(OutputLine::text).collect()),
        Command::History => execute_history(ctx.history),
        Command::Exit => CommandResult::output(vec![OutputLine::info("logout")]),
        Command::Invalid(message) => CommandResult::error(message),
        Command::Unknown { name, help: true } => unknown_help(&name),
        Command::Unknown { name, help: false } => {
            CommandResult::error(format!("{}: command not found", name))
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

fn execute_cd(arg: &PathArg, ctx: &CommandContext) -> CommandResult {
    let target = ctx.resolve(arg);
    match ctx.store.root.get_node(&target) {
        Some(node) if node.is_directory() => CommandResult::navigate(path::normalize(&target)),
        Some(_) => CommandResult::error(format!("cd: {}: Not a directory", arg)),
        None => CommandResult::error(format!("cd: {}: No such file or directory", arg)),
    }
}

fn execute_ls(arg: Option<PathArg>, all: bool, long: bool, ctx: &CommandContext) -> CommandResult {
    let arg = arg.unwrap_or_else(|| PathArg::new("."));
    let target = ctx.resolve(&arg);

    let Some(node) = ctx.store.root.get_node(&target) else {
        return CommandResult::error(format!(
            "ls: cannot access '{}': No such file or directory",
            arg
        ));
    };

    if !node.is_directory() {
        let line = if long {
            OutputLine::text(long_entry(&lone_entry(arg.as_str(), node)))
        } else {
            OutputLine::file_entry(arg.as_str())
        };
        return CommandResult::output(vec![line]);
    }

    let entries = ctx.store.root.list_dir(&target).unwrap_or_default();
    let output = entries
        .iter()
        .filter(|entry| all || !entry.is_hidden())
        .map(|entry| {
            if long {
                OutputLine::text(long_entry(entry))
            } else if entry.is_dir {
                OutputLine::dir_entry(&entry.name)
            } else {
                OutputLine::file_entry(&entry.name)
            }
        })
        .collect();
    CommandResult::output(output)
}

fn lone_entry(name: &str, node: &FsNode) -> DirEntry {
    DirEntry {
        name: name.to_string(),
        is_dir: node.is_directory(),
        size: node.display_size(),
        meta: node.meta().clone(),
    }
}

/// `drwxr-xr-x 1 ubuntu ubuntu   4096 Jan  5 12:34 docs/`
fn long_entry(entry: &DirEntry) -> String {
    let suffix = if entry.is_dir { "/" } else { "" };
    format!(
        "{} 1 {:<8} {:<8} {:>6} {} {}{}",
        entry.mode_string(),
        entry.meta.owner,
        entry.meta.owner,
        entry.size,
        format_date_short(entry.meta.modified),
        entry.name,
        suffix
    )
}

// =============================================================================
// File Operations
// =============================================================================

fn execute_mkdir(paths: &[PathArg], parents: bool, ctx: &mut CommandContext) -> CommandResult {
    let mut output = Vec::new();
    for arg in paths {
        let target = ctx.resolve(arg);
        let owner = ctx.store.current_user.clone();
        let created = if parents {
            ctx.store.root.create_dir_all(&target, &owner, ctx.now)
        } else {
            ctx.store
                .root
                .create_node(&target, NodeKind::Directory, "", &owner, ctx.now)
        };
        if let Err(e) = created {
            output.push(OutputLine::error(format!(
                "mkdir: cannot create directory '{}': {}",
                arg, e
            )));
        }
    }
    CommandResult::output(output)
}

fn execute_touch(paths: &[PathArg], ctx: &mut CommandContext) -> CommandResult {
    let mut output = Vec::new();
    for arg in paths {
        let target = ctx.resolve(arg);
        let owner = ctx.store.current_user.clone();
        if let Err(e) = ctx.store.root.touch(&target, &owner, ctx.now) {
            output.push(OutputLine::error(format!(
                "touch: cannot touch '{}': {}",
                arg, e
            )));
        }
    }
    CommandResult::output(output)
}

fn execute_cat(paths: &[PathArg], ctx: &CommandContext) -> CommandResult {
    let mut output = Vec::new();
    for arg in paths {
        match ctx.store.root.get_node(&ctx.resolve(arg)) {
            Some(FsNode::File { content, .. }) => {
                output.extend(content.lines().map(OutputLine::text));
            }
            Some(FsNode::Directory { .. }) => {
                output.push(OutputLine::error(format!("cat: {}: Is a directory", arg)));
            }
            None => output.push(OutputLine::error(format!(
                "cat: {}: No such file or directory",
                arg
            ))),
        }
    }
    CommandResult::output(output)
}

fn execute_echo(
    text: String,
    redirect: Option<Redirect>,
    ctx: &mut CommandContext,
) -> CommandResult {
    let Some(Redirect { mode, target }) = redirect else {
        return CommandResult::output(vec![OutputLine::text(text)]);
    };

    let resolved = ctx.resolve(&target);
    let owner = ctx.store.current_user.clone();
    let now = ctx.now;
    let root = &mut ctx.store.root;
    let written = match mode {
        RedirectMode::Overwrite => root.write_file(&resolved, &text, &owner, now),
        RedirectMode::Append => root.append_file(&resolved, &text, &owner, now),
    };

    match written {
        Ok(()) => CommandResult::empty(),
        Err(e) => CommandResult::error(format!("echo: {}: {}", target, e)),
    }
}

fn execute_rm(
    paths: &[PathArg],
    recursive: bool,
    force: bool,
    ctx: &mut CommandContext,
) -> CommandResult {
    let mut output = Vec::new();
    for arg in paths {
        let target = ctx.resolve(arg);
        if path::normalize(&target) == "/" {
            output.push(OutputLine::error(
                "rm: it is dangerous to operate recursively on '/'",
            ));
            continue;
        }

        let error = match ctx.store.root.get_node(&target) {
            None if force => continue,
            None => Some(FsError::NotFound),
            Some(node) if node.is_directory() && !recursive => Some(FsError::IsADirectory),
            Some(_) => ctx.store.root.delete_node(&target).err(),
        };
        if let Some(e) = error {
            output.push(OutputLine::error(format!(
                "rm: cannot remove '{}': {}",
                arg, e
            )));
        }
    }
    CommandResult::output(output)
}

fn execute_grep(pattern: &str, file: &PathArg, ctx: &CommandContext) -> CommandResult {
    match ctx.store.root.get_node(&ctx.resolve(file)) {
        Some(FsNode::File { content, .. }) => CommandResult::output(
            content
                .lines()
                .filter(|line| line.contains(pattern))
                .map(OutputLine::text)
                .collect(),
        ),
        Some(FsNode::Directory { .. }) => {
            CommandResult::error(format!("grep: {}: Is a directory", file))
        }
        None => CommandResult::error(format!("grep: {}: No such file or directory", file)),
    }
}

fn execute_cp(src: &PathArg, dst: &PathArg, ctx: &mut CommandContext) -> CommandResult {
    let source = ctx.resolve(src);
    if ctx.store.root.get_node(&source).is_none() {
        return CommandResult::error(format!(
            "cp: cannot stat '{}': No such file or directory",
            src
        ));
    }

    let target = ctx.resolve(dst);
    match ctx.store.root.copy_node(&source, &target, ctx.now) {
        Ok(_) => CommandResult::empty(),
        Err(FsError::SameFile) => {
            CommandResult::error(format!("cp: '{}' and '{}' are the same file", src, dst))
        }
        Err(FsError::IntoItself) => CommandResult::error(format!(
            "cp: cannot copy a directory, '{}', into itself, '{}'",
            src, dst
        )),
        Err(FsError::NotADirectory) if overwrites_file(ctx, &target) => {
            CommandResult::error(format!(
                "cp: cannot overwrite non-directory '{}' with directory '{}'",
                dst, src
            ))
        }
        Err(e) => CommandResult::error(format!("cp: cannot create '{}': {}", dst, e)),
    }
}

fn overwrites_file(ctx: &CommandContext, target: &str) -> bool {
    ctx.store.root.get_node(target).is_some_and(|n| !n.is_directory())
}

fn execute_mv(src: &PathArg, dst: &PathArg, ctx: &mut CommandContext) -> CommandResult {
    let source = ctx.resolve(src);
    if ctx.store.root.get_node(&source).is_none() {
        return CommandResult::error(format!(
            "mv: cannot stat '{}': No such file or directory",
            src
        ));
    }

    let target = ctx.resolve(dst);
    match ctx.store.root.move_node(&source, &target, ctx.now) {
        Ok(_) => CommandResult::empty(),
        Err(FsError::SameFile) => {
            CommandResult::error(format!("mv: '{}' and '{}' are the same file", src, dst))
        }
        Err(FsError::IntoItself) => CommandResult::error(format!(
            "mv: cannot move '{}' to a subdirectory of itself, '{}'",
            src, dst
        )),
        Err(e) => CommandResult::error(format!("mv: cannot move '{}' to '{}': {}", src, dst, e)),
    }
}

fn execute_chmod(mode: &str, arg: &PathArg, ctx: &mut CommandContext) -> CommandResult {
    let target = ctx.resolve(arg);
    match ctx.store.root.change_permissions(&target, mode) {
        Ok(()) => CommandResult::empty(),
        Err(FsError::NotFound) => CommandResult::error(format!(
            "chmod: cannot access '{}': No such file or directory",
            arg
        )),
        Err(e) => CommandResult::error(format!("chmod: {}", e)),
    }
}

// =============================================================================
// Users
// =============================================================================

fn execute_su(user: String, ctx: &CommandContext) -> CommandResult {
    if !ctx.store.users.contains_key(&user) {
        return CommandResult::error(format!("su: user {} does not exist", user));
    }
    if user == ctx.store.current_user {
        // applied after a sudo elevation ends, so `sudo su` stays root
        return CommandResult::empty().with_switch_user(user);
    }
    if ctx.store.is_root() {
        return CommandResult::navigate(ctx.store.home_dir_of(&user)).with_switch_user(user);
    }
    CommandResult::empty().with_mode(InputMode::AwaitingLoginPassword { user })
}

fn execute_adduser(
    name: Option<String>,
    password: Option<String>,
    ctx: &mut CommandContext,
) -> CommandResult {
    if !ctx.store.is_root() {
        return CommandResult::error("adduser: Only root may add a user or group to the system.");
    }
    let Some(name) = name else {
        return CommandResult::error("adduser: usage: adduser <username> [password]");
    };

    let password = password.unwrap_or_else(|| name.clone());
    match ctx.store.add_user(&name, &password, false, ctx.now) {
        Ok(()) => CommandResult::output(vec![
            OutputLine::text(format!("Adding user `{}' ...", name)),
            OutputLine::text(format!(
                "Creating home directory `{}' ...",
                ctx.store.home_dir_of(&name)
            )),
            OutputLine::success("Done."),
        ]),
        Err(e) => CommandResult::error(format!("adduser: {}", e)),
    }
}

fn execute_passwd(
    user: Option<String>,
    password: Option<String>,
    ctx: &mut CommandContext,
) -> CommandResult {
    let Some(user) = user else {
        return CommandResult::error("passwd: usage: passwd <user> [new password]");
    };
    if !ctx.store.users.contains_key(&user) {
        return CommandResult::error(format!("passwd: user '{}' does not exist", user));
    }
    if ctx.store.current_user != ROOT_USER && ctx.store.current_user != user {
        return CommandResult::error(format!(
            "passwd: You may not view or modify password information for {}.",
            user
        ));
    }
    let Some(password) = password else {
        return CommandResult::output(vec![
            OutputLine::error("passwd: Authentication token manipulation error"),
            OutputLine::error("passwd: password unchanged"),
        ]);
    };

    match ctx.store.set_password(&user, &password) {
        Ok(()) => {
            log::info!("password changed for {}", user);
            CommandResult::output(vec![OutputLine::success(
                "passwd: password updated successfully",
            )])
        }
        Err(e) => CommandResult::error(format!("passwd: {}", e)),
    }
}

// =============================================================================
// Informational
// =============================================================================

fn execute_history(history: &CommandHistory) -> CommandResult {
    let lines = history
        .iter()
        .enumerate()
        .map(|(i, line)| OutputLine::text(format!("{:>5}  {}", i + 1, line)))
        .collect();
    CommandResult::output(lines)
}

fn unknown_help(name: &str) -> CommandResult {
    CommandResult::output(vec![OutputLine::text(format!(
        "{}: no help available. Type 'help' to see the list of available commands.",
        name
    ))])
}

fn execute_man(page: Option<String>) -> CommandResult {
    let Some(page) = page else {
        return CommandResult::output(vec![
            OutputLine::text("What manual page do you want?"),
            OutputLine::text("For example, try 'man man'."),
        ]);
    };
    match system::man_page(&page.to_lowercase()) {
        Some(lines) => CommandResult::output(lines),
        None => CommandResult::error(format!("No manual entry for {}", page)),
    }
}

// =============================================================================
// Tests
// =============================================================================
