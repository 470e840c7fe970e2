//! Canned output for the informational commands.
//!
//! Nothing here inspects a real system. Values mimic a small Ubuntu
//! server; `ps` and `top` take their PIDs from the caller's RNG.

use rand::Rng;

use crate::config::{DISTRO_CODENAME, HOSTNAME, KERNEL_RELEASE, PID_RANGE};
use crate::models::OutputLine;
use crate::utils::format::format_clock;

// =============================================================================
// apt
// =============================================================================

const APT_LOCK_ERRORS: [&str; 2] = [
    "E: Could not open lock file /var/lib/dpkg/lock-frontend - open (13: Permission denied)",
    "E: Unable to acquire the dpkg frontend lock (/var/lib/dpkg/lock-frontend), are you root?",
];

const APT_READING: [&str; 3] = [
    "Reading package lists... Done",
    "Building dependency tree... Done",
    "Reading state information... Done",
];

/// Simulated package manager transcript.
///
/// Every operation needs root; other users get the dpkg lock error.
pub fn apt(args: &[String], is_root: bool) -> Vec<OutputLine> {
    let Some(op) = args.first() else {
        return [
            "apt 2.4.11 (amd64)",
            "Usage: apt [options] command",
            "",
            "Most used commands:",
            "  update - update list of available packages",
            "  upgrade - upgrade the system by installing/upgrading packages",
            "  install - install packages",
        ]
        .into_iter()
        .map(OutputLine::text)
        .collect();
    };

    let op = op.to_lowercase();
    if !matches!(op.as_str(), "update" | "upgrade" | "install") {
        return vec![OutputLine::error(format!("E: Invalid operation {}", op))];
    }
    if !is_root {
        return APT_LOCK_ERRORS.into_iter().map(OutputLine::error).collect();
    }

    match op.as_str() {
        "update" => apt_update(),
        "upgrade" => {
            let mut lines: Vec<OutputLine> =
                APT_READING.into_iter().map(OutputLine::text).collect();
            lines.push(OutputLine::text("Calculating upgrade... Done"));
            lines.push(OutputLine::text(
                "0 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.",
            ));
            lines
        }
        _ => apt_install(&args[1..]),
    }
}

fn apt_update() -> Vec<OutputLine> {
    let mut lines = vec![
        OutputLine::text(format!(
            "Hit:1 http://archive.ubuntu.com/ubuntu {} InRelease",
            DISTRO_CODENAME
        )),
        OutputLine::text(format!(
            "Get:2 http://archive.ubuntu.com/ubuntu {}-updates InRelease [119 kB]",
            DISTRO_CODENAME
        )),
        OutputLine::text(format!(
            "Get:3 http://security.ubuntu.com/ubuntu {}-security InRelease [110 kB]",
            DISTRO_CODENAME
        )),
        OutputLine::text("Fetched 229 kB in 1s (229 kB/s)"),
    ];
    lines.extend(APT_READING.into_iter().map(OutputLine::text));
    lines.push(OutputLine::success("All packages are up to date."));
    lines
}

fn apt_install(packages: &[String]) -> Vec<OutputLine> {
    let packages: Vec<&String> = packages.iter().filter(|p| !p.starts_with('-')).collect();
    if packages.is_empty() {
        return vec![OutputLine::error(
            "E: No packages specified for installation",
        )];
    }

    let mut lines: Vec<OutputLine> = APT_READING.into_iter().map(OutputLine::text).collect();
    lines.push(OutputLine::text(
        "The following NEW packages will be installed:",
    ));
    lines.push(OutputLine::text(format!(
        "  {}",
        packages
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    )));
    lines.push(OutputLine::text(format!(
        "0 upgraded, {} newly installed, 0 to remove and 0 not upgraded.",
        packages.len()
    )));
    for package in &packages {
        lines.push(OutputLine::text(format!(
            "Unpacking {} ({}) ...",
            package, DISTRO_CODENAME
        )));
        lines.push(OutputLine::success(format!("Setting up {} ...", package)));
    }
    lines
}

// =============================================================================
// uname / df / ps / top
// =============================================================================

pub fn uname(all: bool) -> Vec<OutputLine> {
    if all {
        vec![OutputLine::text(format!(
            "Linux {} {} #101-Ubuntu SMP Tue Nov 14 13:30:08 UTC 2023 x86_64 x86_64 x86_64 GNU/Linux",
            HOSTNAME, KERNEL_RELEASE
        ))]
    } else {
        vec![OutputLine::text("Linux")]
    }
}

pub fn df() -> Vec<OutputLine> {
    [
        "Filesystem     1K-blocks    Used Available Use% Mounted on",
        "tmpfs             814376    1364    813012   1% /run",
        "/dev/sda1      102626232 8542316  88824652   9% /",
        "tmpfs            4071864       0   4071864   0% /dev/shm",
        "tmpfs               5120       0      5120   0% /run/lock",
    ]
    .into_iter()
    .map(OutputLine::text)
    .collect()
}

pub fn ps(rng: &mut impl Rng) -> Vec<OutputLine> {
    let shell_pid = rng.gen_range(PID_RANGE);
    let ps_pid = shell_pid + rng.gen_range(1..64);
    vec![
        OutputLine::text("    PID TTY          TIME CMD"),
        OutputLine::text(format!("{:>7} pts/0    00:00:00 bash", shell_pid)),
        OutputLine::text(format!("{:>7} pts/0    00:00:00 ps", ps_pid)),
    ]
}

pub fn top(rng: &mut impl Rng, user: &str, now: u64) -> Vec<OutputLine> {
    let pid = rng.gen_range(PID_RANGE);
    vec![
        OutputLine::text(format!(
            "top - {} up 3 days,  4:12,  1 user,  load average: 0.08, 0.03, 0.01",
            format_clock(now)
        )),
        OutputLine::text(
            "Tasks:  98 total,   1 running,  97 sleeping,   0 stopped,   0 zombie",
        ),
        OutputLine::text(
            "%Cpu(s):  1.3 us,  0.7 sy,  0.0 ni, 97.9 id,  0.1 wa,  0.0 hi,  0.0 si,  0.0 st",
        ),
        OutputLine::text(
            "MiB Mem :   7953.0 total,   5231.4 free,    912.6 used,   1809.0 buff/cache",
        ),
        OutputLine::text(
            "MiB Swap:   2048.0 total,   2048.0 free,      0.0 used.   6748.2 avail Mem",
        ),
        OutputLine::empty(),
        OutputLine::text(
            "    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND",
        ),
        OutputLine::text(format!(
            "{:>7} {:<8}  20   0   10036   5120   3456 R   0.3   0.1   0:00.01 top",
            pid, user
        )),
        OutputLine::text(
            "      1 root      20   0  167404  11780   8304 S   0.0   0.1   0:02.13 systemd",
        ),
    ]
}

// =============================================================================
// man
// =============================================================================

/// (name, summary, synopsis, description)
const MAN_PAGES: &[(&str, &str, &str, &str)] = &[
    (
        "cat",
        "concatenate files and print on the standard output",
        "cat FILE...",
        "Print the content of each FILE.",
    ),
    (
        "cd",
        "change the working directory",
        "cd [DIR]",
        "Change the current directory to DIR. The default DIR is the home directory.",
    ),
    (
        "chmod",
        "change file mode bits",
        "chmod MODE FILE",
        "Store MODE as the permission string of FILE.",
    ),
    (
        "grep",
        "print lines that match patterns",
        "grep PATTERN FILE",
        "Print every line of FILE containing PATTERN as a literal substring.",
    ),
    (
        "ls",
        "list directory contents",
        "ls [-a] [-l] [FILE]",
        "List information about FILE (the current directory by default). \
         -a includes entries starting with '.', -l uses a long listing format.",
    ),
    (
        "man",
        "an interface to the system reference manuals",
        "man PAGE",
        "Display the manual page for PAGE.",
    ),
    (
        "mkdir",
        "make directories",
        "mkdir [-p] DIRECTORY...",
        "Create the DIRECTORY(ies). -p makes parent directories as needed.",
    ),
    (
        "rm",
        "remove files or directories",
        "rm [-r] [-f] FILE...",
        "Remove each FILE. -r removes directories and their contents, \
         -f ignores nonexistent files.",
    ),
    (
        "sudo",
        "execute a command as the superuser",
        "sudo COMMAND",
        "Ask for the root password, then run COMMAND as root.",
    ),
    (
        "su",
        "run a shell with substitute user ID",
        "su [USER]",
        "Switch to USER (root by default) after asking for their password.",
    ),
];

/// Manual page for `name`, or `None` if there is no entry.
pub fn man_page(name: &str) -> Option<Vec<OutputLine>> {
    let (name, summary, synopsis, description) =
        MAN_PAGES.iter().find(|(page, ..)| *page == name)?;
    let title = format!("{}(1)", name.to_uppercase());
    Some(vec![
        OutputLine::info(format!("{:<24}User Commands{:>24}", title, title)),
        OutputLine::empty(),
        OutputLine::text("NAME"),
        OutputLine::text(format!("       {} - {}", name, summary)),
        OutputLine::empty(),
        OutputLine::text("SYNOPSIS"),
        OutputLine::text(format!("       {}", synopsis)),
        OutputLine::empty(),
        OutputLine::text("DESCRIPTION"),
        OutputLine::text(format!("       {}", description)),
    ])
}
