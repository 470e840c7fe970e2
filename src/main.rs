use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use vshell::Shell;
use vshell::config::DEFAULT_STATE_FILE;
use vshell::core::{FileStorage, MemoryStorage, Storage};
use vshell::models::{OutputLine, TextStyle};

/// Simulated Ubuntu shell with a persistent virtual filesystem.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding the persisted filesystem
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    env_logger::init();

    if args.ephemeral {
        log::info!("using in-memory storage");
        run(Shell::new(MemoryStorage::new()))
    } else {
        log::info!("using state file {}", args.state.display());
        run(Shell::new(FileStorage::new(args.state)))
    }
}

fn run<S: Storage>(mut shell: Shell<S>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in shell.welcome() {
        writeln!(stdout, "{}", render(&line))?;
    }

    let mut input = String::new();
    loop {
        write!(stdout, "{}", shell.prompt())?;
        stdout.flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        let result = shell.submit(input.trim_end_matches(['\n', '\r']));
        if result.clear {
            write!(stdout, "\x1b[2J\x1b[H")?;
        }
        for line in &result.output {
            writeln!(stdout, "{}", render(line))?;
        }
    }
}

/// ANSI colours for styled output lines.
fn render(line: &OutputLine) -> String {
    let color = match line {
        OutputLine::Error(_) => "31",
        OutputLine::Success(_) => "32",
        OutputLine::Info(_) => "33",
        OutputLine::ListEntry {
            style: TextStyle::Directory,
            ..
        } => "1;34",
        OutputLine::ListEntry {
            style: TextStyle::Hidden,
            ..
        } => "2",
        _ => return line.to_string(),
    };
    format!("\x1b[{}m{}\x1b[0m", color, line)
}
