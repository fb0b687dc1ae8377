use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use interleave::cli::Cli;
use interleave::config::{Config, Settings};
use interleave::{InterleaveError, StreamRegistry, merge_streams};

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior so `interleave ... | head` exits
    // quietly instead of reporting a BrokenPipe error.
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("interleave: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), InterleaveError> {
    let config = Config::from_cli(cli)?;
    debug!(?config, "resolved configuration");
    let settings = Settings::from_config(&config)?;
    let registry = StreamRegistry::open_files(&cli.files, settings)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    for block in merge_streams(registry) {
        for line in block?.lines {
            if let Err(e) = writeln!(writer, "{line}") {
                return ignore_broken_pipe(e);
            }
        }
    }

    if let Err(e) = writer.flush() {
        return ignore_broken_pipe(e);
    }
    Ok(())
}

/// A closed stdout just means the reader has seen enough.
fn ignore_broken_pipe(e: io::Error) -> Result<(), InterleaveError> {
    if e.kind() == io::ErrorKind::BrokenPipe {
        Ok(())
    } else {
        Err(e.into())
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
/// `--verbose` lowers the default to `debug` for this crate.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,interleave=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Reset SIGPIPE to the default (terminate) behavior.
///
/// By default, Rust ignores SIGPIPE to surface `BrokenPipe` I/O errors.
/// Restoring `SIG_DFL` lets the OS end the process when the downstream
/// reader goes away.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
