//! CLI entrypoint for the kiln demo commands.
//!
//! The binary delegates to [`kiln_cli::run`], which loads configuration and
//! dispatches the command line.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    kiln_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
