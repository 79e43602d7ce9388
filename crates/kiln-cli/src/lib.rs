//! Command-line runner for the kiln demo commands.
//!
//! The runner splits leading configuration flags from the command line,
//! loads [`kiln_config::Config`], installs telemetry, and hands the rest of
//! the arguments to a [`kiln::Registry`]. Outcomes are mapped to output and
//! an exit status here so the binary stays a thin shim and tests can swap in
//! their own configuration and IO streams.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use kiln::render::{render_command_help, render_top_help};
use kiln::{CommandError, Outcome, RunError};
use kiln_config::Config;
use tracing::debug;

mod commands;
mod config;
mod errors;
pub mod telemetry;

use commands::{CommandRegistry, Output, Session};
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

const RUNNER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runner");
const FALLBACK_PROGRAM: &str = "kiln";

/// Bundles the IO streams provided to the runner.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        match self.try_run(args) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn try_run<I>(&mut self, args: I) -> Result<ExitCode, AppError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let program = program_name(&args);
        let argv = command_line(&program, &args, &split)?;
        let registry = commands::registry()?;
        debug!(target: RUNNER_TARGET, %program, arguments = argv.len() - 1, "dispatching");

        if config.preview() {
            return match registry.preview(argv) {
                Ok(shape) => {
                    writeln!(self.io.stdout, "{shape}")?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(error) => self.report_usage_error(&registry, &config, &program, &error),
            };
        }

        let mut session = Session::new(program.as_str(), &registry);
        match registry.run(&mut session, argv) {
            Ok(outcome) => self.emit_outcome(&registry, &program, outcome),
            Err(RunError::Command(error)) => {
                self.report_usage_error(&registry, &config, &program, &error)
            }
            Err(error @ RunError::Handler { .. }) => {
                writeln!(self.io.stderr, "{error}")?;
                Ok(ExitCode::FAILURE)
            }
        }
    }

    fn emit_outcome(
        &mut self,
        registry: &CommandRegistry,
        program: &str,
        outcome: Outcome<Output>,
    ) -> Result<ExitCode, AppError> {
        let text = match outcome {
            Outcome::TopHelp => Some(render_top_help(&registry.top_help(program))),
            Outcome::CommandHelp(name) => registry
                .command_help(program, &name)
                .map(|help| render_command_help(&help)),
            Outcome::Applied(output) => output,
        };
        if let Some(text) = text {
            writeln!(self.io.stdout, "{}", text.trim_end())?;
        }
        self.io.stdout.flush()?;
        Ok(ExitCode::SUCCESS)
    }

    fn report_usage_error(
        &mut self,
        registry: &CommandRegistry,
        config: &Config,
        program: &str,
        error: &CommandError,
    ) -> Result<ExitCode, AppError> {
        debug!(target: RUNNER_TARGET, kind = ?error.kind(), "usage error");
        writeln!(self.io.stderr, "{program}: {error}")?;
        if config.help_on_error() {
            let help = error
                .command()
                .and_then(|name| registry.command_help(program, name))
                .map_or_else(
                    || render_top_help(&registry.top_help(program)),
                    |help| render_command_help(&help),
                );
            writeln!(self.io.stderr)?;
            writeln!(self.io.stderr, "{}", help.trim_end())?;
        }
        Ok(config
            .error_exit_code()
            .map_or(ExitCode::SUCCESS, ExitCode::from))
    }
}

/// Runs the command line in `args` (program name first) against the demo
/// commands, writing results to `stdout` and diagnostics to `stderr`.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn program_name(args: &[OsString]) -> String {
    args.first()
        .and_then(|first| Path::new(first).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or(FALLBACK_PROGRAM)
        .to_owned()
}

/// Program name followed by the command tokens as UTF-8 strings.
fn command_line(
    program: &str,
    args: &[OsString],
    split: &ConfigArgumentSplit,
) -> Result<Vec<String>, AppError> {
    let mut argv = vec![program.to_owned()];
    for argument in args.iter().skip(split.command_start.max(1)) {
        let text = argument
            .to_str()
            .ok_or_else(|| AppError::NonUnicodeArgument(argument.clone()))?;
        argv.push(text.to_owned());
    }
    Ok(argv)
}
