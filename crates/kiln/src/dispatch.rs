//! Command selection and invocation.
//!
//! The dispatcher strips the program name, consumes any global options,
//! decides between help and a command, then drives the tokenizer and
//! reconciler for the selected command. Help is an outcome, not an error.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::arguments::Arguments;
use crate::descriptor::CommandDescriptor;
use crate::errors::{CommandError, RunError};
use crate::reconcile::{ParseResult, reconcile};
use crate::registry::Registry;
use crate::tokenizer::{CoercionMode, tokenize, tokenize_leading_options};
use crate::value::Value;

/// Tracing target for command selection.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Tokens requesting help.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];
/// Word requesting help, optionally followed by a command name.
pub const HELP_COMMAND: &str = "help";

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Overall help was requested.
    TopHelp,
    /// Help for the named command was requested.
    CommandHelp(String),
    /// The handler ran and returned this value.
    Applied(T),
}

/// A selected command with its reconciled arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<'r> {
    pub command: &'r CommandDescriptor,
    pub result: ParseResult,
    /// Global option values with defaults applied.
    pub globals: BTreeMap<String, Value>,
}

impl<'r> Invocation<'r> {
    pub fn arguments(&self) -> Arguments<'_> {
        Arguments::new(self.command, &self.result, &self.globals)
    }

    /// Renders the call as `name(positional, key=value)`.
    pub fn call_shape(&self) -> String {
        let positional = self.result.positional.iter().map(Value::to_literal);
        let keywords = self
            .result
            .keywords
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_literal()));
        let parts: Vec<String> = positional.chain(keywords).collect();
        format!("{}({})", self.command.name(), parts.join(", "))
    }
}

/// What the dispatcher resolved the command line to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'r> {
    TopHelp,
    CommandHelp(&'r CommandDescriptor),
    Call(Invocation<'r>),
}

impl<C, T> Registry<C, T> {
    /// Resolves `argv` (program name first) without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when no command can be selected or its
    /// arguments do not fit.
    pub fn resolve<I, S>(&self, argv: I, mode: CoercionMode) -> Result<Resolution<'_>, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: VecDeque<String> = argv.into_iter().skip(1).map(Into::into).collect();
        let globals = self.parse_globals(&mut queue, mode)?;

        let Some(first) = queue.front() else {
            return Ok(match self.default_command() {
                Some(command) => {
                    debug!(
                        target: DISPATCH_TARGET,
                        command = command.name(),
                        "no arguments, running default"
                    );
                    Resolution::Call(self.invoke(command, queue, globals, mode)?)
                }
                None => Resolution::TopHelp,
            });
        };

        if HELP_FLAGS.contains(&first.as_str()) {
            return Ok(Resolution::TopHelp);
        }

        if first == HELP_COMMAND {
            let target = queue.get(1).and_then(|name| self.command(name));
            debug!(
                target: DISPATCH_TARGET,
                command = target.map(CommandDescriptor::name),
                "help requested"
            );
            return Ok(target.map_or(Resolution::TopHelp, Resolution::CommandHelp));
        }

        if let Some(command) = self.command(first) {
            queue.pop_front();
            if queue
                .front()
                .is_some_and(|next| HELP_FLAGS.contains(&next.as_str()))
            {
                return Ok(Resolution::CommandHelp(command));
            }
            debug!(target: DISPATCH_TARGET, command = command.name(), "selected command");
            return Ok(Resolution::Call(self.invoke(command, queue, globals, mode)?));
        }

        match self.default_command() {
            Some(command) => {
                debug!(
                    target: DISPATCH_TARGET,
                    command = command.name(),
                    "falling back to default"
                );
                Ok(Resolution::Call(self.invoke(command, queue, globals, mode)?))
            }
            None => Err(CommandError::NoCommandSpecified),
        }
    }

    /// Resolves `argv` and runs the selected handler with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Command`] for selection and parsing failures and
    /// [`RunError::Handler`] when the handler fails.
    pub fn run<I, S>(&self, context: &mut C, argv: I) -> Result<Outcome<T>, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = match self.resolve(argv, CoercionMode::Strict)? {
            Resolution::TopHelp => return Ok(Outcome::TopHelp),
            Resolution::CommandHelp(command) => {
                return Ok(Outcome::CommandHelp(command.name().to_owned()));
            }
            Resolution::Call(invocation) => invocation,
        };

        let name = invocation.command.name();
        let Some(entry) = self.entry(name) else {
            return Err(CommandError::NoCommandSpecified.into());
        };
        entry
            .call(context, &invocation.arguments())
            .map(Outcome::Applied)
            .map_err(|source| RunError::Handler {
                command: name.to_owned(),
                source,
            })
    }

    /// Describes what `argv` would run without running it.
    ///
    /// Coercion failures are ignored so the raw text shows in the call.
    ///
    /// # Errors
    ///
    /// Returns every [`CommandError`] other than coercion failures.
    pub fn preview<I, S>(&self, argv: I) -> Result<String, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(match self.resolve(argv, CoercionMode::Lenient)? {
            Resolution::TopHelp => String::from("(top-level help)"),
            Resolution::CommandHelp(command) => format!("(help for {} command)", command.name()),
            Resolution::Call(invocation) => invocation.call_shape(),
        })
    }

    fn parse_globals(
        &self,
        queue: &mut VecDeque<String>,
        mode: CoercionMode,
    ) -> Result<BTreeMap<String, Value>, CommandError> {
        let Some(global) = self.global() else {
            return Ok(BTreeMap::new());
        };
        let stop_tokens = [HELP_FLAGS[0], HELP_FLAGS[1], HELP_COMMAND];
        let tokens = tokenize_leading_options(global, queue, mode, &stop_tokens)?;
        let mut result = reconcile(global, tokens, mode)?;

        let resolved: BTreeMap<String, Value> = global
            .keywords()
            .map(|(name, default)| {
                let value = result.keywords.remove(name).unwrap_or_else(|| default.clone());
                (name.to_owned(), value)
            })
            .collect();
        debug!(target: DISPATCH_TARGET, remaining = queue.len(), "parsed global options");
        Ok(resolved)
    }

    fn invoke<'r>(
        &'r self,
        command: &'r CommandDescriptor,
        mut queue: VecDeque<String>,
        globals: BTreeMap<String, Value>,
        mode: CoercionMode,
    ) -> Result<Invocation<'r>, CommandError> {
        let tokens = tokenize(command, &mut queue, mode)?;
        let result = reconcile(command, tokens, mode)?;
        Ok(Invocation {
            command,
            result,
            globals,
        })
    }
}
