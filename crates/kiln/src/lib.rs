//! Command registration and argument dispatch driven by declared signatures.
//!
//! A program describes each command as a [`CommandDescriptor`]: the ordered
//! parameter names, which of them carry defaults, optional short option
//! characters, and whether surplus arguments are collected into a variadic
//! tail or an open keyword bag. Descriptors and their handlers live in a
//! [`Registry`], which turns a raw argument vector into a call.
//!
//! Dispatch runs in three stages:
//!
//! 1. **Selection** picks the command named by the first argument, falls back
//!    to the default command, or resolves a help request.
//! 2. **Tokenizing** sorts the remaining arguments into named options and
//!    bare tokens in one pass, coercing option values to the type of the
//!    parameter's default.
//! 3. **Reconciliation** binds bare tokens to parameter slots, fills the
//!    variadic tail, and rejects missing, surplus, or unknown arguments.
//!
//! Help is an [`Outcome`], not an error. Structured help data is available
//! from [`Registry::top_help`] and [`Registry::command_help`] and renders to
//! text through [`render`].
//!
//! ```no_run
//! use kiln::{Arguments, CommandDescriptor, HandlerError, Outcome, Registry};
//!
//! fn greet(_: &mut (), args: &Arguments<'_>) -> Result<String, HandlerError> {
//!     let name = args.get_str("name").unwrap_or("world");
//!     Ok(format!("hello, {name}"))
//! }
//!
//! let mut registry = Registry::new();
//! let descriptor = CommandDescriptor::builder("greet").required("name").build()?;
//! registry.register(descriptor, greet)?;
//! let outcome = registry.run(&mut (), ["prog", "greet", "kiln"])?;
//! assert_eq!(outcome, Outcome::Applied(String::from("hello, kiln")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod arguments;
mod coerce;
mod descriptor;
mod dispatch;
pub mod docs;
mod errors;
mod help;
mod ini;
mod input;
mod reconcile;
mod registry;
pub mod render;
mod tokenizer;
mod value;

pub use arguments::Arguments;
pub use coerce::{CoercionError, coerce};
pub use descriptor::{CommandDescriptor, DescriptorBuilder, DescriptorError};
pub use dispatch::{HELP_COMMAND, HELP_FLAGS, Invocation, Outcome, Resolution};
pub use errors::{CommandError, ErrorKind, HandlerError, RunError};
pub use help::{ArgumentHelp, CommandHelp, CommandSummary, OptionHelp, TopHelp, UsageItem};
pub use ini::{IniError, default_config_path};
pub use input::{InputError, open_input};
pub use reconcile::{ParseResult, reconcile};
pub use registry::{Command, Handler, Registry, RegistryError};
pub use tokenizer::{
    BareToken, ClassifiedTokens, CoercionMode, END_OF_OPTIONS, STDIN_MARKER, tokenize,
};
pub use value::{ScalarKind, Value};

/// Tokenizes and reconciles `args` (command arguments only, no program or
/// command name) against `descriptor`.
///
/// # Errors
///
/// Returns the first [`CommandError`] raised by either stage.
pub fn parse<I, S>(
    descriptor: &CommandDescriptor,
    args: I,
    mode: CoercionMode,
) -> Result<ParseResult, CommandError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut queue = args.into_iter().map(Into::into).collect();
    let tokens = tokenize(descriptor, &mut queue, mode)?;
    reconcile(descriptor, tokens, mode)
}
