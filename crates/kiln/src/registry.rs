//! Command registration.
//!
//! A [`Registry`] owns every command descriptor together with its handler.
//! Registration checks the registry-wide invariants eagerly; once built the
//! registry is only read.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::arguments::Arguments;
use crate::descriptor::{CommandDescriptor, DescriptorError};
use crate::dispatch::{DISPATCH_TARGET, HELP_COMMAND};
use crate::errors::HandlerError;

/// Errors raised while registering commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two commands share a name.
    #[error("command '{name}' is already registered")]
    DuplicateCommand { name: String },

    /// A second default command was registered.
    #[error("cannot make '{name}' the default command: '{existing}' already is")]
    DuplicateDefault { existing: String, name: String },

    /// The name is reserved by the dispatcher.
    #[error("'{name}' is reserved and cannot name a command")]
    ReservedName { name: String },

    /// Global options and a default command cannot coexist.
    #[error("global options cannot be combined with a default command")]
    GlobalWithDefault,

    /// Global options were registered twice.
    #[error("global options are already registered")]
    DuplicateGlobal,

    /// The global descriptor has a required parameter or a tail.
    #[error("global options must all be keyword options: '{name}' is not")]
    GlobalNotKeywordOnly { name: String },

    /// A descriptor failed validation.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Command logic invoked with the caller's context and the parsed arguments.
pub type Handler<C, T> =
    Box<dyn Fn(&mut C, &Arguments<'_>) -> Result<T, HandlerError> + Send + Sync>;

/// A registered command.
pub struct Command<C, T> {
    descriptor: CommandDescriptor,
    handler: Handler<C, T>,
}

impl<C, T> Command<C, T> {
    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    pub(crate) fn call(
        &self,
        context: &mut C,
        arguments: &Arguments<'_>,
    ) -> Result<T, HandlerError> {
        (self.handler)(context, arguments)
    }
}

impl<C, T> fmt::Debug for Command<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Set of commands addressable by name.
///
/// `C` is the context passed mutably to every handler and `T` is the value a
/// successful handler returns.
pub struct Registry<C, T> {
    commands: Vec<Command<C, T>>,
    index: BTreeMap<String, usize>,
    default: Option<usize>,
    global: Option<CommandDescriptor>,
}

impl<C, T> Default for Registry<C, T> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            index: BTreeMap::new(),
            default: None,
            global: None,
        }
    }
}

impl<C, T> fmt::Debug for Registry<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands)
            .field("default", &self.default_command().map(CommandDescriptor::name))
            .field("global", &self.global)
            .finish()
    }
}

impl<C, T> Registry<C, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCommand`] when the name is taken and
    /// [`RegistryError::ReservedName`] for the `help` word.
    pub fn register<F>(
        &mut self,
        descriptor: CommandDescriptor,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut C, &Arguments<'_>) -> Result<T, HandlerError> + Send + Sync + 'static,
    {
        self.insert(descriptor, Box::new(handler)).map(|_| ())
    }

    /// Registers the command run when no command name is given.
    ///
    /// # Errors
    ///
    /// Fails like [`Registry::register`], and also when a default command or
    /// global options are already registered.
    pub fn register_default<F>(
        &mut self,
        descriptor: CommandDescriptor,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut C, &Arguments<'_>) -> Result<T, HandlerError> + Send + Sync + 'static,
    {
        if let Some(existing) = self.default_command() {
            return Err(RegistryError::DuplicateDefault {
                existing: existing.name().to_owned(),
                name: descriptor.name().to_owned(),
            });
        }
        if self.global.is_some() {
            return Err(RegistryError::GlobalWithDefault);
        }
        let slot = self.insert(descriptor, Box::new(handler))?;
        self.default = Some(slot);
        Ok(())
    }

    /// Registers options accepted before the command name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when global options already exist, a
    /// default command is registered, or the descriptor declares a required
    /// parameter or a variadic tail.
    pub fn register_global(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        if self.global.is_some() {
            return Err(RegistryError::DuplicateGlobal);
        }
        if self.default.is_some() {
            return Err(RegistryError::GlobalWithDefault);
        }
        if let Some(name) = descriptor
            .required()
            .next()
            .or_else(|| descriptor.variadic_name())
        {
            return Err(RegistryError::GlobalNotKeywordOnly {
                name: name.to_owned(),
            });
        }
        debug!(
            target: DISPATCH_TARGET,
            options = descriptor.parameters().len(),
            "registered global options"
        );
        self.global = Some(descriptor);
        Ok(())
    }

    fn insert(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Handler<C, T>,
    ) -> Result<usize, RegistryError> {
        let name = descriptor.name().to_owned();
        if name == HELP_COMMAND {
            return Err(RegistryError::ReservedName { name });
        }
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateCommand { name });
        }
        let slot = self.commands.len();
        debug!(target: DISPATCH_TARGET, command = name.as_str(), "registered command");
        self.index.insert(name, slot);
        self.commands.push(Command { descriptor, handler });
        Ok(slot)
    }

    /// Looks up a command descriptor by name.
    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.entry(name).map(Command::descriptor)
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&Command<C, T>> {
        self.index.get(name).map(|slot| &self.commands[*slot])
    }

    /// Descriptors in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter().map(Command::descriptor)
    }

    /// Command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn default_command(&self) -> Option<&CommandDescriptor> {
        self.default.map(|slot| self.commands[slot].descriptor())
    }

    pub fn global(&self) -> Option<&CommandDescriptor> {
        self.global.as_ref()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
