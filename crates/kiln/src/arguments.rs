//! Read-only view of the arguments handed to a command handler.

use std::collections::BTreeMap;

use crate::descriptor::CommandDescriptor;
use crate::reconcile::ParseResult;
use crate::value::Value;

/// Reconciled arguments of one invocation, resolved against the command's
/// defaults.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    descriptor: &'a CommandDescriptor,
    result: &'a ParseResult,
    globals: &'a BTreeMap<String, Value>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(
        descriptor: &'a CommandDescriptor,
        result: &'a ParseResult,
        globals: &'a BTreeMap<String, Value>,
    ) -> Self {
        Self {
            descriptor,
            result,
            globals,
        }
    }

    /// Name of the command being run.
    pub fn command(&self) -> &'a str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &'a CommandDescriptor {
        self.descriptor
    }

    /// Value of a declared parameter, falling back to its default.
    ///
    /// Undeclared names accepted by an open keyword bag are also returned.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        if let Some(value) = self.result.keywords.get(name) {
            return Some(value);
        }
        let slot = self
            .descriptor
            .parameters()
            .iter()
            .position(|parameter| parameter == name);
        match slot {
            Some(index) if index < self.result.bound => self.result.positional.get(index),
            _ => self.descriptor.default(name),
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Values collected by the variadic tail.
    pub fn rest(&self) -> &'a [Value] {
        self.result.tail()
    }

    /// Named values that do not match a declared parameter.
    pub fn extra(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let descriptor = self.descriptor;
        self.result
            .keywords
            .iter()
            .filter(move |(name, _)| !descriptor.is_declared(name))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Value of a global option, already resolved against its default.
    pub fn global(&self, name: &str) -> Option<&'a Value> {
        self.globals.get(name)
    }

    /// The raw reconciliation result.
    pub fn parsed(&self) -> &'a ParseResult {
        self.result
    }
}
