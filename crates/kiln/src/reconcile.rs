//! Reconciliation of classified tokens against a command's parameter slots.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::coerce::coerce;
use crate::descriptor::CommandDescriptor;
use crate::errors::CommandError;
use crate::tokenizer::{BareToken, ClassifiedTokens, CoercionMode, END_OF_OPTIONS, PARSE_TARGET};
use crate::value::Value;

/// Arguments ready to be applied to a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// Positional values: bound parameter slots first, then the variadic tail.
    pub positional: Vec<Value>,
    /// Number of leading `positional` entries bound to declared parameters.
    pub bound: usize,
    /// Named values, including any undeclared names accepted by an open
    /// keyword bag.
    pub keywords: BTreeMap<String, Value>,
}

impl ParseResult {
    /// Values collected by the variadic tail.
    pub fn tail(&self) -> &[Value] {
        &self.positional[self.bound.min(self.positional.len())..]
    }
}

/// Maps classified tokens onto the slots of `descriptor`.
///
/// Named values always win over positional back-fill for the same slot.
/// Keyword slots are back-filled from bare tokens only when the command has
/// no variadic tail; with a tail they are bound positionally (named value or
/// default) while bare tokens remain, so those tokens reach the tail.
///
/// # Errors
///
/// Returns [`CommandError`] for missing required arguments, surplus bare
/// tokens, undeclared options, a repeated `--`, and (strict mode only)
/// back-filled tokens that fail coercion.
pub fn reconcile(
    descriptor: &CommandDescriptor,
    tokens: ClassifiedTokens,
    mode: CoercionMode,
) -> Result<ParseResult, CommandError> {
    let command = descriptor.name();
    let ClassifiedTokens {
        positional: bare,
        mut keywords,
    } = tokens;

    if bare
        .iter()
        .any(|token| token.literal && token.text == END_OF_OPTIONS)
    {
        return Err(CommandError::RepeatedEndOfOptions {
            command: command.to_owned(),
        });
    }

    let mut bare = VecDeque::from(bare);
    let mut positional = Vec::with_capacity(descriptor.parameters().len());

    for name in descriptor.parameters() {
        match descriptor.default(name) {
            Some(default) if descriptor.has_variadic_tail() => {
                if bare.is_empty() {
                    break;
                }
                let value = keywords.remove(name).unwrap_or_else(|| default.clone());
                positional.push(value);
            }
            Some(default) => {
                if keywords.contains_key(name) {
                    continue;
                }
                if let Some(token) = bare.pop_front() {
                    let value = coerce_bare(command, name, token, default, mode)?;
                    keywords.insert(name.clone(), value);
                }
            }
            None => {
                let value = match keywords.remove(name) {
                    Some(value) => value,
                    None => match bare.pop_front() {
                        Some(token) => Value::Str(token.text),
                        None => return Err(CommandError::missing_required(command, name)),
                    },
                };
                positional.push(value);
            }
        }
    }

    let bound = positional.len();
    if !bare.is_empty() {
        if !descriptor.has_variadic_tail() {
            let extra = bare.into_iter().map(|token| token.text).collect();
            return Err(CommandError::too_many_arguments(command, extra));
        }
        positional.extend(bare.into_iter().map(|token| Value::Str(token.text)));
    }

    if !descriptor.has_open_keywords()
        && let Some(name) = keywords.keys().find(|name| !descriptor.is_declared(name))
    {
        return Err(CommandError::unknown_option(command, name.as_str()));
    }

    debug!(
        target: PARSE_TARGET,
        command,
        bound,
        tail = positional.len() - bound,
        keywords = keywords.len(),
        "reconciled arguments"
    );

    Ok(ParseResult {
        positional,
        bound,
        keywords,
    })
}

fn coerce_bare(
    command: &str,
    name: &str,
    token: BareToken,
    default: &Value,
    mode: CoercionMode,
) -> Result<Value, CommandError> {
    if token.literal {
        return Ok(Value::Str(token.text));
    }
    match coerce(&token.text, default) {
        Ok(value) => Ok(value),
        Err(_) if mode == CoercionMode::Lenient => Ok(Value::Str(token.text)),
        Err(error) => Err(CommandError::coercion(
            command,
            name,
            error.value,
            error.expected,
        )),
    }
}
