//! Token classification for a selected command.
//!
//! The tokenizer drains a queue of raw arguments left to right, sorting each
//! token into the keyword map (long options and short option clusters) or
//! the positional list (bare tokens, the stdin marker, and everything after
//! the end-of-options marker). Option values are coerced against the
//! parameter defaults as they are read.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use crate::coerce::coerce;
use crate::descriptor::CommandDescriptor;
use crate::errors::CommandError;
use crate::value::Value;

/// Tracing target for token classification.
pub(crate) const PARSE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::parse");

/// Marker ending option processing.
pub const END_OF_OPTIONS: &str = "--";
/// Marker standing for standard input.
pub const STDIN_MARKER: &str = "-";

/// How coercion failures are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionMode {
    /// Coercion failures are errors.
    #[default]
    Strict,
    /// Coercion failures keep the raw text. Used to preview call shapes.
    Lenient,
}

/// A positional token as read from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareToken {
    pub text: String,
    /// Set for the stdin marker and for tokens after `--`. Literal tokens
    /// are never coerced.
    pub literal: bool,
}

impl BareToken {
    fn bare(text: String) -> Self {
        Self {
            text,
            literal: false,
        }
    }

    fn literal(text: String) -> Self {
        Self {
            text,
            literal: true,
        }
    }
}

/// Tokens sorted into positionals and named options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedTokens {
    /// Bare tokens in command-line order.
    pub positional: Vec<BareToken>,
    /// Named option values; later occurrences overwrite earlier ones.
    pub keywords: BTreeMap<String, Value>,
}

/// Classifies every token in `queue` against `descriptor`.
///
/// The queue is drained.
///
/// # Errors
///
/// Returns [`CommandError::Coercion`] when an option value does not match
/// its parameter type (strict mode only) and
/// [`CommandError::RepeatedStdinMarker`] when `-` appears twice.
pub fn tokenize(
    descriptor: &CommandDescriptor,
    queue: &mut VecDeque<String>,
    mode: CoercionMode,
) -> Result<ClassifiedTokens, CommandError> {
    Tokenizer::new(descriptor, mode).run(queue)
}

/// Classifies leading options only, stopping before the first bare token.
///
/// The bare token and everything after it stay in `queue`. The markers `--`
/// and `-`, and any token listed in `stop_tokens`, also stop the scan.
pub(crate) fn tokenize_leading_options(
    descriptor: &CommandDescriptor,
    queue: &mut VecDeque<String>,
    mode: CoercionMode,
    stop_tokens: &[&str],
) -> Result<ClassifiedTokens, CommandError> {
    let mut tokenizer = Tokenizer::new(descriptor, mode);
    tokenizer.stop_at_bare = true;
    tokenizer.stop_tokens = stop_tokens;
    tokenizer.run(queue)
}

struct Tokenizer<'a> {
    descriptor: &'a CommandDescriptor,
    mode: CoercionMode,
    stop_at_bare: bool,
    stop_tokens: &'a [&'a str],
}

impl<'a> Tokenizer<'a> {
    fn new(descriptor: &'a CommandDescriptor, mode: CoercionMode) -> Self {
        Self {
            descriptor,
            mode,
            stop_at_bare: false,
            stop_tokens: &[],
        }
    }

    fn run(&self, queue: &mut VecDeque<String>) -> Result<ClassifiedTokens, CommandError> {
        let mut classified = ClassifiedTokens::default();
        let mut seen_stdin = false;

        while let Some(token) = queue.pop_front() {
            if self.stop_at_bare && !self.is_option(&token) {
                queue.push_front(token);
                break;
            }

            if token == END_OF_OPTIONS {
                trace!(target: PARSE_TARGET, remaining = queue.len(), "end of options");
                classified
                    .positional
                    .extend(queue.drain(..).map(BareToken::literal));
                break;
            }

            if token == STDIN_MARKER {
                if seen_stdin {
                    return Err(CommandError::RepeatedStdinMarker {
                        command: self.descriptor.name().to_owned(),
                    });
                }
                seen_stdin = true;
                classified.positional.push(BareToken::literal(token));
                continue;
            }

            if let Some(body) = token.strip_prefix("--") {
                self.long_option(body, queue, &mut classified.keywords)?;
            } else if token.starts_with('-') && self.descriptor.has_short_options() {
                self.short_cluster(&token[1..], queue, &mut classified.keywords)?;
            } else {
                trace!(target: PARSE_TARGET, token = token.as_str(), "bare token");
                classified.positional.push(BareToken::bare(token));
            }
        }

        Ok(classified)
    }

    /// Returns true for tokens the option scanner consumes.
    fn is_option(&self, token: &str) -> bool {
        if token == END_OF_OPTIONS || token == STDIN_MARKER || self.stop_tokens.contains(&token) {
            return false;
        }
        token.starts_with("--") || (token.starts_with('-') && self.descriptor.has_short_options())
    }

    fn long_option(
        &self,
        body: &str,
        queue: &mut VecDeque<String>,
        keywords: &mut BTreeMap<String, Value>,
    ) -> Result<(), CommandError> {
        if let Some((name, raw)) = body.split_once('=') {
            let value = self.coerce_value(name, strip_quotes(raw))?;
            trace!(target: PARSE_TARGET, option = name, "long option with inline value");
            keywords.insert(name.to_owned(), value);
            return Ok(());
        }

        let name = body;
        let value = match self.descriptor.default(name) {
            Some(Value::Bool(default)) => Value::Bool(!default),
            _ => match queue.front() {
                Some(next) if !next.starts_with('-') => {
                    let text = queue.pop_front().unwrap_or_default();
                    self.coerce_value(name, &text)?
                }
                _ => Value::Bool(true),
            },
        };
        trace!(target: PARSE_TARGET, option = name, "long option");
        keywords.insert(name.to_owned(), value);
        Ok(())
    }

    fn short_cluster(
        &self,
        cluster: &str,
        queue: &mut VecDeque<String>,
        keywords: &mut BTreeMap<String, Value>,
    ) -> Result<(), CommandError> {
        for (offset, short) in cluster.char_indices() {
            let Some(name) = self.descriptor.parameter_for_short(short) else {
                trace!(target: PARSE_TARGET, short = %short, "ignoring unknown short option");
                continue;
            };

            if let Some(Value::Bool(default)) = self.descriptor.default(name) {
                keywords.insert(name.to_owned(), Value::Bool(!default));
                continue;
            }

            let rest = &cluster[offset + short.len_utf8()..];
            let value = if rest.is_empty() {
                match queue.pop_front() {
                    Some(text) => self.coerce_value(name, &text)?,
                    None => Value::Bool(true),
                }
            } else {
                self.coerce_value(name, rest)?
            };
            trace!(target: PARSE_TARGET, option = name, short = %short, "short option");
            keywords.insert(name.to_owned(), value);
            break;
        }
        Ok(())
    }

    fn coerce_value(&self, name: &str, text: &str) -> Result<Value, CommandError> {
        let reference = self.descriptor.default(name).unwrap_or(&Value::None);
        match coerce(text, reference) {
            Ok(value) => Ok(value),
            Err(_) if self.mode == CoercionMode::Lenient => Ok(Value::Str(text.to_owned())),
            Err(error) => Err(CommandError::coercion(
                self.descriptor.name(),
                name,
                error.value,
                error.expected,
            )),
        }
    }
}

/// Strips one matching pair of surrounding single or double quotes.
pub(crate) fn strip_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
