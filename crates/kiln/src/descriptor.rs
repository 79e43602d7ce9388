//! Static description of a command's parameter shape.
//!
//! A [`CommandDescriptor`] is the only thing the parser knows about a
//! command. It is assembled once through [`DescriptorBuilder`], validated
//! eagerly, and immutable afterwards.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::docs::Documentation;
use crate::value::Value;

/// Errors raised while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Command or parameter name is empty or not usable as an option name.
    #[error("invalid name {name:?} in command '{command}'")]
    InvalidName { command: String, name: String },

    /// The same parameter name was declared twice.
    #[error("parameter '{name}' declared twice in command '{command}'")]
    DuplicateParameter { command: String, name: String },

    /// A required parameter follows a parameter with a default.
    #[error("required parameter '{name}' follows a keyword parameter in command '{command}'")]
    RequiredAfterKeyword { command: String, name: String },

    /// A short option refers to a parameter the command does not declare.
    #[error("short option -{short} refers to unknown parameter '{name}' in command '{command}'")]
    UnknownShortOptionTarget {
        command: String,
        name: String,
        short: char,
    },

    /// Two parameters share a short option character.
    #[error("short option -{short} assigned twice in command '{command}'")]
    DuplicateShortOption { command: String, short: char },

    /// The character cannot be used as a short option.
    #[error("'{short}' cannot be used as a short option in command '{command}'")]
    InvalidShortOption { command: String, short: char },
}

/// Immutable parameter shape and documentation of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    name: String,
    parameters: Vec<String>,
    defaults: BTreeMap<String, Value>,
    short_options: BTreeMap<String, char>,
    short_lookup: BTreeMap<char, String>,
    variadic: Option<String>,
    open_keywords: bool,
    paragraphs: Vec<String>,
    param_docs: BTreeMap<String, String>,
}

impl CommandDescriptor {
    /// Starts building a descriptor for the command `name`.
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter names in positional order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns true when `name` is a declared parameter.
    pub fn is_declared(&self, name: &str) -> bool {
        self.parameters.iter().any(|parameter| parameter == name)
    }

    /// Default of a keyword parameter; `None` for required parameters and
    /// undeclared names.
    pub fn default(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    /// Returns true when `name` has a default.
    pub fn is_keyword(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    /// Required parameters in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .map(String::as_str)
            .filter(|name| !self.is_keyword(name))
    }

    /// Keyword parameters and their defaults in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.parameters
            .iter()
            .filter_map(|name| self.defaults.get(name).map(|value| (name.as_str(), value)))
    }

    pub fn short_for(&self, name: &str) -> Option<char> {
        self.short_options.get(name).copied()
    }

    pub fn parameter_for_short(&self, short: char) -> Option<&str> {
        self.short_lookup.get(&short).map(String::as_str)
    }

    pub fn has_short_options(&self) -> bool {
        !self.short_lookup.is_empty()
    }

    /// Whether excess bare tokens are collected into a tail.
    pub fn has_variadic_tail(&self) -> bool {
        self.variadic.is_some()
    }

    /// Documentation name of the variadic tail, if any.
    pub fn variadic_name(&self) -> Option<&str> {
        self.variadic.as_deref()
    }

    /// Whether undeclared named options are accepted.
    pub fn has_open_keywords(&self) -> bool {
        self.open_keywords
    }

    /// Body documentation paragraphs.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// First documentation paragraph.
    pub fn summary(&self) -> Option<&str> {
        self.paragraphs.first().map(String::as_str)
    }

    pub fn param_doc(&self, name: &str) -> Option<&str> {
        self.param_docs.get(name).map(String::as_str)
    }
}

/// Builder for [`CommandDescriptor`].
///
/// Parameters are declared in positional order. Validation is deferred to
/// [`DescriptorBuilder::build`] so declarations can be chained.
#[derive(Debug, Clone)]
#[must_use]
pub struct DescriptorBuilder {
    name: String,
    parameters: Vec<(String, Option<Value>)>,
    shorts: Vec<(String, char)>,
    variadic: Option<String>,
    open_keywords: bool,
    documentation: Documentation,
    param_docs: BTreeMap<String, String>,
}

impl DescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            shorts: Vec::new(),
            variadic: None,
            open_keywords: false,
            documentation: Documentation::default(),
            param_docs: BTreeMap::new(),
        }
    }

    /// Declares a required positional parameter.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.parameters.push((name.into(), None));
        self
    }

    /// Declares a keyword parameter; the default's type drives coercion.
    pub fn keyword(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.parameters.push((name.into(), Some(default.into())));
        self
    }

    /// Declares an untyped optional positional (a keyword defaulting to
    /// [`Value::None`]).
    pub fn optional(self, name: impl Into<String>) -> Self {
        self.keyword(name, Value::None)
    }

    /// Assigns a short option character to a declared parameter.
    pub fn short(mut self, name: impl Into<String>, short: char) -> Self {
        self.shorts.push((name.into(), short));
        self
    }

    /// Collects excess bare tokens into a tail documented as `name`.
    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.variadic = Some(name.into());
        self
    }

    /// Accepts undeclared `--name value` options into an open map.
    pub fn open_keywords(mut self) -> Self {
        self.open_keywords = true;
        self
    }

    /// Attaches documentation text; `:param name:` blocks become parameter
    /// documentation.
    pub fn doc(mut self, text: &str) -> Self {
        self.documentation = Documentation::parse(text);
        self
    }

    /// Documents a single parameter, overriding any `:param` block.
    pub fn param_doc(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.param_docs.insert(name.into(), text.into());
        self
    }

    /// Validates the declarations and produces the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] for invalid or duplicate names, required
    /// parameters after keyword parameters, and inconsistent short options.
    pub fn build(self) -> Result<CommandDescriptor, DescriptorError> {
        let command = self.name;
        if !is_valid_name(&command) {
            return Err(DescriptorError::InvalidName {
                name: command.clone(),
                command,
            });
        }

        let mut parameters = Vec::with_capacity(self.parameters.len());
        let mut defaults = BTreeMap::new();
        for (name, default) in self.parameters {
            if !is_valid_name(&name) {
                return Err(DescriptorError::InvalidName { command, name });
            }
            if parameters.contains(&name) {
                return Err(DescriptorError::DuplicateParameter { command, name });
            }
            match default {
                Some(value) => {
                    defaults.insert(name.clone(), value);
                }
                None if !defaults.is_empty() => {
                    return Err(DescriptorError::RequiredAfterKeyword { command, name });
                }
                None => {}
            }
            parameters.push(name);
        }

        let mut short_options = BTreeMap::new();
        let mut short_lookup = BTreeMap::new();
        for (name, short) in self.shorts {
            if short == '-' || short == '=' || short.is_whitespace() || short.is_control() {
                return Err(DescriptorError::InvalidShortOption { command, short });
            }
            if !parameters.contains(&name) {
                return Err(DescriptorError::UnknownShortOptionTarget {
                    command,
                    name,
                    short,
                });
            }
            if short_lookup.contains_key(&short) {
                return Err(DescriptorError::DuplicateShortOption { command, short });
            }
            if let Some(previous) = short_options.insert(name.clone(), short) {
                short_lookup.remove(&previous);
            }
            short_lookup.insert(short, name);
        }

        let mut param_docs = self.documentation.params;
        param_docs.extend(self.param_docs);

        Ok(CommandDescriptor {
            name: command,
            parameters,
            defaults,
            short_options,
            short_lookup,
            variadic: self.variadic,
            open_keywords: self.open_keywords,
            paragraphs: self.documentation.paragraphs,
            param_docs,
        })
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.contains('=')
        && !name.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_parameter_categories_in_order() {
        let descriptor = CommandDescriptor::builder("open")
            .required("url")
            .keyword("xml", false)
            .optional("target")
            .build()
            .expect("valid descriptor");

        assert_eq!(descriptor.parameters(), ["url", "xml", "target"]);
        assert_eq!(descriptor.required().collect::<Vec<_>>(), ["url"]);
        let keywords: Vec<&str> = descriptor.keywords().map(|(name, _)| name).collect();
        assert_eq!(keywords, ["xml", "target"]);
        assert_eq!(descriptor.default("xml"), Some(&Value::Bool(false)));
        assert_eq!(descriptor.default("target"), Some(&Value::None));
        assert_eq!(descriptor.default("url"), None);
    }

    #[test]
    fn short_options_map_both_ways() {
        let descriptor = CommandDescriptor::builder("test")
            .keyword("alfa", "1")
            .keyword("charlie", false)
            .short("alfa", 'a')
            .short("charlie", 'c')
            .build()
            .expect("valid descriptor");

        assert!(descriptor.has_short_options());
        assert_eq!(descriptor.short_for("charlie"), Some('c'));
        assert_eq!(descriptor.parameter_for_short('a'), Some("alfa"));
        assert_eq!(descriptor.parameter_for_short('z'), None);
    }

    #[test]
    fn rejects_duplicate_short_characters() {
        let error = CommandDescriptor::builder("test")
            .keyword("alfa", "1")
            .keyword("apple", "2")
            .short("alfa", 'a')
            .short("apple", 'a')
            .build()
            .expect_err("duplicate short option");
        assert!(matches!(
            error,
            DescriptorError::DuplicateShortOption { short: 'a', .. }
        ));
    }

    #[test]
    fn rejects_short_options_for_unknown_parameters() {
        let error = CommandDescriptor::builder("test")
            .short("ghost", 'g')
            .build()
            .expect_err("unknown target");
        assert!(matches!(
            error,
            DescriptorError::UnknownShortOptionTarget { .. }
        ));
    }

    #[test]
    fn rejects_required_after_keyword() {
        let error = CommandDescriptor::builder("test")
            .keyword("a", 1)
            .required("b")
            .build()
            .expect_err("bad order");
        assert_eq!(
            error,
            DescriptorError::RequiredAfterKeyword {
                command: String::from("test"),
                name: String::from("b"),
            }
        );
    }

    #[test]
    fn rejects_duplicate_parameters() {
        let error = CommandDescriptor::builder("test")
            .required("a")
            .required("a")
            .build()
            .expect_err("duplicate");
        assert!(matches!(error, DescriptorError::DuplicateParameter { .. }));
    }

    #[test]
    fn rejects_option_like_names() {
        let error = CommandDescriptor::builder("test")
            .keyword("--x", 1)
            .build()
            .expect_err("invalid name");
        assert!(matches!(error, DescriptorError::InvalidName { .. }));
        assert!(CommandDescriptor::builder("").build().is_err());
    }

    #[test]
    fn explicit_param_docs_override_embedded_blocks() {
        let descriptor = CommandDescriptor::builder("open")
            .required("url")
            .keyword("xml", false)
            .doc("Open a URL.\n\n:param url: url to open.\n:param xml: old text.")
            .param_doc("xml", "use it for xml output.")
            .build()
            .expect("valid descriptor");

        assert_eq!(descriptor.summary(), Some("Open a URL."));
        assert_eq!(descriptor.param_doc("url"), Some("url to open."));
        assert_eq!(descriptor.param_doc("xml"), Some("use it for xml output."));
    }
}
