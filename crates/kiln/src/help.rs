//! Structured help data.
//!
//! Help is described as plain data so it can be rendered as text (see
//! [`crate::render`]), dumped as INI comments, or inspected in tests.

use std::fmt;

use crate::descriptor::CommandDescriptor;
use crate::registry::Registry;
use crate::value::Value;

/// Overview of every registered command.
#[derive(Debug, Clone, PartialEq)]
pub struct TopHelp {
    pub program: String,
    /// Commands sorted by name.
    pub commands: Vec<CommandSummary>,
    /// Options accepted before the command name, in declaration order.
    pub options: Vec<OptionHelp>,
}

/// One line of the command overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    /// First documentation paragraph.
    pub summary: Option<String>,
}

/// One placeholder of a usage line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageItem {
    /// `<name>`
    Required(String),
    /// `[<name>]`
    Optional(String),
    /// `[...]`
    Rest,
}

impl fmt::Display for UsageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(name) => write!(f, "<{name}>"),
            Self::Optional(name) => write!(f, "[<{name}>]"),
            Self::Rest => f.write_str("[...]"),
        }
    }
}

/// A documented positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentHelp {
    pub name: String,
    pub doc: Option<String>,
}

/// A row of the options table.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionHelp {
    pub name: String,
    pub short: Option<char>,
    pub doc: Option<String>,
    pub default: Value,
}

impl OptionHelp {
    /// Flag spellings, e.g. `-x --name` or `--name`.
    pub fn flags(&self) -> String {
        match self.short {
            Some(short) => format!("-{short} --{}", self.name),
            None => format!("--{}", self.name),
        }
    }
}

/// Full help for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandHelp {
    pub program: String,
    pub name: String,
    pub usage: Vec<UsageItem>,
    pub paragraphs: Vec<String>,
    /// Required arguments in declaration order.
    pub required: Vec<ArgumentHelp>,
    /// Keyword options in declaration order.
    pub options: Vec<OptionHelp>,
    /// The variadic tail, when the command has one.
    pub variadic: Option<ArgumentHelp>,
    /// Whether to explain that `--` turns the rest into bare arguments.
    /// Set when options exist alongside positional-only arguments.
    pub double_dash_note: bool,
}

impl CommandHelp {
    /// Builds help for `descriptor` as invoked through `program`.
    pub fn new(program: &str, descriptor: &CommandDescriptor) -> Self {
        let mut usage: Vec<UsageItem> = descriptor
            .parameters()
            .iter()
            .map(|name| {
                if descriptor.is_keyword(name) {
                    UsageItem::Optional(name.clone())
                } else {
                    UsageItem::Required(name.clone())
                }
            })
            .collect();
        if descriptor.has_variadic_tail() {
            usage.push(UsageItem::Rest);
        }

        let required = descriptor
            .required()
            .map(|name| ArgumentHelp {
                name: name.to_owned(),
                doc: descriptor.param_doc(name).map(str::to_owned),
            })
            .collect();

        let options = option_rows(descriptor);

        let variadic = descriptor.variadic_name().map(|name| ArgumentHelp {
            name: name.to_owned(),
            doc: descriptor.param_doc(name).map(str::to_owned),
        });

        let untyped = descriptor
            .parameters()
            .iter()
            .any(|name| descriptor.default(name).is_none_or(Value::is_none));

        Self {
            program: program.to_owned(),
            name: descriptor.name().to_owned(),
            usage,
            paragraphs: descriptor.paragraphs().to_vec(),
            required,
            double_dash_note: untyped && !options.is_empty(),
            options,
            variadic,
        }
    }

    /// Usage placeholders joined by spaces, e.g. `<a> [<b>] [...]`.
    pub fn usage_placeholders(&self) -> String {
        self.usage
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn summary(&self) -> Option<&str> {
        self.paragraphs.first().map(String::as_str)
    }
}

fn option_rows(descriptor: &CommandDescriptor) -> Vec<OptionHelp> {
    descriptor
        .keywords()
        .map(|(name, default)| OptionHelp {
            name: name.to_owned(),
            short: descriptor.short_for(name),
            doc: descriptor.param_doc(name).map(str::to_owned),
            default: default.clone(),
        })
        .collect()
}

impl<C, T> Registry<C, T> {
    /// Builds the command overview.
    pub fn top_help(&self, program: &str) -> TopHelp {
        let commands = self
            .names()
            .filter_map(|name| self.command(name))
            .map(|descriptor| CommandSummary {
                name: descriptor.name().to_owned(),
                summary: descriptor.summary().map(str::to_owned),
            })
            .collect();
        TopHelp {
            program: program.to_owned(),
            commands,
            options: self.global().map(option_rows).unwrap_or_default(),
        }
    }

    /// Builds help for the named command, if registered.
    pub fn command_help(&self, program: &str, name: &str) -> Option<CommandHelp> {
        self.command(name)
            .map(|descriptor| CommandHelp::new(program, descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Arguments;
    use crate::errors::HandlerError;

    fn open() -> CommandDescriptor {
        CommandDescriptor::builder("open")
            .required("url")
            .keyword("xml", false)
            .optional("target")
            .short("xml", 'x')
            .variadic("extras")
            .doc("Open a URL.\n\nLonger text.\n\n:param url: url to open.")
            .param_doc("extras", "further addresses.")
            .build()
            .expect("valid descriptor")
    }

    #[test]
    fn usage_lists_placeholders_in_order() {
        let help = CommandHelp::new("prog", &open());
        assert_eq!(help.usage_placeholders(), "<url> [<xml>] [<target>] [...]");
    }

    #[test]
    fn collects_arguments_and_options() {
        let help = CommandHelp::new("prog", &open());
        assert_eq!(
            help.required,
            [ArgumentHelp {
                name: String::from("url"),
                doc: Some(String::from("url to open.")),
            }]
        );
        let flags: Vec<String> = help.options.iter().map(OptionHelp::flags).collect();
        assert_eq!(flags, ["-x --xml", "--target"]);
        assert_eq!(help.options[0].default, Value::Bool(false));
        assert_eq!(
            help.variadic.as_ref().and_then(|tail| tail.doc.as_deref()),
            Some("further addresses.")
        );
        assert!(help.double_dash_note);
        assert_eq!(help.summary(), Some("Open a URL."));
    }

    #[test]
    fn double_dash_note_needs_options() {
        let descriptor = CommandDescriptor::builder("plain")
            .required("a")
            .build()
            .expect("valid descriptor");
        assert!(!CommandHelp::new("prog", &descriptor).double_dash_note);
    }

    #[test]
    fn top_help_sorts_commands() {
        let mut registry: Registry<(), ()> = Registry::new();
        let noop = |_: &mut (), _: &Arguments<'_>| -> Result<(), HandlerError> { Ok(()) };
        registry.register(open(), noop).expect("register open");
        let close = CommandDescriptor::builder("close").build().expect("valid");
        registry.register(close, noop).expect("register close");

        let help = registry.top_help("prog");
        let names: Vec<&str> = help.commands.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["close", "open"]);
        assert_eq!(help.commands[0].summary, None);
        assert_eq!(help.commands[1].summary.as_deref(), Some("Open a URL."));
        assert!(registry.command_help("prog", "missing").is_none());
    }

    #[test]
    fn top_help_carries_global_options() {
        let mut registry: Registry<(), ()> = Registry::new();
        let noop = |_: &mut (), _: &Arguments<'_>| -> Result<(), HandlerError> { Ok(()) };
        registry.register(open(), noop).expect("register open");
        assert!(registry.top_help("prog").options.is_empty());

        let global = CommandDescriptor::builder("global")
            .keyword("verbose", false)
            .keyword("profile", "dev")
            .short("verbose", 'v')
            .param_doc("verbose", "say more.")
            .build()
            .expect("valid descriptor");
        registry.register_global(global).expect("register global");

        let options = registry.top_help("prog").options;
        let flags: Vec<String> = options.iter().map(OptionHelp::flags).collect();
        assert_eq!(flags, ["-v --verbose", "--profile"]);
        assert_eq!(options[0].doc.as_deref(), Some("say more."));
        assert_eq!(options[1].default, Value::from("dev"));
    }
}
