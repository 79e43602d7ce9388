//! Commands registered by the `kiln` binary.

use std::fmt::Write as _;
use std::fs;
use std::io::BufRead;
use std::path::PathBuf;

use kiln::{
    Arguments, CommandDescriptor, HandlerError, Registry, RegistryError, default_config_path,
    open_input,
};

/// What a command prints on success, if anything.
pub(crate) type Output = Option<String>;

/// Registry type shared by the runner and its tests.
pub(crate) type CommandRegistry = Registry<Session, Output>;

/// State handed to every handler for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) program: String,
    /// INI dump of the registry the session runs against.
    pub(crate) config_dump: String,
}

impl Session {
    pub(crate) fn new(program: impl Into<String>, registry: &CommandRegistry) -> Self {
        let program = program.into();
        let config_dump = registry.config_dump(&program);
        Self {
            program,
            config_dump,
        }
    }
}

pub(crate) fn registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    registry.register_default(greet_descriptor()?, greet)?;
    registry.register(sum_descriptor()?, sum)?;
    registry.register(cat_descriptor()?, cat)?;
    registry.register(env_descriptor()?, env)?;
    registry.register(defaults_descriptor()?, defaults)?;
    Ok(registry)
}

fn greet_descriptor() -> Result<CommandDescriptor, RegistryError> {
    Ok(CommandDescriptor::builder("greet")
        .required("name")
        .keyword("greeting", "Hello")
        .keyword("shout", false)
        .short("shout", 's')
        .doc(
            "Greet someone by name.

            Runs when the first argument is not a command name.

            :param name: who to greet.
            :param greeting: word to greet with.
            :param shout: print the greeting in capitals.",
        )
        .build()?)
}

fn greet(_: &mut Session, args: &Arguments<'_>) -> Result<Output, HandlerError> {
    let name = args.get_str("name").unwrap_or_default();
    let greeting = args.get_str("greeting").unwrap_or("Hello");
    let line = format!("{greeting}, {name}!");
    Ok(Some(if args.get_bool("shout").unwrap_or(false) {
        line.to_uppercase()
    } else {
        line
    }))
}

fn sum_descriptor() -> Result<CommandDescriptor, RegistryError> {
    Ok(CommandDescriptor::builder("sum")
        .keyword("scale", 1.0)
        .variadic("numbers")
        .doc(
            "Add numbers together.

            :param scale: factor applied to the total.
            :param numbers: the numbers to add.",
        )
        .build()?)
}

fn sum(_: &mut Session, args: &Arguments<'_>) -> Result<Output, HandlerError> {
    let scale = args.get_float("scale").unwrap_or(1.0);
    let mut total = 0.0;
    for number in args.rest() {
        let text = number.to_string();
        let value: f64 = text
            .parse()
            .map_err(|_| format!("{text:?} is not a number"))?;
        total += value;
    }
    Ok(Some((total * scale).to_string()))
}

fn cat_descriptor() -> Result<CommandDescriptor, RegistryError> {
    Ok(CommandDescriptor::builder("cat")
        .optional("path")
        .keyword("number", false)
        .short("number", 'n')
        .doc(
            "Print a file, decompressing gzip input.

            Reads standard input when no path or `-` is given.

            :param path: file to print.
            :param number: prefix each line with its line number.",
        )
        .build()?)
}

fn cat(_: &mut Session, args: &Arguments<'_>) -> Result<Output, HandlerError> {
    let path = args.get_str("path").unwrap_or(kiln::STDIN_MARKER);
    let number = args.get_bool("number").unwrap_or(false);
    let reader = open_input(path)?;

    let mut text = String::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if number {
            writeln!(text, "{:>6}\t{line}", index + 1)?;
        } else {
            writeln!(text, "{line}")?;
        }
    }
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(Some(text))
}

fn env_descriptor() -> Result<CommandDescriptor, RegistryError> {
    Ok(CommandDescriptor::builder("env")
        .variadic("words")
        .open_keywords()
        .doc(
            "Show the words and options it was given.

            Any `--name value` pair is accepted.",
        )
        .build()?)
}

fn env(_: &mut Session, args: &Arguments<'_>) -> Result<Output, HandlerError> {
    let words: Vec<String> = args.rest().iter().map(ToString::to_string).collect();
    let mut lines = vec![format!("words: {}", words.join(" "))];
    lines.extend(args.extra().map(|(name, value)| format!("{name}={value}")));
    Ok(Some(lines.join("\n")))
}

fn defaults_descriptor() -> Result<CommandDescriptor, RegistryError> {
    Ok(CommandDescriptor::builder("defaults")
        .keyword("write", false)
        .optional("path")
        .short("write", 'w')
        .doc(
            "Print every command's option defaults as INI.

            :param write: write the file instead of printing it.
            :param path: file written by --write, `<program>.ini` if omitted.",
        )
        .build()?)
}

fn defaults(session: &mut Session, args: &Arguments<'_>) -> Result<Output, HandlerError> {
    if !args.get_bool("write").unwrap_or(false) {
        return Ok(Some(session.config_dump.trim().to_owned()));
    }
    let path = args
        .get_str("path")
        .map_or_else(|| default_config_path(&session.program), PathBuf::from);
    fs::write(&path, &session.config_dump)
        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;
    Ok(None)
}
