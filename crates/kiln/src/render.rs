//! Plain-text rendering of help data.

use unicode_width::UnicodeWidthStr;

use crate::docs::paragraphs;
use crate::help::{ArgumentHelp, CommandHelp, OptionHelp, TopHelp};
use crate::value::Value;

/// Column at which help text is wrapped.
pub const HELP_WIDTH: usize = 76;

const MIN_TEXT_WIDTH: usize = 20;
const DOUBLE_DASH_NOTE: &str = "(specifying a double hyphen (--) in the argument list means all \
                                subsequent arguments are treated as bare arguments, not options)";

/// Renders the command overview.
pub fn render_top_help(help: &TopHelp) -> String {
    let mut lines = vec![
        format!("Usage: {} COMMAND <options>", help.program),
        String::new(),
    ];

    if !help.commands.is_empty() {
        lines.push(String::from("Available commands:"));
        let indent = help
            .commands
            .iter()
            .map(|command| command.name.width())
            .max()
            .unwrap_or(0)
            + 3;
        for command in &help.commands {
            let head = format!(" {}", command.name);
            let text = command.summary.as_deref().unwrap_or_default();
            lines.extend(hang(&head, indent, text));
        }
        lines.push(String::new());
    }

    lines.extend(option_table("Global options:", &help.options));

    lines.push(format!(
        "Use '{} <command> --help' for individual command help.",
        help.program
    ));
    finish(lines)
}

/// Renders full help for one command.
pub fn render_command_help(help: &CommandHelp) -> String {
    let mut usage = format!("Usage: {} {}", help.program, help.name);
    if !help.usage.is_empty() {
        usage.push(' ');
        usage.push_str(&help.usage_placeholders());
    }

    let mut lines = vec![usage, String::new()];
    lines.extend(description_lines(help));
    lines.extend(argument_lines(help));
    lines.extend(option_section_lines(help));
    finish(lines)
}

/// Documentation paragraphs: the summary flush left, the rest indented.
pub(crate) fn description_lines(help: &CommandHelp) -> Vec<String> {
    let Some((summary, rest)) = help.paragraphs.split_first() else {
        return Vec::new();
    };
    let mut lines = wrap(summary, HELP_WIDTH);
    for paragraph in rest {
        lines.push(String::new());
        lines.extend(indent_all(4, &wrap(paragraph, HELP_WIDTH - 4)));
    }
    lines.push(String::new());
    lines
}

/// The required-argument table, including the variadic tail when documented.
pub(crate) fn argument_lines(help: &CommandHelp) -> Vec<String> {
    let mut rows: Vec<&ArgumentHelp> = help.required.iter().collect();
    if let Some(tail) = help.variadic.as_ref().filter(|tail| tail.doc.is_some()) {
        rows.push(tail);
    }
    if rows.is_empty() {
        return Vec::new();
    }

    let heads: Vec<String> = rows
        .iter()
        .map(|row| {
            if help.variadic.as_ref() == Some(*row) {
                format!("  {}...", row.name)
            } else {
                format!("  {}", row.name)
            }
        })
        .collect();
    let indent = heads.iter().map(|head| head.width()).max().unwrap_or(0) + 2;

    let mut lines = vec![String::from("Required Arguments:"), String::new()];
    for (head, row) in heads.iter().zip(rows) {
        lines.extend(hang(head, indent, row.doc.as_deref().unwrap_or_default()));
    }
    lines.push(String::new());
    lines
}

fn option_section_lines(help: &CommandHelp) -> Vec<String> {
    let mut lines = option_table("Options:", &help.options);
    if !lines.is_empty() && help.double_dash_note {
        lines.extend(wrap(DOUBLE_DASH_NOTE, HELP_WIDTH));
        lines.push(String::new());
    }
    lines
}

/// A titled table of option rows, flags on the left and docs hanging on the
/// right. Empty when there are no options.
fn option_table(title: &str, options: &[OptionHelp]) -> Vec<String> {
    if options.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![title.to_owned(), String::new()];
    let indent = options
        .iter()
        .map(|option| option_head(option).width())
        .max()
        .unwrap_or(0)
        + 2;
    for option in options {
        lines.extend(hang(&option_head(option), indent, &option_text(option)));
    }
    lines.push(String::new());
    lines
}

/// Flag column of an option row; long-only options align with short ones.
pub(crate) fn option_head(option: &OptionHelp) -> String {
    match option.short {
        Some(_) => format!("  {}", option.flags()),
        None => format!("     {}", option.flags()),
    }
}

fn option_text(option: &OptionHelp) -> String {
    let doc = option.doc.as_deref().unwrap_or_default();
    let doc = paragraphs(doc).join(" ");
    match &option.default {
        Value::None | Value::Bool(_) => doc,
        default if doc.is_empty() => format!("(default: {default})"),
        default => format!("{doc} (default: {default})"),
    }
}

/// Greedily wraps `text` into lines no wider than `width` columns.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        if line_width > 0 && line_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lays out `head` padded to `indent` columns followed by `text` wrapped in
/// the remaining width, continuation lines aligned under the text.
pub(crate) fn hang(head: &str, indent: usize, text: &str) -> Vec<String> {
    let text_width = HELP_WIDTH.saturating_sub(indent).max(MIN_TEXT_WIDTH);
    let mut wrapped = wrap(text, text_width).into_iter();
    let Some(first) = wrapped.next() else {
        return vec![head.trim_end().to_owned()];
    };

    let padding = indent.saturating_sub(head.width()).max(1);
    let mut lines = vec![format!("{head}{}{first}", " ".repeat(padding))];
    lines.extend(wrapped.map(|line| format!("{}{line}", " ".repeat(indent))));
    lines
}

fn indent_all(indent: usize, lines: &[String]) -> Vec<String> {
    let prefix = " ".repeat(indent);
    lines.iter().map(|line| format!("{prefix}{line}")).collect()
}

fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
