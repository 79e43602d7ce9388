//! Documentation text handling for command descriptors.
//!
//! Command documentation is free text split into paragraphs by blank lines.
//! Parameter documentation may be embedded as reStructuredText-style field
//! lines:
//!
//! ```text
//! Open a URL.
//!
//! :param url: the address to open.
//! :param retries: how many times to retry,
//!     continued on an indented line.
//! ```
//!
//! Field blocks are lifted out of the body into a name → text map; a block
//! continues over blank lines and lines indented deeper than its opening
//! line.

use std::collections::BTreeMap;

const PARAM_PREFIX: &str = ":param ";

/// Documentation split into body paragraphs and per-parameter text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Whitespace-normalised body paragraphs, in order.
    pub paragraphs: Vec<String>,
    /// Raw parameter documentation keyed by parameter name.
    pub params: BTreeMap<String, String>,
}

impl Documentation {
    /// Parses free-form documentation, extracting `:param name:` blocks.
    pub fn parse(text: &str) -> Self {
        let (body, params) = split_param_blocks(text);
        Self {
            paragraphs: paragraphs(&body),
            params,
        }
    }

    /// Returns the first paragraph, conventionally a one-line summary.
    pub fn summary(&self) -> Option<&str> {
        self.paragraphs.first().map(String::as_str)
    }
}

/// Splits text into paragraphs separated by blank lines, collapsing each
/// paragraph's internal whitespace to single spaces.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut result);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut result);
    result
}

fn flush_paragraph(lines: &mut Vec<&str>, output: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join(" ");
    let normalised = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalised.is_empty() {
        output.push(normalised);
    }
    lines.clear();
}

/// Removes `:param name:` blocks from `text`, returning the remaining body
/// and the extracted documentation.
pub fn split_param_blocks(text: &str) -> (String, BTreeMap<String, String>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut body: Vec<&str> = Vec::new();
    let mut params = BTreeMap::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let Some((indent, name, first)) = parse_param_line(line) else {
            body.push(line);
            index += 1;
            continue;
        };

        let mut block = vec![first.to_owned()];
        index += 1;
        while index < lines.len() && continues_block(lines[index], indent) {
            block.push(lines[index].to_owned());
            index += 1;
        }
        while block.last().is_some_and(|tail| tail.trim().is_empty()) {
            block.pop();
        }
        params.insert(name.to_owned(), block.join("\n"));
    }

    (body.join("\n"), params)
}

/// Matches `<indent>:param <name>: <text>`, returning the indent width.
fn parse_param_line(line: &str) -> Option<(usize, &str, &str)> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let indent = line.len() - trimmed.len();
    let rest = trimmed.strip_prefix(PARAM_PREFIX)?;
    let (name, text) = rest.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((indent, name, text.trim()))
}

fn continues_block(line: &str, indent: usize) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    let depth = line.len() - line.trim_start_matches([' ', '\t']).len();
    depth > indent
}
