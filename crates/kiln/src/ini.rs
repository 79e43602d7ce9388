//! INI dump of every command's keyword defaults.
//!
//! Each command gets a `[name]` section in registration order. Its
//! documentation is written as `#` comments, followed by one `name = value`
//! line per keyword option.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::dispatch::DISPATCH_TARGET;
use crate::docs::paragraphs;
use crate::help::CommandHelp;
use crate::registry::Registry;
use crate::render::{argument_lines, description_lines, hang, option_head};

/// Errors raised while writing a configuration file.
#[derive(Debug, Error)]
pub enum IniError {
    #[error("failed to write configuration to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Default file name for a program's configuration dump: `<program>.ini`.
pub fn default_config_path(program: &str) -> PathBuf {
    PathBuf::from(format!("{program}.ini"))
}

impl<C, T> Registry<C, T> {
    /// Renders the INI dump as text.
    pub fn config_dump(&self, program: &str) -> String {
        let mut lines = Vec::new();
        for descriptor in self.commands() {
            let help = CommandHelp::new(program, descriptor);
            lines.push(String::new());
            lines.push(format!("[{}]", help.name));
            lines.extend(
                description_lines(&help)
                    .iter()
                    .chain(argument_lines(&help).iter())
                    .map(|line| comment(line)),
            );
            for option in &help.options {
                let head = option_head(option);
                let doc = paragraphs(option.doc.as_deref().unwrap_or_default()).join(" ");
                let indent = head.len() + 2;
                lines.extend(hang(&head, indent, &doc).iter().map(|line| comment(line)));
                lines.push(format!("{} = {}", option.name, option.default));
                lines.push(String::new());
            }
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Overwrites `path` with the INI dump.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::Write`] when the file cannot be written.
    pub fn write_config(&self, program: &str, path: &Path) -> Result<(), IniError> {
        fs::write(path, self.config_dump(program)).map_err(|source| IniError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(target: DISPATCH_TARGET, path = %path.display(), "wrote configuration dump");
        Ok(())
    }
}

fn comment(line: &str) -> String {
    if line.is_empty() {
        String::from("#")
    } else {
        format!("# {line}")
    }
}
