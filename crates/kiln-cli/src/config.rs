//! Configuration loading helpers for the runner.
//!
//! Configuration flags must come before the command line proper. They are
//! split off here so `ortho_config` only sees the flags it understands and
//! the dispatcher only sees command tokens.

use std::ffi::{OsStr, OsString};

use kiln_config::Config;
use ortho_config::OrthoConfig as _;

use crate::errors::AppError;

/// Configuration flags followed by a value.
const CONFIG_VALUE_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--error-exit-code",
];

/// Configuration switches. A bare switch is passed on as `--flag=true` so
/// that an absent switch leaves the file and environment layers in charge.
const CONFIG_SWITCH_FLAGS: &[&str] = &["--help-on-error", "--preview"];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the split-off configuration arguments,
    /// program name first.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Switch,
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let argument_text = argument.to_string_lossy();
        if !argument_text.starts_with("--") {
            return FlagAction::Skip;
        }

        let (flag, has_inline_value) = match argument_text.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (&*argument_text, false),
        };

        if CONFIG_VALUE_FLAGS.contains(&flag) {
            return FlagAction::Include {
                needs_value: !has_inline_value,
            };
        }
        if CONFIG_SWITCH_FLAGS.contains(&flag) {
            if has_inline_value {
                return FlagAction::Include { needs_value: false };
            }
            return FlagAction::Switch;
        }

        FlagAction::Skip
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some(program) = args.first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut filtered = vec![program.clone()];
    let mut command_start = 1usize;
    let mut pending_value = false;

    for argument in args.iter().skip(1) {
        if pending_value {
            filtered.push(argument.clone());
            pending_value = false;
            command_start += 1;
            continue;
        }

        match OrthoConfigLoader::process_config_flag(argument.as_os_str()) {
            FlagAction::Include { needs_value } => {
                filtered.push(argument.clone());
                command_start += 1;
                pending_value = needs_value;
            }
            FlagAction::Switch => {
                let mut switch = argument.clone();
                switch.push("=true");
                filtered.push(switch);
                command_start += 1;
            }
            FlagAction::Skip => break,
        }
    }

    ConfigArgumentSplit {
        config_arguments: filtered,
        command_start,
    }
}
