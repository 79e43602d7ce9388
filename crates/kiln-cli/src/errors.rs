//! Error types for the runner.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use kiln::RegistryError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to register commands: {0}")]
    Registry(#[from] RegistryError),
    #[error("argument is not valid UTF-8: {0:?}")]
    NonUnicodeArgument(OsString),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
