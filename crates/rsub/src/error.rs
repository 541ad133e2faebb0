//! CLI error types.

use std::process::ExitCode;

use rsub_config::ConfigError;
use rsub_pipeline::{LoadErrorKind, PipelineError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl CliError {
    /// Process exit status for this failure.
    ///
    /// 1: configuration, missing URL or failed request; 2: unreadable
    /// response body; 3: output file could not be created or written.
    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Pipeline(PipelineError::Load(err)) => match err.kind {
                LoadErrorKind::Fetch => 1,
                LoadErrorKind::Read => 2,
            },
            Self::Pipeline(PipelineError::Print(_)) => 3,
        }
    }

    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Message with the chain of causes, skipping causes already quoted by
    /// their parent.
    pub(crate) fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}
