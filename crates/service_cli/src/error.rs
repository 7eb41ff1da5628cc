//! CLI error type and exit-code mapping.
//!
//! The process exits with a distinct status per failure class:
//! usage and configuration problems, program build failures, and all
//! other device errors. No failure is retried or downgraded.

use thiserror::Error;

use accel_runtime::LaunchError;

use crate::config::ConfigError;

/// Exit status for usage and configuration errors.
pub const EXIT_USAGE: i32 = 2;
/// Exit status for accelerator program build failures.
pub const EXIT_BUILD_FAILURE: i32 = 3;
/// Exit status for any other device-layer failure.
pub const EXIT_DEVICE_ERROR: i32 = 1;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Launch pipeline error.
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Report rendering error.
    #[error("Report rendering error: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Maps the error to its process exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_USAGE,
            Self::Launch(launch) if launch.is_build_failure() => EXIT_BUILD_FAILURE,
            Self::Launch(_) => EXIT_DEVICE_ERROR,
            Self::Render(_) => EXIT_DEVICE_ERROR,
        }
    }
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
