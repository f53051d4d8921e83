use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{EXIT_CONFIG, EXIT_PROVIDER, EXIT_SINK, EXIT_VALIDATION};

/// Failures while resolving parameters from an auxiliary config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("section '{section}' not found in config file {}", .path.display())]
    SectionNotFound { section: String, path: PathBuf },

    #[error("key '{key}' not found in section '{section}' of config file {}", .path.display())]
    KeyNotFound {
        key: &'static str,
        section: String,
        path: PathBuf,
    },
}

/// Parameter checks performed before any provider call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Role ARN must be set")]
    MissingRoleArn,

    #[error("Duration must be between 900 and 3600 seconds, got {0}")]
    DurationOutOfRange(i32),

    #[error("MFA is enabled and token must be set")]
    MissingMfaToken,

    #[error("MFA is enabled and serial must be set")]
    MissingMfaSerial,
}

/// Failure reported by the identity provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Call(String),

    #[error("AWS STS returned no credentials")]
    NoCredentials,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Environment(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error with Assume Role: {0}")]
    Provider(#[from] ProviderError),

    #[error("{0:#}")]
    Sink(anyhow::Error),
}

impl Error {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Environment(_) | Self::Validation(_) => EXIT_VALIDATION,
            Self::Provider(_) => EXIT_PROVIDER,
            Self::Config(_) => EXIT_CONFIG,
            Self::Sink(_) => EXIT_SINK,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
