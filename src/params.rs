use std::fmt;

use crate::{
    constants::{MAX_DURATION_SECONDS, MIN_DURATION_SECONDS},
    error::ValidationError,
};

/// Inputs of a single role assumption
#[derive(Clone, PartialEq, Eq)]
pub struct Parameters {
    /// Profile whose credentials sign the AssumeRole call
    pub base_profile: String,
    /// Credentials file section to write; empty means export to the environment
    pub target_profile: String,
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: i32,
    pub mfa: bool,
    pub mfa_token: String,
    pub mfa_serial: String,
}

/// Values resolved from a config file. Each `Some` replaces the command-line value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    pub base_profile: Option<String>,
    pub target_profile: Option<String>,
    pub role_arn: Option<String>,
    pub session_name: Option<String>,
    pub mfa_serial: Option<String>,
}

/// Where the obtained credentials go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Environment,
    Profile(String),
}

impl Parameters {
    /// Apply a config layer on top of the command-line values
    pub fn with_overrides(self, overrides: ParameterOverrides) -> Self {
        Self {
            base_profile: overrides.base_profile.unwrap_or(self.base_profile),
            target_profile: overrides.target_profile.unwrap_or(self.target_profile),
            role_arn: overrides.role_arn.unwrap_or(self.role_arn),
            session_name: overrides.session_name.unwrap_or(self.session_name),
            mfa_serial: overrides.mfa_serial.unwrap_or(self.mfa_serial),
            ..self
        }
    }

    /// Check required fields and bounds. A supplied MFA token turns MFA on.
    ///
    /// Completeness of the MFA fields is checked when the request is built.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.role_arn.is_empty() {
            return Err(ValidationError::MissingRoleArn);
        }

        if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&self.duration_seconds) {
            return Err(ValidationError::DurationOutOfRange(self.duration_seconds));
        }

        let mfa = self.mfa || !self.mfa_token.is_empty();
        Ok(Self { mfa, ..self })
    }

    pub fn destination(&self) -> Destination {
        match self.target_profile.as_str() {
            "" => Destination::Environment,
            profile => Destination::Profile(profile.to_string()),
        }
    }

    /// Full dump for `--debug`, secrets included
    pub fn debug_dump(&self) -> String {
        format!(
            "base: {}\nprofile: {}\nrole_arn: {}\nsess_name: {}\nduration: {}\nmfa: {}\nmfa_token: {}\nmfa_serial: {}",
            self.base_profile,
            self.target_profile,
            self.role_arn,
            self.session_name,
            self.duration_seconds,
            self.mfa,
            self.mfa_token,
            self.mfa_serial,
        )
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameters")
            .field("base_profile", &self.base_profile)
            .field("target_profile", &self.target_profile)
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("duration_seconds", &self.duration_seconds)
            .field("mfa", &self.mfa)
            .field("mfa_token", &"<redacted>")
            .field("mfa_serial", &self.mfa_serial)
            .finish()
    }
}
