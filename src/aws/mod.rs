use std::fmt;

use aws_smithy_types::{DateTime, date_time::Format};

pub mod credentials;
pub mod env;
pub mod sts;

/// AWS temporary credentials structure
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime>,
}

impl Credentials {
    /// RFC 3339 expiration, or "unknown"
    pub fn expiration_display(&self) -> String {
        self.expiration
            .and_then(|exp| exp.fmt(Format::DateTime).ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Full dump for `--debug`, secrets included
    pub fn debug_dump(&self) -> String {
        format!(
            "AccessKeyId: {}\nSecretAccessKey: {}\nSessionToken: {}\nExpiration: {}",
            self.access_key_id,
            self.secret_access_key,
            self.session_token,
            self.expiration_display(),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}
