use std::{env, path::PathBuf};

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Environment variable overriding the shared credentials file location
pub const AWS_SHARED_CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Base profile used to sign the AssumeRole call when none is given
pub const DEFAULT_BASE_PROFILE: &str = "default";

/// Session name used when neither the command line nor a config file sets one
pub const DEFAULT_SESSION_NAME: &str = "sts-session";

/// Prefix of the session name synthesized from a config profile
pub const CONFIG_SESSION_NAME_PREFIX: &str = "sts-creds-";

/// Minimum session duration in seconds
pub const MIN_DURATION_SECONDS: i32 = 900;

/// Maximum session duration in seconds
pub const MAX_DURATION_SECONDS: i32 = 3600;

/// Default session duration in seconds
pub const DEFAULT_DURATION_SECONDS: i32 = MIN_DURATION_SECONDS;

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

pub const EXIT_VALIDATION: u8 = 1;
pub const EXIT_PROVIDER: u8 = 2;
pub const EXIT_CONFIG: u8 = 3;
pub const EXIT_SINK: u8 = 4;

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set and non-empty
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    let override_path = env::var(AWS_SHARED_CREDENTIALS_FILE_ENV).ok();
    resolve_credentials_path(override_path.as_deref(), dirs::home_dir())
}

fn resolve_credentials_path(override_path: Option<&str>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => home.map(|home| {
            home.join(AWS_CONFIG_DIR_NAME)
                .join(AWS_CREDENTIALS_FILE_NAME)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_resolve_prefers_override() {
        let path = resolve_credentials_path(Some("/custom/creds"), Some(PathBuf::from("/home/u")));
        assert_eq!(path, Some(PathBuf::from("/custom/creds")));
    }

    #[test]
    fn test_resolve_ignores_empty_override() {
        let path = resolve_credentials_path(Some(""), Some(PathBuf::from("/home/u")));
        assert_eq!(path, Some(PathBuf::from("/home/u/.aws/credentials")));
    }

    #[test]
    fn test_resolve_without_home_is_none() {
        assert_eq!(resolve_credentials_path(None, None), None);
        assert_eq!(resolve_credentials_path(Some(""), None), None);
    }

    #[test]
    #[serial]
    fn test_get_aws_credentials_path_with_env() {
        let original = env::var(AWS_SHARED_CREDENTIALS_FILE_ENV).ok();

        unsafe {
            env::set_var(AWS_SHARED_CREDENTIALS_FILE_ENV, "/custom/path/credentials");
        }
        let path = get_aws_credentials_path();
        assert_eq!(path, Some(PathBuf::from("/custom/path/credentials")));

        unsafe {
            match original {
                Some(val) => env::set_var(AWS_SHARED_CREDENTIALS_FILE_ENV, val),
                None => env::remove_var(AWS_SHARED_CREDENTIALS_FILE_ENV),
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_aws_credentials_path_default() {
        let original = env::var(AWS_SHARED_CREDENTIALS_FILE_ENV).ok();

        unsafe {
            env::remove_var(AWS_SHARED_CREDENTIALS_FILE_ENV);
        }
        let path = get_aws_credentials_path();

        if let Some(p) = path {
            let path_str = p.to_string_lossy();
            assert!(path_str.contains(AWS_CONFIG_DIR_NAME));
            assert!(path_str.contains(AWS_CREDENTIALS_FILE_NAME));
        }

        unsafe {
            if let Some(val) = original {
                env::set_var(AWS_SHARED_CREDENTIALS_FILE_ENV, val);
            }
        }
    }
}
