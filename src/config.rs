use std::path::Path;

use ini::{Ini, Properties};
use tracing::{debug, info};

use crate::{
    constants::CONFIG_SESSION_NAME_PREFIX,
    error::ConfigError,
    params::ParameterOverrides,
};

const KEY_BASE: &str = "base";
const KEY_ROLE_ARN: &str = "role_arn";
const KEY_MFA_SERIAL: &str = "mfa_serial";
const KEY_PROFILE: &str = "profile";
const KEY_SESSION_NAME: &str = "session_name";

/// Label used in messages for the keys that precede the first section header
const GENERAL_SECTION_LABEL: &str = "<general>";

/// Read the `section` of the config file at `path` into an override layer.
///
/// An empty `section` selects the general section, the keys written before any
/// `[header]`. Either every required key is present and all of them are
/// returned, or an error is returned and nothing is applied.
pub fn resolve(section: &str, path: &Path) -> Result<ParameterOverrides, ConfigError> {
    let label = match section {
        "" => GENERAL_SECTION_LABEL,
        name => name,
    };

    info!("Resolving parameters from section '{}' of {}", label, path.display());

    let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let properties = match section {
        "" => ini.section(None::<String>),
        name => ini.section(Some(name)),
    }
    .ok_or_else(|| ConfigError::SectionNotFound {
        section: label.to_string(),
        path: path.to_path_buf(),
    })?;

    from_ini_section(properties, label, path)
}

fn from_ini_section(
    properties: &Properties,
    section: &str,
    path: &Path,
) -> Result<ParameterOverrides, ConfigError> {
    let require = |key: &'static str| {
        properties
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key,
                section: section.to_string(),
                path: path.to_path_buf(),
            })
    };

    let base_profile = require(KEY_BASE)?;
    let role_arn = require(KEY_ROLE_ARN)?;
    let mfa_serial = require(KEY_MFA_SERIAL)?;
    let target_profile = require(KEY_PROFILE)?;

    let session_name = match properties.get(KEY_SESSION_NAME) {
        Some(name) => name.to_string(),
        None => {
            debug!("No session_name in section '{}', deriving one", section);
            default_session_name(&target_profile)
        }
    };

    Ok(ParameterOverrides {
        base_profile: Some(base_profile),
        target_profile: Some(target_profile),
        role_arn: Some(role_arn),
        session_name: Some(session_name),
        mfa_serial: Some(mfa_serial),
    })
}

/// Session name used for a config profile that does not name one
pub fn default_session_name(profile: &str) -> String {
    format!("{CONFIG_SESSION_NAME_PREFIX}{profile}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sts-creds.ini");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_resolve_full_section() {
        let (_dir, path) = write_config(
            "[dev]\n\
             base=corp\n\
             role_arn=arn:aws:iam::123456789012:role/Dev\n\
             mfa_serial=arn:aws:iam::123456789012:mfa/alice\n\
             profile=dev-admin\n\
             session_name=alice-dev\n\
             \n\
             [prod]\n\
             base=corp\n\
             role_arn=arn:aws:iam::210987654321:role/Prod\n\
             mfa_serial=arn:aws:iam::123456789012:mfa/alice\n\
             profile=prod\n",
        );

        let overrides = resolve("dev", &path).unwrap();
        assert_eq!(
            overrides,
            ParameterOverrides {
                base_profile: Some("corp".to_string()),
                target_profile: Some("dev-admin".to_string()),
                role_arn: Some("arn:aws:iam::123456789012:role/Dev".to_string()),
                session_name: Some("alice-dev".to_string()),
                mfa_serial: Some("arn:aws:iam::123456789012:mfa/alice".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_session_name_is_derived_from_profile() {
        let (_dir, path) = write_config(
            "[prod]\n\
             base=corp\n\
             role_arn=arn:aws:iam::210987654321:role/Prod\n\
             mfa_serial=arn:aws:iam::123456789012:mfa/alice\n\
             profile=prod-readonly\n",
        );

        let overrides = resolve("prod", &path).unwrap();
        assert_eq!(
            overrides.session_name.as_deref(),
            Some("sts-creds-prod-readonly")
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");

        let err = resolve("dev", &path).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
        assert!(err.to_string().contains("absent.ini"));
    }

    #[test]
    fn test_missing_section_is_error() {
        let (_dir, path) = write_config("[other]\nbase=default\n");

        let err = resolve("dev", &path).unwrap_err();
        assert!(matches!(err, ConfigError::SectionNotFound { ref section, .. } if section == "dev"));
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let (_dir, path) = write_config(
            "[dev]\n\
             base=corp\n\
             mfa_serial=arn:aws:iam::123456789012:mfa/alice\n\
             profile=dev\n",
        );

        let err = resolve("dev", &path).unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound { key: "role_arn", .. }));
        assert!(err.to_string().contains("role_arn"));
    }

    #[test]
    fn test_empty_section_name_reads_general_section() {
        let (_dir, path) = write_config(
            "base=corp\n\
             role_arn=arn:aws:iam::123456789012:role/Shared\n\
             mfa_serial=arn:aws:iam::123456789012:mfa/alice\n\
             profile=shared\n\
             \n\
             [dev]\n\
             base=other\n",
        );

        let overrides = resolve("", &path).unwrap();
        assert_eq!(overrides.base_profile.as_deref(), Some("corp"));
        assert_eq!(overrides.target_profile.as_deref(), Some("shared"));
        assert_eq!(overrides.session_name.as_deref(), Some("sts-creds-shared"));
    }

    #[test]
    fn test_empty_general_section_reports_missing_key() {
        let (_dir, path) = write_config("[dev]\nbase=corp\n");

        let err = resolve("", &path).unwrap_err();
        match err {
            ConfigError::SectionNotFound { ref section, .. }
            | ConfigError::KeyNotFound { ref section, .. } => {
                assert_eq!(section, GENERAL_SECTION_LABEL)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_session_name() {
        assert_eq!(default_session_name("ci"), "sts-creds-ci");
    }
}
