use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args};
use tracing::info;

use crate::{
    aws::{
        self, Credentials,
        sts::{AssumeRoleRequest, RoleAssumer},
    },
    config,
    constants::{
        self, DEFAULT_BASE_PROFILE, DEFAULT_DURATION_SECONDS, DEFAULT_SESSION_NAME,
    },
    error::{Error, Result},
    params::{Destination, Parameters},
};

#[derive(Debug, Clone, Args)]
pub struct AssumeCommand {
    #[arg(long, default_value = DEFAULT_BASE_PROFILE, help = "Base profile used to call AssumeRole")]
    pub base: String,

    #[arg(
        short = 'p',
        long,
        default_value = "",
        hide_default_value = true,
        help = "Profile to write credentials to; exports to the environment when empty"
    )]
    pub profile: String,

    #[arg(long, default_value = "", hide_default_value = true, help = "Role ARN to assume (required)")]
    pub arn: String,

    #[arg(
        long = "name",
        visible_alias = "session-name",
        alias = "session_name",
        default_value = DEFAULT_SESSION_NAME,
        help = "Name of the role session"
    )]
    pub session_name: String,

    #[arg(
        long,
        default_value_t = DEFAULT_DURATION_SECONDS,
        allow_negative_numbers = true,
        help = "Number of seconds the credentials last, 900 - 3600"
    )]
    pub duration: i32,

    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "The role requires MFA"
    )]
    pub mfa: bool,

    #[arg(long, default_value = "", hide_default_value = true, help = "MFA token code; implies --mfa")]
    pub token: String,

    #[arg(
        long,
        default_value = "",
        hide_default_value = true,
        help = "MFA serial number, e.g. arn:aws:iam::123456789012:mfa/user"
    )]
    pub serial: String,

    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Print parameters, request and response to stderr"
    )]
    pub debug: bool,

    #[arg(long, value_name = "FILE", help = "Config file holding assume role settings, one section per profile")]
    pub config: Option<PathBuf>,
}

/// How a successful run delivered the credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Environment,
    Profile { name: String, path: PathBuf },
}

impl AssumeCommand {
    pub fn parameters(&self) -> Parameters {
        Parameters {
            base_profile: self.base.clone(),
            target_profile: self.profile.clone(),
            role_arn: self.arn.clone(),
            session_name: self.session_name.clone(),
            duration_seconds: self.duration,
            mfa: self.mfa,
            mfa_token: self.token.clone(),
            mfa_serial: self.serial.clone(),
        }
    }

    pub async fn execute<A, W>(self, assumer: &A, out: &mut W) -> Result<Delivery>
    where
        A: RoleAssumer,
        W: Write,
    {
        let mut params = self.parameters();

        if let Some(path) = &self.config {
            let overrides = config::resolve(&params.target_profile, path)?;
            params = params.with_overrides(overrides);
        }

        let params = params.validate()?;

        if self.debug {
            eprintln!("\nDebug printout of parameters\n{}", params.debug_dump());
        }

        let request = AssumeRoleRequest::from_parameters(&params)?;

        if self.debug {
            eprintln!("\nDEBUG: Params {request:#?}");
        }

        let delivery = locate(params.destination())?;

        let credentials = assumer
            .assume_role(&params.base_profile, &request)
            .await?;

        deliver(&delivery, &credentials, out).await?;

        if self.debug {
            eprintln!("\nResponse:\n{}", credentials.debug_dump());
        }

        Ok(delivery)
    }
}

/// Resolve the destination before the provider call so a missing home
/// directory fails without a network round trip
fn locate(destination: Destination) -> Result<Delivery> {
    match destination {
        Destination::Environment => Ok(Delivery::Environment),
        Destination::Profile(name) => {
            let path = constants::get_aws_credentials_path()
                .ok_or_else(|| Error::Environment("home folder not found".to_string()))?;
            Ok(Delivery::Profile { name, path })
        }
    }
}

async fn deliver<W: Write>(delivery: &Delivery, credentials: &Credentials, out: &mut W) -> Result<()> {
    match delivery {
        Delivery::Environment => {
            aws::env::export_credentials(credentials, out).map_err(Error::Sink)
        }
        Delivery::Profile { name, path } => {
            aws::credentials::save_credentials(path, name, credentials)
                .await
                .context("Failed to save AWS credentials")
                .map_err(Error::Sink)?;

            info!("Wrote profile {} to {}", name, path.display());
            writeln!(out, "AWS credentials saved to {name} profile.")
                .and_then(|()| {
                    writeln!(
                        out,
                        "Credentials will expire at: {}",
                        credentials.expiration_display()
                    )
                })
                .context("Failed to write confirmation")
                .map_err(Error::Sink)
        }
    }
}
