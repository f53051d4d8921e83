use std::{ffi::OsString, io};

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::{
    aws::sts::StsRoleAssumer,
    commands::{AssumeCommand, CompletionsCommand},
    constants::EXIT_VALIDATION,
    error::Result,
};

/// Long flags that older invocations spell with a single dash, e.g. `-arn`
const LEGACY_LONG_FLAGS: &[&str] = &[
    "base",
    "profile",
    "arn",
    "name",
    "session_name",
    "duration",
    "mfa",
    "token",
    "serial",
    "debug",
    "config",
];

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sts-creds",
    version,
    about = "Assume an AWS IAM role and export or save the temporary credentials",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub assume: AssumeCommand,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(long, value_enum, value_name = "SHELL", help = "Print a shell completion script and exit")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Parse process arguments, accepting the single-dash long flag spelling
    pub fn parse_args() -> std::result::Result<Self, clap::Error> {
        Self::parse_args_from(std::env::args_os())
    }

    pub fn parse_args_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_legacy_args(args))
    }

    pub async fn execute(self) -> Result<()> {
        let mut stdout = io::stdout();

        if let Some(shell) = self.completions {
            CompletionsCommand { shell }.execute(&mut stdout);
            return Ok(());
        }

        self.assume
            .execute(&StsRoleAssumer, &mut stdout)
            .await
            .map(|_| ())
    }
}

/// Exit code for a failed parse. Help and version output are not failures.
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    match err.use_stderr() {
        true => EXIT_VALIDATION,
        false => 0,
    }
}

/// Rewrite `-flag` / `-flag=value` to `--flag` / `--flag=value` for known long
/// flags. Arguments after `--` are left alone.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut terminated = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if terminated {
                return arg;
            }
            if arg == "--" {
                terminated = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_legacy_flag(s) => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_legacy_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LEGACY_LONG_FLAGS.contains(&name)
}
