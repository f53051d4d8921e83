use std::{env, io::Write};

use anyhow::{Context, Result};
use tracing::info;

use super::Credentials;

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
/// Legacy name still read by older SDKs and tools
pub const AWS_SECURITY_TOKEN: &str = "AWS_SECURITY_TOKEN";

/// Shell `export` statements for the credentials, one per line
pub fn render_exports(creds: &Credentials) -> String {
    format!(
        "export {AWS_ACCESS_KEY_ID}={}\n\
         export {AWS_SECRET_ACCESS_KEY}={}\n\
         export {AWS_SESSION_TOKEN}={}\n\
         export {AWS_SECURITY_TOKEN}=\"${AWS_SESSION_TOKEN}\"\n",
        creds.access_key_id, creds.secret_access_key, creds.session_token,
    )
}

/// Set the credential variables in this process and print the matching
/// `export` lines to `out` so they can be sourced by the calling shell.
pub fn export_credentials<W: Write>(creds: &Credentials, out: &mut W) -> Result<()> {
    // SAFETY: the CLI runs on a current-thread runtime and the STS call has
    // completed, so no other thread reads the environment concurrently.
    unsafe {
        env::set_var(AWS_ACCESS_KEY_ID, &creds.access_key_id);
        env::set_var(AWS_SECRET_ACCESS_KEY, &creds.secret_access_key);
        env::set_var(AWS_SESSION_TOKEN, &creds.session_token);
    }

    out.write_all(render_exports(creds).as_bytes())
        .and_then(|()| out.flush())
        .context("Failed to write export statements")?;

    info!("Credentials exported to environment");
    Ok(())
}
