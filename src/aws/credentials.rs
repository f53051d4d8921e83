use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;
use tokio::fs;

use super::Credentials;

const KEY_ACCESS_KEY_ID: &str = "aws_access_key_id";
const KEY_SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const KEY_SESSION_TOKEN: &str = "aws_session_token";

/// Save credentials into the `profile` section of the credentials file at `path`.
///
/// The file is parsed first so a malformed file is rejected instead of
/// overwritten. Only the lines of `[profile]` are rewritten (or a new section is
/// appended); every other byte of the file is written back as it was read.
pub async fn save_credentials(path: &Path, profile: &str, creds: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let text = match path.exists() {
        true => {
            let text = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
            Ini::load_from_str(&text)
                .with_context(|| format!("Failed to parse credentials file: {}", path.display()))?;
            text
        }
        false => {
            tracing::info!(
                "No credentials file found at: {}. Creating new one.",
                path.display()
            );
            String::new()
        }
    };

    fs::write(path, upsert_section(&text, profile, creds))
        .await
        .with_context(|| format!("Failed to write credentials file: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(path).await?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions).await?;
    }

    tracing::info!("Credentials saved to profile: {}", profile);
    Ok(())
}

fn render_section(profile: &str, creds: &Credentials, newline: &str) -> String {
    format!(
        "[{profile}]{newline}\
         {KEY_ACCESS_KEY_ID} = {}{newline}\
         {KEY_SECRET_ACCESS_KEY} = {}{newline}\
         {KEY_SESSION_TOKEN} = {}{newline}",
        creds.access_key_id, creds.secret_access_key, creds.session_token,
    )
}

fn header_name(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Replace the first `[profile]` block in place and drop any duplicates.
///
/// A block runs from its header to its last key line; blank and comment lines
/// before the next header stay, since they belong to what follows.
fn upsert_section(text: &str, profile: &str, creds: &Credentials) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let block = render_section(profile, creds, newline);
    let lines: Vec<&str> = text.split_inclusive('\n').collect();

    let mut out = String::with_capacity(text.len() + block.len());
    let mut written = false;
    let mut i = 0;

    while i < lines.len() {
        if header_name(lines[i]) != Some(profile) {
            out.push_str(lines[i]);
            i += 1;
            continue;
        }

        let mut end = i + 1;
        while end < lines.len() && header_name(lines[end]).is_none() {
            end += 1;
        }
        let mut body_end = end;
        while body_end > i + 1 && is_comment_or_blank(lines[body_end - 1]) {
            body_end -= 1;
        }

        if !written {
            out.push_str(&block);
            written = true;
        }
        lines[body_end..end].iter().for_each(|line| out.push_str(line));
        i = end;
    }

    if !written {
        if !out.is_empty() {
            if !out.ends_with('\n') {
                out.push_str(newline);
            }
            if out.lines().last().is_some_and(|line| !line.trim().is_empty()) {
                out.push_str(newline);
            }
        }
        out.push_str(&block);
    }

    out
}
