//! External edit boundary.
//!
//! The document goes out to a scratch file, an editor subprocess runs on it,
//! and whatever comes back becomes the new payload. The container itself is
//! untouched until the editor exits successfully.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::process::{Command, Stdio};

/// Runs the edit step: optional pretty-print, scratch file, editor, read back.
///
/// Returns the edited document. Any failure (formatter, editor launch,
/// non-zero editor exit) aborts before the caller can re-encode.
pub fn edit_payload(
    payload: &[u8],
    editor: Option<&str>,
    format_with: Option<&str>,
) -> Result<Vec<u8>> {
    let document = match format_with {
        Some(cmd) => format_document(payload, cmd)?,
        None => payload.to_vec(),
    };

    let mut scratch = tempfile::Builder::new()
        .prefix("w3edit-")
        .suffix(".xml")
        .tempfile()
        .context("Failed to create scratch file")?;
    scratch
        .write_all(&document)
        .context("Failed to write scratch file")?;
    scratch.flush()?;

    let editor_cmd = resolve_editor(editor);
    log::debug!("launching editor `{editor_cmd}` on {:?}", scratch.path());

    let status = Command::new(&editor_cmd)
        .arg(scratch.path())
        .status()
        .with_context(|| format!("Failed to launch editor: {editor_cmd}"))?;
    if !status.success() {
        bail!("Editor `{editor_cmd}` exited with {status}; save left untouched");
    }

    fs::read(scratch.path()).context("Failed to read edited document")
}

/// Pipes the document through an external formatter command, e.g.
/// `xmlstarlet format`.
pub fn format_document(payload: &[u8], cmd: &str) -> Result<Vec<u8>> {
    let mut parts = cmd.split_whitespace();
    let program = parts.next().context("Empty formatter command")?;

    // Feed stdin from a temp file rather than a pipe, so a formatter that
    // streams output cannot deadlock against us.
    let mut input = tempfile::tempfile().context("Failed to create formatter input")?;
    input.write_all(payload)?;
    input.seek(SeekFrom::Start(0))?;

    let output = Command::new(program)
        .args(parts)
        .stdin(Stdio::from(input))
        .output()
        .with_context(|| format!("Failed to launch formatter: {cmd}"))?;

    if !output.status.success() {
        bail!("Formatter `{cmd}` exited with {}", output.status);
    }
    if output.stdout.is_empty() && !payload.is_empty() {
        bail!("Formatter `{cmd}` produced no output");
    }

    Ok(output.stdout)
}

fn resolve_editor(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| env::var("VISUAL").ok().filter(|v| !v.is_empty()))
        .or_else(|| env::var("EDITOR").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "vi".to_string())
}
