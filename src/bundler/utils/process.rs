//! External process execution.
//!
//! Every tool the pipeline drives (tar, uv, python, pip) goes through these
//! two helpers so a non-zero exit always becomes [`Error::CommandFailed`].

use crate::bundler::error::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Renders a command line for logs and error messages.
pub fn display(command: &Command) -> String {
    let std = command.as_std();
    std::iter::once(std.get_program())
        .chain(std.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a command with inherited stdio and waits for it to finish.
pub async fn run(command: &mut Command) -> Result<()> {
    let rendered = display(command);
    log::debug!("+ {}", rendered);

    let status = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|source| Error::Spawn {
            command: rendered.clone(),
            source,
        })?;

    if !status.success() {
        return Err(Error::CommandFailed {
            command: rendered,
            code: status.code(),
        });
    }

    Ok(())
}

/// Runs a command and returns its trimmed stdout.
///
/// Stdin is closed and stderr is passed through.
pub async fn output(command: &mut Command) -> Result<String> {
    let rendered = display(command);
    log::debug!("+ {}", rendered);

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|source| Error::Spawn {
            command: rendered.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: rendered,
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
