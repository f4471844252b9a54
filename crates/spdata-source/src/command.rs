//! Thin wrapper over `std::process::Command` shared by sources and probes.

use std::process::Command;

use tracing::debug;

use crate::error::{SourceError, SourceResult};

/// Run `program` with `args` and return its stdout.
///
/// A non-zero exit becomes [`SourceError::Failed`] carrying stderr.
pub fn run(program: &str, args: &[&str]) -> SourceResult<String> {
    debug!(%program, ?args, "running command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| SourceError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SourceError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
