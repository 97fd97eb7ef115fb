//! Running an external command as a stampable job.

use std::path::{Path, PathBuf};
use std::process::Command;

use jobstamp_cache::{Job, JobCall};
use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::shebang;

/// Everything a finished command produced, replayed verbatim on a cache hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutput {
    /// Raw bytes written to standard output.
    pub stdout: Vec<u8>,
    /// Raw bytes written to standard error.
    pub stderr: Vec<u8>,
    /// Exit code, or `-1` if the process was killed by a signal.
    pub code: i32,
}

/// An argv to run, keyed on the argv exactly as given.
#[derive(Debug, Clone)]
pub struct CommandJob {
    argv: Vec<String>,
}

impl CommandJob {
    /// Wraps `argv`. The first element names the program.
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl Job for CommandJob {
    type Output = CapturedOutput;
    type Error = CommandError;

    fn call(&self) -> JobCall {
        JobCall::new("command").arg(&self.argv)
    }

    fn execute(self) -> Result<CapturedOutput, CommandError> {
        let argv = resolve_argv(&self.argv)?;
        let (program, args) = argv.split_first().ok_or(CommandError::EmptyCommand)?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(CapturedOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Builds the argv actually executed: the program is resolved to a path and
/// any shebang interpreter is put in front of it.
fn resolve_argv(argv: &[String]) -> Result<Vec<String>, CommandError> {
    let (program, rest) = argv.split_first().ok_or(CommandError::EmptyCommand)?;
    let path = locate(program)?;

    let mut resolved = shebang::interpreter(&path).map_err(|source| CommandError::Shebang {
        path: path.clone(),
        source,
    })?;
    resolved.push(path.to_string_lossy().into_owned());
    resolved.extend(rest.iter().cloned());
    Ok(resolved)
}

/// Finds `program` as a file path first, then on `PATH`.
fn locate(program: &str) -> Result<PathBuf, CommandError> {
    let direct = Path::new(program);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }
    which::which(program).map_err(|_| CommandError::NotFound {
        program: program.to_string(),
    })
}
