// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Local process runner: spawn a command, stream its stderr to a sink,
//! return its exit code.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::{Error, Result};

/// Run `command_line` as a local child process and return its exit code.
///
/// The command line is split on whitespace — the first token is the program,
/// the rest are its arguments. There is no shell interpolation. Stdin and
/// stdout are not captured; stderr is read line by line and each line is
/// forwarded to `sink` as it becomes available.
///
/// Fails with [`Error::Io`] if the executable cannot be launched and
/// [`Error::Interrupted`] if the process is terminated without reporting an
/// exit code (killed by a signal).
pub async fn run(command_line: &str, mut sink: impl FnMut(&str)) -> Result<i32> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        Error::io(
            "",
            io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        )
    })?;

    tracing::debug!("running local command: {}", command_line);

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::io(program, e))?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::io(program, io::Error::other("stderr pipe unavailable")))?;

    // Drain stderr before waiting so the child never blocks on a full pipe.
    let mut lines = BufReader::new(stderr).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::io(program, e))?
    {
        sink(&line);
    }

    let status = child.wait().await.map_err(|e| Error::io(program, e))?;
    match status.code() {
        Some(code) => {
            tracing::debug!("local command exited with status {}", code);
            Ok(code)
        }
        None => Err(Error::Interrupted {
            operation: format!("local command '{program}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let mut lines = Vec::new();
        let code = run("false", |l| lines.push(l.to_string())).await.unwrap();
        assert_eq!(code, 1);
        assert!(lines.is_empty(), "false writes nothing to stderr");
    }

    #[tokio::test]
    async fn test_run_success_exit_code() {
        let code = run("true", |_| {}).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_run_forwards_stderr_lines() {
        let mut lines = Vec::new();
        let code = run("ls /definitely/not/here", |l| lines.push(l.to_string()))
            .await
            .unwrap();
        assert_ne!(code, 0);
        assert!(!lines.is_empty(), "ls should complain on stderr");
    }

    #[tokio::test]
    async fn test_run_unlaunchable_program() {
        let err = run("/definitely/not/a/program", |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_run_empty_command_line() {
        let err = run("   ", |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
