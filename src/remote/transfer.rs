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

//! Staged file transfer over SFTP.
//!
//! Uploads go through a staging directory: every file is put into the
//! staging location over one SFTP channel, then a single move command runs
//! on an exec channel and is awaited to completion — the transfer only
//! succeeds once the move exits cleanly. Downloads fetch one remote file to
//! a local path.

use std::path::Path;
use std::time::Duration;

use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::endpoint::RemoteEndpoint;
use crate::error::{Error, Result};
use crate::ssh::Client;

use super::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_OPERATION_TIMEOUT_SECS};

const DEFAULT_STAGING_DIR: &str = "/tmp";

/// Options for a single [`upload`] or [`download`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Remote directory files are staged in before the final move.
    pub staging_dir: String,
    /// Deadline for resolving, connecting and authenticating.
    pub connect_timeout: Duration,
    /// Deadline for the whole transfer (puts plus move, or the fetch);
    /// `None` waits indefinitely.
    pub operation_timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            operation_timeout: Some(Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)),
        }
    }
}

/// Upload a single file to a remote directory. See [`upload`].
pub async fn upload_file(
    file: impl AsRef<Path>,
    dest_dir: &str,
    endpoint: &RemoteEndpoint,
    options: &TransferOptions,
) -> Result<()> {
    upload(&[file.as_ref()], dest_dir, endpoint, options).await
}

/// Upload files to `dest_dir` on the remote host via the staging directory.
///
/// Every file must exist locally; missing files fail with
/// [`Error::NotFound`] before any connection is attempted. Files are put
/// into `options.staging_dir` over SFTP, then moved to `dest_dir` by a
/// single remote command whose completion is awaited — a failed move
/// surfaces as [`Error::CommandFailed`]. Uploading an empty file list is a
/// no-op.
pub async fn upload<P: AsRef<Path>>(
    files: &[P],
    dest_dir: &str,
    endpoint: &RemoteEndpoint,
    options: &TransferOptions,
) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    for file in files {
        let path = file.as_ref();
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
    }
    let dest_dir = validate_remote_path(dest_dir)?;
    let staging_dir = validate_remote_path(&options.staging_dir)?;

    tracing::debug!(
        "uploading {} file(s) to {} on {} via {}",
        files.len(),
        dest_dir,
        endpoint,
        staging_dir
    );

    let client = Client::connect(endpoint, options.connect_timeout).await?;
    let transfer = upload_via_staging(&client, files, &staging_dir, &dest_dir, endpoint);
    let result = with_deadline(transfer, options.operation_timeout, || {
        format!("upload to {endpoint}")
    })
    .await;

    if let Err(e) = client.disconnect().await {
        tracing::debug!("disconnect from {} failed: {}", endpoint, e);
    }
    result
}

/// Download one remote file to a local path.
pub async fn download(
    remote_path: &str,
    local_path: impl AsRef<Path>,
    endpoint: &RemoteEndpoint,
    options: &TransferOptions,
) -> Result<()> {
    let local_path = local_path.as_ref();
    tracing::debug!(
        "downloading {} from {} to {:?}",
        remote_path,
        endpoint,
        local_path
    );

    let client = Client::connect(endpoint, options.connect_timeout).await?;
    let fetch = fetch_file(&client, remote_path, local_path);
    let result = with_deadline(fetch, options.operation_timeout, || {
        format!("download of {remote_path} from {endpoint}")
    })
    .await;

    if let Err(e) = client.disconnect().await {
        tracing::debug!("disconnect from {} failed: {}", endpoint, e);
    }
    result
}

async fn upload_via_staging<P: AsRef<Path>>(
    client: &Client,
    files: &[P],
    staging_dir: &str,
    dest_dir: &str,
    endpoint: &RemoteEndpoint,
) -> Result<()> {
    let sftp = client.sftp_session().await?;

    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let path = file.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidRemotePath {
                path: path.to_string_lossy().into_owned(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
        let name = validate_remote_path(name)?;

        let staged_path = format!("{staging_dir}/{name}");
        put_file(&sftp, path, &staged_path).await?;
        staged.push(staged_path);
    }
    // Dropping the session closes the SFTP channel; each file was already
    // flushed and shut down individually.
    drop(sftp);

    // The transfer only counts once the move command exits cleanly.
    let move_command = build_move_command(&staged, dest_dir);
    let output = client.execute(&move_command, None).await?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: move_command,
            exit_status: output.exit_status,
            stderr: output.stderr,
        });
    }

    tracing::debug!("moved {} staged file(s) to {} on {}", staged.len(), dest_dir, endpoint);
    Ok(())
}

async fn put_file(sftp: &SftpSession, local: &Path, remote: &str) -> Result<()> {
    tracing::debug!("staging {:?} as {}", local, remote);

    let contents = tokio::fs::read(local)
        .await
        .map_err(|e| Error::io(local, e))?;

    let mut remote_file = sftp
        .open_with_flags(
            remote,
            OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
        )
        .await?;
    remote_file
        .write_all(&contents)
        .await
        .map_err(|e| Error::io(remote, e))?;
    remote_file.flush().await.map_err(|e| Error::io(remote, e))?;
    remote_file
        .shutdown()
        .await
        .map_err(|e| Error::io(remote, e))?;
    Ok(())
}

async fn fetch_file(client: &Client, remote_path: &str, local_path: &Path) -> Result<()> {
    let sftp = client.sftp_session().await?;

    let mut remote_file = sftp.open_with_flags(remote_path, OpenFlags::READ).await?;
    let mut contents = Vec::new();
    remote_file
        .read_to_end(&mut contents)
        .await
        .map_err(|e| Error::io(remote_path, e))?;

    let mut local_file = tokio::fs::File::create(local_path)
        .await
        .map_err(|e| Error::io(local_path, e))?;
    local_file
        .write_all(&contents)
        .await
        .map_err(|e| Error::io(local_path, e))?;
    local_file
        .flush()
        .await
        .map_err(|e| Error::io(local_path, e))?;

    Ok(())
}

async fn with_deadline<T>(
    fut: impl std::future::Future<Output = Result<T>>,
    timeout: Option<Duration>,
    operation: impl FnOnce() -> String,
) -> Result<T> {
    match timeout {
        Some(t) => match tokio::time::timeout(t, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation: operation(),
                timeout: t,
            }),
        },
        None => fut.await,
    }
}

/// One `mv` per staged file, joined with `&&` so the first failure aborts
/// the chain and surfaces in the exit status.
fn build_move_command(staged: &[String], dest_dir: &str) -> String {
    staged
        .iter()
        .map(|path| format!("mv '{path}' '{dest_dir}'"))
        .collect::<Vec<_>>()
        .join(" && ")
}

/// Reject paths that could break out of the quoting in a generated remote
/// command.
fn validate_remote_path(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(Error::InvalidRemotePath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        });
    }

    const FORBIDDEN: &[char] = &[
        '\'', '"', ';', '&', '|', '`', '$', '<', '>', '(', ')', '\n', '\r', '\0',
    ];
    for &ch in FORBIDDEN {
        if path.contains(ch) {
            return Err(Error::InvalidRemotePath {
                path: path.to_string(),
                reason: format!("contains forbidden character {ch:?}"),
            });
        }
    }

    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransferOptions::default();
        assert_eq!(options.staging_dir, "/tmp");
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert_eq!(options.operation_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_build_move_command_single() {
        let cmd = build_move_command(&["/tmp/report.xml".to_string()], "/var/results");
        assert_eq!(cmd, "mv '/tmp/report.xml' '/var/results'");
    }

    #[test]
    fn test_build_move_command_chains_with_and() {
        let staged = vec!["/tmp/a.log".to_string(), "/tmp/b.log".to_string()];
        let cmd = build_move_command(&staged, "/data");
        assert_eq!(cmd, "mv '/tmp/a.log' '/data' && mv '/tmp/b.log' '/data'");
    }

    #[test]
    fn test_validate_remote_path_accepts_plain_paths() {
        assert_eq!(validate_remote_path("/var/results").unwrap(), "/var/results");
        assert_eq!(validate_remote_path("report-1.xml").unwrap(), "report-1.xml");
    }

    #[test]
    fn test_validate_remote_path_rejects_metacharacters() {
        for path in ["", "a;b", "a'b", "a`b", "a$b", "a&&b", "a\nb"] {
            assert!(
                matches!(
                    validate_remote_path(path),
                    Err(Error::InvalidRemotePath { .. })
                ),
                "should reject {path:?}"
            );
        }
    }
}
