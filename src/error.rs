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

//! Error types shared by every helper in this crate.
//!
//! All public operations return [`Result`]. Failures always surface to the
//! immediate caller as one of these variants; nothing is logged-and-swallowed
//! and nothing retries.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by file, process and remote operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A local file, directory or bundled resource does not exist.
    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// A local I/O operation failed on the given path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The remote address could not be resolved.
    #[error("invalid address: {0}")]
    AddressInvalid(#[source] io::Error),

    /// The server rejected the supplied credentials.
    #[error("authentication failed for {user}@{host}: {reason}")]
    AuthenticationFailed {
        user: String,
        host: String,
        reason: String,
    },

    /// A private key file could not be read or decoded.
    #[error("invalid private key {}: {source}", .path.display())]
    KeyInvalid {
        path: PathBuf,
        #[source]
        source: russh::keys::Error,
    },

    /// The server's host key failed verification against the configured policy.
    #[error("host key verification failed for {host}:{port}")]
    HostKeyRejected { host: String, port: u16 },

    /// SSH transport error from russh.
    #[error("SSH transport error: {0}")]
    Transport(#[from] russh::Error),

    /// SFTP protocol error from russh-sftp.
    #[error("SFTP error: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),

    /// A remote path was rejected before being spliced into a shell command.
    #[error("invalid remote path '{path}': {reason}")]
    InvalidRemotePath { path: String, reason: String },

    /// A connect or command deadline expired.
    #[error("{operation} timed out after {}s", .timeout.as_secs())]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// A local wait ended without the process reporting an exit status.
    #[error("interrupted while waiting for {operation}")]
    Interrupted { operation: String },

    /// An internally-issued remote command exited with a non-zero status.
    #[error("remote command failed with exit status {exit_status}: {command}")]
    CommandFailed {
        command: String,
        exit_status: u32,
        stderr: String,
    },

    /// The exec channel closed before the remote side reported an exit status.
    #[error("channel closed before reporting an exit status")]
    ChannelClosed,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Result type used by every public operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;
