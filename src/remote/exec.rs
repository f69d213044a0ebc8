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

//! One-shot remote command execution.

use std::time::Duration;

use crate::endpoint::RemoteEndpoint;
use crate::error::Result;
use crate::ssh::{Client, CommandOutput};

use super::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_OPERATION_TIMEOUT_SECS};

/// Timeouts for a single [`execute`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Deadline for resolving, connecting and authenticating.
    pub connect_timeout: Duration,
    /// Deadline for the command itself; `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            command_timeout: Some(Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)),
        }
    }
}

/// Execute a single command on `endpoint` and return its captured output.
///
/// Opens an authenticated session, runs the command on an exec channel,
/// waits (event-driven, bounded by `options.command_timeout`) until the
/// channel closes, disconnects, and returns stdout, stderr and the exit
/// status. A non-zero exit status is reported in the returned
/// [`CommandOutput`], not as an error — callers inspect it.
pub async fn execute(
    endpoint: &RemoteEndpoint,
    command: &str,
    options: &ExecOptions,
) -> Result<CommandOutput> {
    let client = Client::connect(endpoint, options.connect_timeout).await?;
    let result = client.execute(command, options.command_timeout).await;

    // Session teardown is best-effort; the command result stands either way.
    if let Err(e) = client.disconnect().await {
        tracing::debug!("disconnect from {} failed: {}", endpoint, e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExecOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert_eq!(options.command_timeout, Some(Duration::from_secs(300)));
    }
}
