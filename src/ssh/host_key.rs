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

use std::path::PathBuf;
use std::str::FromStr;

/// How to verify the server's host key when connecting.
///
/// There is no silent bypass: the default verifies against the user's
/// known_hosts file, and accepting unverified hosts requires the caller to
/// opt into [`HostKeyVerification::AcceptAny`] explicitly (the connection
/// then logs a warning).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostKeyVerification {
    /// Verify against `~/.ssh/known_hosts` (fail on unknown or changed keys).
    #[default]
    DefaultKnownHosts,
    /// Verify against a specific known_hosts file.
    KnownHostsFile(PathBuf),
    /// Accept any host key without verification. Callers accept unverified
    /// host identity; use only against trusted networks or test fixtures.
    AcceptAny,
}

impl FromStr for HostKeyVerification {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "no" | "accept-any" | "none" => Self::AcceptAny,
            _ => Self::DefaultKnownHosts,
        })
    }
}
