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

use std::fmt;

use crate::ssh::{AuthMethod, HostKeyVerification};

pub const DEFAULT_SSH_PORT: u16 = 22;

/// A remote host to operate against, with everything needed to open one
/// authenticated session: address, username, credentials and host-key
/// policy.
///
/// Endpoints are plain values. They are not stored between calls — every
/// remote operation establishes and tears down its own session.
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,
    pub host_key: HostKeyVerification,
}

impl RemoteEndpoint {
    /// Create an endpoint on the default SSH port with the default
    /// (verifying) host-key policy.
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            auth,
            host_key: HostKeyVerification::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the host-key verification policy. The default verifies
    /// against the user's known_hosts file; accepting unverified hosts
    /// requires an explicit [`HostKeyVerification::AcceptAny`].
    pub fn with_host_key_verification(mut self, host_key: HostKeyVerification) -> Self {
        self.host_key = host_key;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let endpoint = RemoteEndpoint::new("example.com", "user", AuthMethod::with_password("pw"));
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, 22);
        assert_eq!(endpoint.username, "user");
        assert_eq!(endpoint.host_key, HostKeyVerification::DefaultKnownHosts);
    }

    #[test]
    fn test_with_port() {
        let endpoint = RemoteEndpoint::new("example.com", "user", AuthMethod::with_password("pw"))
            .with_port(2222);
        assert_eq!(endpoint.address(), "example.com:2222");
    }

    #[test]
    fn test_display() {
        let endpoint = RemoteEndpoint::new("example.com", "admin", AuthMethod::with_password("pw"));
        assert_eq!(endpoint.to_string(), "admin@example.com:22");
    }
}
