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

//! Thin session wrapper over russh: connect, authenticate, run a command,
//! open an SFTP channel, disconnect. Pass-through glue with typed errors —
//! no pooling, no retries, no protocol logic of its own.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{Config, Handle, Handler};
use russh::{ChannelMsg, Disconnect};
use russh_sftp::client::SftpSession;

use crate::endpoint::RemoteEndpoint;
use crate::error::{Error, Result};
use crate::ssh::auth::AuthMethod;
use crate::ssh::host_key::HostKeyVerification;

/// Captured result of a remote command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The stdout output of the command.
    pub stdout: String,
    /// The stderr output of the command.
    pub stderr: String,
    /// The unix exit status (`$?` in bash).
    pub exit_status: u32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// An authenticated SSH session to a single remote host.
///
/// Created by [`Client::connect`], used for the duration of one operation
/// and then [`Client::disconnect`]ed. Not reused across operations.
pub struct Client {
    handle: Handle<ClientHandler>,
    endpoint: String,
}

impl Client {
    /// Open and authenticate a session to `endpoint`, bounded by
    /// `connect_timeout`.
    ///
    /// Resolution, TCP connect, host-key verification and authentication all
    /// count against the timeout. Authentication failures surface as
    /// [`Error::AuthenticationFailed`] (or [`Error::KeyInvalid`] when the
    /// key file itself cannot be loaded).
    pub async fn connect(endpoint: &RemoteEndpoint, connect_timeout: Duration) -> Result<Self> {
        tracing::debug!("connecting to {}", endpoint);
        match tokio::time::timeout(connect_timeout, Self::connect_inner(endpoint)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation: format!("connecting to {endpoint}"),
                timeout: connect_timeout,
            }),
        }
    }

    async fn connect_inner(endpoint: &RemoteEndpoint) -> Result<Self> {
        let config = Arc::new(Config::default());

        let addrs = tokio::net::lookup_host((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(Error::AddressInvalid)?;

        let mut connect_res: Result<Handle<ClientHandler>> =
            Err(Error::AddressInvalid(io::Error::new(
                io::ErrorKind::InvalidInput,
                "could not resolve to any addresses",
            )));
        for addr in addrs {
            let handler = ClientHandler {
                hostname: endpoint.host.clone(),
                port: endpoint.port,
                verification: endpoint.host_key.clone(),
            };
            match russh::client::connect(config.clone(), addr, handler).await {
                Ok(handle) => {
                    connect_res = Ok(handle);
                    break;
                }
                Err(e) => connect_res = Err(e),
            }
        }
        let mut handle = connect_res?;

        Self::authenticate(&mut handle, endpoint).await?;
        tracing::debug!("connected and authenticated to {}", endpoint);

        Ok(Self {
            handle,
            endpoint: endpoint.to_string(),
        })
    }

    async fn authenticate(handle: &mut Handle<ClientHandler>, endpoint: &RemoteEndpoint) -> Result<()> {
        match &endpoint.auth {
            AuthMethod::Password(password) => {
                let auth_res = handle
                    .authenticate_password(&endpoint.username, &**password)
                    .await?;
                if !auth_res.success() {
                    return Err(Error::AuthenticationFailed {
                        user: endpoint.username.clone(),
                        host: endpoint.host.clone(),
                        reason: "password rejected".to_string(),
                    });
                }
            }
            AuthMethod::PrivateKeyFile {
                key_file_path,
                key_pass,
            } => {
                let key = russh::keys::load_secret_key(
                    key_file_path,
                    key_pass.as_ref().map(|p| &***p),
                )
                .map_err(|e| Error::KeyInvalid {
                    path: key_file_path.clone(),
                    source: e,
                })?;
                let auth_res = handle
                    .authenticate_publickey(
                        &endpoint.username,
                        russh::keys::PrivateKeyWithHashAlg::new(
                            Arc::new(key),
                            handle.best_supported_rsa_hash().await?.flatten(),
                        ),
                    )
                    .await?;
                if !auth_res.success() {
                    return Err(Error::AuthenticationFailed {
                        user: endpoint.username.clone(),
                        host: endpoint.host.clone(),
                        reason: "private key rejected".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Execute a remote command, optionally bounded by `timeout`
    /// (`None` = unlimited).
    ///
    /// Waits on channel messages until the remote side closes the channel —
    /// an event-driven wait, not polling. Returns stdout, stderr and the
    /// exit status; a non-zero status is reported in the output, not as an
    /// error. Every invocation is a new shell context.
    pub async fn execute(&self, command: &str, timeout: Option<Duration>) -> Result<CommandOutput> {
        match timeout {
            Some(t) => match tokio::time::timeout(t, self.run_command(command)).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    operation: format!("command on {}", self.endpoint),
                    timeout: t,
                }),
            },
            None => self.run_command(command).await,
        }
    }

    async fn run_command(&self, command: &str) -> Result<CommandOutput> {
        tracing::debug!("executing on {}: {}", self.endpoint, command);

        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status: Option<u32> = None;

        // Drain messages until the channel closes. An ExitStatus message is
        // not the end of communications; data may still follow it.
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == 1 => {
                    stderr.extend_from_slice(data)
                }
                ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
                _ => {}
            }
        }

        match exit_status {
            Some(exit_status) => Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&stdout).to_string(),
                stderr: String::from_utf8_lossy(&stderr).to_string(),
                exit_status,
            }),
            None => Err(Error::ChannelClosed),
        }
    }

    /// Open an SFTP channel over this session.
    ///
    /// The remote sshd must have the sftp subsystem enabled
    /// (`Subsystem sftp internal-sftp` or equivalent).
    pub async fn sftp_session(&self) -> Result<SftpSession> {
        let channel = self.handle.channel_open_session().await?;
        channel.request_subsystem(true, "sftp").await?;
        Ok(SftpSession::new(channel.into_stream()).await?)
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "")
            .await?;
        Ok(())
    }
}

/// Per-connection handler carrying the host-key verification policy.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    hostname: String,
    port: u16,
    verification: HostKeyVerification,
}

impl Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool> {
        match &self.verification {
            HostKeyVerification::AcceptAny => {
                tracing::warn!(
                    "host key verification disabled for {}:{}; accepting unverified host key",
                    self.hostname,
                    self.port
                );
                Ok(true)
            }
            HostKeyVerification::DefaultKnownHosts => {
                russh::keys::check_known_hosts(&self.hostname, self.port, server_public_key)
                    .map_err(|_| Error::HostKeyRejected {
                        host: self.hostname.clone(),
                        port: self.port,
                    })
            }
            HostKeyVerification::KnownHostsFile(path) => russh::keys::check_known_hosts_path(
                &self.hostname,
                self.port,
                server_public_key,
                path,
            )
            .map_err(|_| Error::HostKeyRejected {
                host: self.hostname.clone(),
                port: self.port,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_success() {
        let output = CommandOutput {
            stdout: "ok\n".to_string(),
            stderr: String::new(),
            exit_status: 0,
        };
        assert!(output.success());

        let failed = CommandOutput {
            exit_status: 3,
            ..output
        };
        assert!(!failed.success());
    }
}
