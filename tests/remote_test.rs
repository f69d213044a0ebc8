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

//! Failure-contract tests for the remote operations.
//!
//! No real SSH server is involved: these tests pin down the typed errors the
//! remote surface must produce on local validation failures, refused
//! connections and unresponsive servers — the paths the original
//! implementation used to swallow into log lines.

use std::time::Duration;

use rigkit::{
    download, execute, upload, AuthMethod, Error, ExecOptions, HostKeyVerification,
    RemoteEndpoint, TransferOptions,
};

fn test_endpoint(host: &str, port: u16) -> RemoteEndpoint {
    RemoteEndpoint::new(host, "tester", AuthMethod::with_password("secret"))
        .with_port(port)
        .with_host_key_verification(HostKeyVerification::AcceptAny)
}

fn quick_transfer_options() -> TransferOptions {
    TransferOptions {
        connect_timeout: Duration::from_secs(2),
        operation_timeout: Some(Duration::from_secs(2)),
        ..TransferOptions::default()
    }
}

#[tokio::test]
async fn test_upload_missing_local_file_fails_before_connecting() {
    // The host is unresolvable; reaching the network would fail differently,
    // so a NotFound here proves validation runs first.
    let endpoint = test_endpoint("host.invalid", 22);
    let err = upload(
        &["/definitely/not/here.txt"],
        "/var/results",
        &endpoint,
        &quick_transfer_options(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "got {err}");
}

#[tokio::test]
async fn test_upload_rejects_hostile_destination_path() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let file = temp_dir.path().join("report.xml");
    std::fs::write(&file, "<suite/>").unwrap();

    let endpoint = test_endpoint("host.invalid", 22);
    let err = upload(
        &[&file],
        "/var/results'; rm -rf /",
        &endpoint,
        &quick_transfer_options(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::InvalidRemotePath { .. }), "got {err}");
}

#[tokio::test]
async fn test_upload_empty_file_list_is_a_noop() {
    let endpoint = test_endpoint("host.invalid", 22);
    let files: [&str; 0] = [];
    upload(&files, "/var/results", &endpoint, &quick_transfer_options())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_execute_refused_connection_is_typed_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = test_endpoint("127.0.0.1", port);
    let options = ExecOptions {
        connect_timeout: Duration::from_secs(5),
        ..ExecOptions::default()
    };

    let err = execute(&endpoint, "echo ok", &options).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err}");
}

#[tokio::test]
async fn test_execute_times_out_against_silent_server() {
    // A TCP server that accepts connections but never speaks SSH: the
    // connect deadline must fire instead of hanging forever.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        }
    });

    let endpoint = test_endpoint("127.0.0.1", port);
    let options = ExecOptions {
        connect_timeout: Duration::from_secs(1),
        command_timeout: Some(Duration::from_secs(1)),
    };

    let err = execute(&endpoint, "echo ok", &options).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got {err}");
}

#[tokio::test]
async fn test_download_refused_connection_is_typed_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let temp_dir = tempfile::TempDir::new().unwrap();
    let endpoint = test_endpoint("127.0.0.1", port);

    let err = download(
        "/etc/hostname",
        temp_dir.path().join("fetched"),
        &endpoint,
        &quick_transfer_options(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err}");
}

#[test]
fn test_endpoint_defaults_are_safe() {
    let endpoint = RemoteEndpoint::new("example.com", "user", AuthMethod::with_password("pw"));
    assert_eq!(endpoint.port, 22);
    assert_eq!(endpoint.host_key, HostKeyVerification::DefaultKnownHosts);
}
