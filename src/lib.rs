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

//! Small, independent helpers for test-automation rigs: text file access,
//! local process execution, and SSH/SFTP remote operations powered by russh.
//!
//! Every public operation is a single self-contained call. Remote operations
//! open their own session, run to completion (bounded by explicit timeouts)
//! and tear the session down again; nothing is cached, pooled or retried.

pub mod endpoint;
pub mod error;
pub mod fs;
pub mod logging;
pub mod process;
pub mod remote;
pub mod ssh;

pub use endpoint::RemoteEndpoint;
pub use error::{Error, Result};
pub use remote::{download, execute, upload, upload_file, ExecOptions, TransferOptions};
pub use ssh::{AuthMethod, CommandOutput, HostKeyVerification};
