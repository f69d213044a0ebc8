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

//! Remote operations: one-shot command execution and staged file transfer.
//! Each call opens its own session against the endpoint and tears it down
//! again — no reuse or pooling across calls.

pub mod exec;
pub mod transfer;

pub use exec::{execute, ExecOptions};
pub use transfer::{download, upload, upload_file, TransferOptions};

// Timeout defaults shared by the remote operations:
// - 30s connect accommodates slow networks and SSH negotiation
// - 300s operation handles long-running commands and large transfers while
//   still detecting truly hung remotes
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 300;
