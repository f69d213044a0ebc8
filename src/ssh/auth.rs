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

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

/// Credentials for authenticating a session.
///
/// Passwords and key passphrases are held in [`Zeroizing`] wrappers so they
/// are wiped from memory on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthMethod {
    Password(Zeroizing<String>),
    PrivateKeyFile {
        key_file_path: PathBuf,
        key_pass: Option<Zeroizing<String>>,
    },
}

impl AuthMethod {
    /// Convenience constructor for password authentication.
    pub fn with_password(password: &str) -> Self {
        Self::Password(Zeroizing::new(password.to_string()))
    }

    /// Convenience constructor for private-key-file authentication.
    pub fn with_key_file<T: AsRef<Path>>(key_file_path: T, passphrase: Option<&str>) -> Self {
        Self::PrivateKeyFile {
            key_file_path: key_file_path.as_ref().to_path_buf(),
            key_pass: passphrase.map(|p| Zeroizing::new(p.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_password() {
        let auth = AuthMethod::with_password("secret");
        match auth {
            AuthMethod::Password(pw) => assert_eq!(&**pw, "secret"),
            _ => panic!("expected Password auth method"),
        }
    }

    #[test]
    fn test_with_key_file() {
        let auth = AuthMethod::with_key_file("/home/user/.ssh/id_ed25519", Some("phrase"));
        match auth {
            AuthMethod::PrivateKeyFile {
                key_file_path,
                key_pass,
            } => {
                assert_eq!(key_file_path, PathBuf::from("/home/user/.ssh/id_ed25519"));
                assert_eq!(key_pass.as_deref().map(String::as_str), Some("phrase"));
            }
            _ => panic!("expected PrivateKeyFile auth method"),
        }
    }
}
