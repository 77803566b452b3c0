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

//! Host key verification policies.
//!
//! The default policy checks presented host keys against the user's
//! known_hosts file. Accepting any host key (`trust-all`) is available but
//! must be requested explicitly on the command line.

use directories::BaseDirs;
use std::path::PathBuf;
use std::str::FromStr;

/// How a server's host key is verified during connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Accept any presented host key. Insecure; explicit opt-in only.
    TrustAll,
    /// Check against the default known_hosts file (`~/.ssh/known_hosts`).
    #[default]
    KnownHosts,
    /// Check against a specific known_hosts file.
    KnownHostsFile(PathBuf),
    /// Check against one pinned base64-encoded public key.
    PinnedKey(String),
}

/// Get the default known_hosts file path.
pub fn default_known_hosts_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".ssh").join("known_hosts"))
}

impl FromStr for HostKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "trust-all" {
            return Ok(Self::TrustAll);
        }
        if s == "known-hosts" {
            return Ok(Self::KnownHosts);
        }
        if let Some(path) = s.strip_prefix("known-hosts:") {
            if path.is_empty() {
                return Err("known-hosts: requires a file path".to_string());
            }
            return Ok(Self::KnownHostsFile(PathBuf::from(path)));
        }
        if let Some(key) = s.strip_prefix("pinned:") {
            if key.is_empty() {
                return Err("pinned: requires a base64 public key".to_string());
            }
            return Ok(Self::PinnedKey(key.to_string()));
        }
        Err(format!(
            "unknown host key policy '{s}' (expected trust-all, known-hosts, known-hosts:<path>, or pinned:<base64>)"
        ))
    }
}
