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

//! Error types for the remote executor.
//!
//! Every variant maps to one failure point of a single host's execution:
//! key loading, address resolution, transport/auth, the exec channel, or
//! the remote command itself. None of these abort the run as a whole.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The private key file could not be read or parsed.
    #[error("invalid or unreadable private key: {0}")]
    KeyInvalid(#[source] russh::keys::Error),

    /// The server rejected public-key authentication.
    #[error("key authentication failed")]
    KeyAuthFailed,

    /// The hostname did not resolve to any usable address.
    #[error("unable to resolve address: {0}")]
    AddressInvalid(#[source] std::io::Error),

    /// The transport connection did not complete within the connect timeout.
    #[error("connection timed out after {0}s")]
    ConnectTimeout(u64),

    /// The presented host key failed the configured verification policy.
    #[error("host key verification failed")]
    HostKeyUnverified,

    /// Any protocol-level failure reported by the SSH implementation.
    #[error("ssh error: {0}")]
    Ssh(#[from] russh::Error),

    /// The exec channel closed without ever reporting an exit status.
    #[error("remote command did not report an exit status")]
    CommandDidntExit,

    /// The command deadline elapsed before the remote command completed.
    #[error("command timed out after {0}s")]
    CommandTimeout(u64),

    /// The remote command ran but exited non-zero.
    #[error("remote command exited with status {exit_status}{}", stderr_suffix(.stderr))]
    CommandFailed { exit_status: u32, stderr: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
