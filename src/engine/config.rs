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
use std::time::Duration;

use crate::ssh::HostKeyPolicy;

/// Default transport connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 20;

/// Everything a worker needs to execute the command on one host.
///
/// Built once before the pool starts and shared read-only by all workers;
/// no worker mutates it. The command stored here is final — sudo wrapping
/// has already been applied if it was requested.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub user: String,
    pub key_path: PathBuf,
    pub command: String,
    pub port: u16,
    pub connect_timeout: Duration,
    /// `None` = unlimited, matching the tool's historical behavior.
    pub command_timeout: Option<Duration>,
    pub host_key_policy: HostKeyPolicy,
}

/// Wrap a command so it runs as root on the remote side.
///
/// Applied exactly once, before the pool starts — never per worker.
pub fn wrap_sudo(command: &str) -> String {
    format!("sudo su - root -c '{command}'")
}
