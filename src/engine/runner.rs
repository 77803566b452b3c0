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

use anyhow::Result;
use async_trait::async_trait;

use super::config::ExecutionConfig;
use crate::ssh::{ConnectionConfig, SshClient};

/// The seam between the worker pool and remote execution.
///
/// The pool only depends on this trait; tests substitute scripted
/// implementations to exercise the queue and aggregation machinery without
/// a network.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the configured command on one host, returning captured stdout.
    async fn run(&self, hostname: &str, config: &ExecutionConfig) -> Result<Vec<u8>>;
}

/// Production runner: one SSH connection per invocation, never reused.
pub struct SshCommandRunner;

#[async_trait]
impl CommandRunner for SshCommandRunner {
    async fn run(&self, hostname: &str, config: &ExecutionConfig) -> Result<Vec<u8>> {
        let client = SshClient::new(hostname.to_string(), config.port, config.user.clone());
        let connection_config = ConnectionConfig {
            key_path: &config.key_path,
            connect_timeout: config.connect_timeout,
            command_timeout: config.command_timeout,
            host_key_policy: &config.host_key_policy,
        };
        Ok(client
            .connect_and_execute(&config.command, &connection_config)
            .await?)
    }
}
