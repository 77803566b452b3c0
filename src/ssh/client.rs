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

//! High-level per-host executor: connect, run one command, disconnect.

use std::path::Path;
use std::time::Duration;

use super::auth;
use super::connection::Connection;
use super::error::Error;
use super::known_hosts::HostKeyPolicy;

/// Connection parameters shared by every execution against one host.
#[derive(Debug, Clone)]
pub struct ConnectionConfig<'a> {
    pub key_path: &'a Path,
    pub connect_timeout: Duration,
    /// Deadline for the exec phase. `None` means unlimited: a hung remote
    /// command occupies its worker until the command completes.
    pub command_timeout: Option<Duration>,
    pub host_key_policy: &'a HostKeyPolicy,
}

/// SSH client bound to one target host.
pub struct SshClient {
    host: String,
    port: u16,
    username: String,
}

impl SshClient {
    pub fn new(host: String, port: u16, username: String) -> Self {
        Self {
            host,
            port,
            username,
        }
    }

    /// Connect to the host, run exactly one command, and disconnect.
    ///
    /// The connection is released on every exit path, whether the command
    /// succeeded or not. Returns the command's captured stdout.
    pub async fn connect_and_execute(
        &self,
        command: &str,
        config: &ConnectionConfig<'_>,
    ) -> Result<Vec<u8>, Error> {
        tracing::debug!("connecting to {}:{}", self.host, self.port);

        let key = auth::load_private_key(config.key_path)?;
        let connection = Connection::open(
            &self.host,
            self.port,
            &self.username,
            key,
            config.connect_timeout,
            config.host_key_policy,
        )
        .await?;

        tracing::debug!("connected and authenticated to {}", self.host);

        let result = self
            .execute_with_deadline(&connection, command, config.command_timeout)
            .await;
        connection.close().await;
        result
    }

    async fn execute_with_deadline(
        &self,
        connection: &Connection,
        command: &str,
        deadline: Option<Duration>,
    ) -> Result<Vec<u8>, Error> {
        match deadline {
            Some(limit) => tokio::time::timeout(limit, connection.execute(command))
                .await
                .map_err(|_| Error::CommandTimeout(limit.as_secs()))?,
            None => connection.execute(command).await,
        }
    }
}
