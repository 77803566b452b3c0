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

//! SSH connection establishment and single-command execution.
//!
//! A [`Connection`] is owned by exactly one worker for the duration of one
//! host's processing. It is opened, used for one exec channel, and closed;
//! connections are never pooled or reused across hosts.

use russh::client::{Config, Handle, Handler};
use russh::ChannelMsg;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use super::auth;
use super::error::Error;
use super::known_hosts::HostKeyPolicy;

/// One SSH connection to a single host.
pub struct Connection {
    handle: Handle<ClientHandler>,
}

impl Connection {
    /// Open a transport connection, verify the host key per policy, and
    /// authenticate with the given private key.
    ///
    /// When the hostname resolves to multiple addresses, each is tried in
    /// turn until one connects; authentication happens once, on the first
    /// successful transport.
    pub async fn open(
        hostname: &str,
        port: u16,
        username: &str,
        key: russh::keys::PrivateKey,
        connect_timeout: Duration,
        policy: &HostKeyPolicy,
    ) -> Result<Self, Error> {
        let config = Arc::new(Config::default());
        let addrs: Vec<SocketAddr> = (hostname, port)
            .to_socket_addrs()
            .map_err(Error::AddressInvalid)?
            .collect();

        let mut connect_res = Err(Error::AddressInvalid(io::Error::new(
            io::ErrorKind::InvalidInput,
            "could not resolve to any addresses",
        )));
        for addr in addrs {
            let handler = ClientHandler {
                hostname: hostname.to_string(),
                port,
                policy: policy.clone(),
            };
            match tokio::time::timeout(
                connect_timeout,
                russh::client::connect(config.clone(), addr, handler),
            )
            .await
            {
                Ok(Ok(handle)) => {
                    connect_res = Ok(handle);
                    break;
                }
                Ok(Err(e)) => connect_res = Err(e),
                Err(_) => connect_res = Err(Error::ConnectTimeout(connect_timeout.as_secs())),
            }
        }
        let mut handle = connect_res?;

        auth::authenticate(&mut handle, username, key).await?;

        Ok(Self { handle })
    }

    /// Run one command over a fresh exec channel and capture its output.
    ///
    /// The channel is drained until it closes; an exit status message may
    /// arrive before the last data message, so neither ends the loop early.
    /// A non-zero exit status is reported as [`Error::CommandFailed`].
    pub async fn execute(&self, command: &str) -> Result<Vec<u8>, Error> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut exit_status: Option<u32> = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == 1 => {
                    stderr.extend_from_slice(data)
                }
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        match exit_status {
            Some(0) => Ok(stdout),
            Some(code) => Err(Error::CommandFailed {
                exit_status: code,
                stderr: String::from_utf8_lossy(&stderr).to_string(),
            }),
            None => Err(Error::CommandDidntExit),
        }
    }

    /// Disconnect from the remote host. Failures are ignored: the handle is
    /// dropped either way and the transport torn down.
    pub async fn close(&self) {
        let _ = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await;
    }
}

/// Client-side handler; its only real job is host key verification.
#[derive(Debug, Clone)]
struct ClientHandler {
    hostname: String,
    port: u16,
    policy: HostKeyPolicy,
}

impl Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        match &self.policy {
            HostKeyPolicy::TrustAll => Ok(true),
            HostKeyPolicy::PinnedKey(key) => {
                let pinned = russh::keys::parse_public_key_base64(key)
                    .map_err(|_| Error::HostKeyUnverified)?;
                Ok(pinned == *server_public_key)
            }
            HostKeyPolicy::KnownHosts => {
                russh::keys::check_known_hosts(&self.hostname, self.port, server_public_key)
                    .map_err(|_| Error::HostKeyUnverified)
            }
            HostKeyPolicy::KnownHostsFile(path) => russh::keys::check_known_hosts_path(
                &self.hostname,
                self.port,
                server_public_key,
                path,
            )
            .map_err(|_| Error::HostKeyUnverified),
        }
    }
}
