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

use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

use sshp::{
    cli::Cli,
    config::{expand_tilde, Settings},
    engine::{wrap_sudo, Engine, ExecutionConfig},
    hostlist,
    ssh::{known_hosts, HostKeyPolicy},
    utils::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = cli.host_source()?;
    let hosts = hostlist::resolve(&source)?;

    let settings = Settings::load(&cli.config).await?;

    // CLI flags take precedence over settings-file values.
    let Some(user) = cli.user.clone().or(settings.user) else {
        bail!("no user given; use --user or set 'user' in the settings file");
    };
    let Some(key_path) = cli.identity.clone().or(settings.ssh_key_path) else {
        bail!("no ssh key given; use --identity or set 'ssh_key_path' in the settings file");
    };
    let key_path = expand_tilde(&key_path);
    if !key_path.is_file() {
        bail!(
            "ssh key '{}' is not readable or does not exist",
            key_path.display()
        );
    }

    let command = cli.command_string();
    if command.trim().is_empty() {
        bail!("no command given");
    }
    let command = if cli.sudo {
        wrap_sudo(&command)
    } else {
        command
    };

    if cli.host_key_policy == HostKeyPolicy::KnownHosts {
        let known_hosts_exists = known_hosts::default_known_hosts_path()
            .map(|path| path.exists())
            .unwrap_or(false);
        if !known_hosts_exists {
            tracing::warn!(
                "no known_hosts file found; host key verification will fail (see --host-key-policy)"
            );
        }
    }

    tracing::info!("executing on {} hosts: {}", hosts.len(), command);

    let config = ExecutionConfig {
        user,
        key_path,
        command,
        port: cli.port,
        connect_timeout: Duration::from_secs(cli.connect_timeout),
        command_timeout: (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)),
        host_key_policy: cli.host_key_policy.clone(),
    };

    let engine = Engine::new(config).with_worker_count(cli.parallel);
    engine
        .run(hosts, |result| print!("{}", result.render()))
        .await;

    Ok(())
}
