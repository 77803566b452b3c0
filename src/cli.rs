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
use std::path::PathBuf;

use crate::engine::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_WORKER_COUNT};
use crate::hostlist::HostSource;
use crate::ssh::HostKeyPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "sshp",
    version,
    about = "Parallel command execution over SSH",
    long_about = "sshp executes a single shell command concurrently across a fleet of hosts.\nConcurrency is bounded by a fixed worker pool; each host's failure is isolated\nand its outcome reported as it completes, one line per host.",
    after_help = "EXAMPLES:\n  Comma-separated hosts:   sshp -H web1,web2 -u ops -i ~/.ssh/id_ed25519 uptime\n  Host file:               sshp -f hosts.txt -u ops -i ~/.ssh/id_ed25519 \"df -h\"\n  INI inventory section:   sshp --ini-file fleet.ini --ini-section web \"uptime\"\n  Become root per host:    sshp -H web1,web2 -s \"systemctl restart nginx\""
)]
pub struct Cli {
    #[arg(
        short = 'H',
        long,
        help = "Comma-separated list of hosts to execute on"
    )]
    pub hosts: Option<String>,

    #[arg(short = 'f', long, help = "Host file to use, one hostname per line")]
    pub host_file: Option<PathBuf>,

    #[arg(long, help = "INI-style inventory file (requires --ini-section)")]
    pub ini_file: Option<PathBuf>,

    #[arg(long, help = "Inventory section holding the host list")]
    pub ini_section: Option<String>,

    #[arg(short = 'u', long, help = "User to log in as")]
    pub user: Option<String>,

    #[arg(short = 'i', long, help = "SSH private key file path")]
    pub identity: Option<PathBuf>,

    #[arg(
        long,
        default_value = "/etc/sshp.conf",
        help = "Settings file with default user and ssh_key_path"
    )]
    pub config: PathBuf,

    #[arg(
        short = 'p',
        long,
        default_value_t = DEFAULT_WORKER_COUNT,
        help = "Maximum parallel connections"
    )]
    pub parallel: usize,

    #[arg(long, default_value_t = 22, help = "SSH port on the remote hosts")]
    pub port: u16,

    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        help = "Connection timeout in seconds"
    )]
    pub connect_timeout: u64,

    #[arg(
        long,
        default_value_t = 0,
        help = "Command timeout in seconds (0 for unlimited)"
    )]
    pub timeout: u64,

    #[arg(short = 's', long, help = "Use sudo to become root on hosts")]
    pub sudo: bool,

    #[arg(
        long,
        default_value = "known-hosts",
        help = "Host key verification policy\n  known-hosts        - check ~/.ssh/known_hosts (default)\n  known-hosts:<path> - check a specific known_hosts file\n  pinned:<base64>    - accept exactly one pinned public key\n  trust-all          - accept any host key (insecure)"
    )]
    pub host_key_policy: HostKeyPolicy,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv); diagnostics go to stderr"
    )]
    pub verbose: u8,

    #[arg(trailing_var_arg = true, help = "Command to execute on remote hosts")]
    pub command: Vec<String>,
}

impl Cli {
    /// Pick the host source from the mutually exclusive flags.
    pub fn host_source(&self) -> Result<HostSource> {
        match (
            &self.hosts,
            &self.host_file,
            &self.ini_file,
            &self.ini_section,
        ) {
            (Some(list), None, None, None) => Ok(HostSource::List(list.clone())),
            (None, Some(path), None, None) => Ok(HostSource::File(path.clone())),
            (None, None, Some(path), Some(section)) => Ok(HostSource::IniSection {
                path: path.clone(),
                section: section.clone(),
            }),
            (None, None, Some(_), None) => bail!("--ini-file requires --ini-section"),
            (None, None, None, Some(_)) => bail!("--ini-section requires --ini-file"),
            (None, None, None, None) => {
                bail!("no hosts were given; use --hosts, --host-file, or --ini-file with --ini-section")
            }
            _ => bail!("--hosts, --host-file, and --ini-file are mutually exclusive"),
        }
    }

    /// The command words joined back into one shell command string.
    pub fn command_string(&self) -> String {
        self.command.join(" ")
    }
}
