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

//! Host list resolution.
//!
//! The host list comes from exactly one of three sources: a comma-separated
//! list, a line-delimited host file, or a section of an INI-style inventory
//! file. Resolution happens before the pool starts; an empty result is an
//! error here, never a silent no-op run.

mod error;
mod ini;

pub use error::HostlistError;
pub use ini::parse_ini;

use std::fs;
use std::path::{Path, PathBuf};

/// Where the host list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    /// Comma-separated hostnames.
    List(String),
    /// One hostname per line.
    File(PathBuf),
    /// Hostnames under `[section]` of an INI-style file.
    IniSection { path: PathBuf, section: String },
}

/// Resolve the ordered host list from its source.
pub fn resolve(source: &HostSource) -> Result<Vec<String>, HostlistError> {
    let hosts = match source {
        HostSource::List(list) => list
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(String::from)
            .collect(),
        HostSource::File(path) => read_host_lines(path)?,
        HostSource::IniSection { path, section } => {
            let contents = read_file(path)?;
            let mut sections = parse_ini(&contents);
            sections
                .remove(section)
                .ok_or_else(|| HostlistError::SectionNotFound {
                    section: section.clone(),
                    path: path.display().to_string(),
                })?
        }
    };

    if hosts.is_empty() {
        return Err(HostlistError::Empty);
    }
    Ok(hosts)
}

fn read_file(path: &Path) -> Result<String, HostlistError> {
    fs::read_to_string(path).map_err(|err| HostlistError::FileRead {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn read_host_lines(path: &Path) -> Result<Vec<String>, HostlistError> {
    Ok(read_file(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
