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

//! Minimal INI-section parser for host inventories.
//!
//! Only the subset needed for host lists: `[section]` headers, one value
//! per line, blank lines and `;`/`#` comments skipped. Lines before the
//! first header land in the unnamed section `""`.

use std::collections::HashMap;

/// Parse INI contents into a map of section name to its lines.
pub fn parse_ini(contents: &str) -> HashMap<String, Vec<String>> {
    let mut sections: HashMap<String, Vec<String>> = HashMap::new();
    let mut section_name = String::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section_name = line[1..line.len() - 1].to_string();
            continue;
        }
        sections
            .entry(section_name.clone())
            .or_default()
            .push(line.to_string());
    }

    sections
}
