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

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::types::Settings;
use super::utils::expand_tilde;

impl Settings {
    /// Load settings from a `key = value` file.
    ///
    /// A missing file is not an error — defaults apply and the command
    /// line must supply whatever is needed.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        if !expanded_path.exists() {
            tracing::debug!(
                "settings file not found at {:?}, using defaults",
                expanded_path
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| format!("failed to read settings file {expanded_path:?}"))?;

        Ok(Self::parse(&contents))
    }

    /// Parse `key = value` lines. Unknown keys are ignored; blank lines
    /// and `#`/`;` comments are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut settings = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "user" => settings.user = Some(value.to_string()),
                "ssh_key_path" => settings.ssh_key_path = Some(PathBuf::from(value)),
                other => {
                    tracing::debug!(key = other, "ignoring unknown settings key");
                }
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_and_key_path() {
        let settings = Settings::parse("user = ops\nssh_key_path = /home/ops/.ssh/id_ed25519\n");
        assert_eq!(settings.user.as_deref(), Some("ops"));
        assert_eq!(
            settings.ssh_key_path,
            Some(PathBuf::from("/home/ops/.ssh/id_ed25519"))
        );
    }

    #[test]
    fn test_parse_skips_comments_and_unknown_keys() {
        let settings = Settings::parse("# a comment\n; another\ncolor = red\nuser=ops\n");
        assert_eq!(settings.user.as_deref(), Some("ops"));
        assert_eq!(settings.ssh_key_path, None);
    }

    #[test]
    fn test_parse_empty_contents_gives_defaults() {
        assert_eq!(Settings::parse(""), Settings::default());
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/sshp.conf"))
            .await
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sshp.conf");
        std::fs::write(&path, "user = deploy\n").unwrap();

        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.user.as_deref(), Some("deploy"));
    }
}
