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

/// Terminal outcome of one host's execution.
///
/// Exactly one of these is produced per submitted host. `error` is set on
/// connect or exec failure, in which case `output` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResult {
    pub hostname: String,
    pub output: Vec<u8>,
    pub error: Option<String>,
}

impl HostResult {
    pub fn success(hostname: String, output: Vec<u8>) -> Self {
        Self {
            hostname,
            output,
            error: None,
        }
    }

    pub fn failure(hostname: String, error: String) -> Self {
        Self {
            hostname,
            output: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert the captured output to a UTF-8 string.
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }

    /// Render the single output line for this host.
    ///
    /// Success lines carry the remote output unmodified, including any
    /// trailing newline the remote command produced. Failure lines end in
    /// exactly one newline.
    pub fn render(&self) -> String {
        match &self.error {
            None => format!("{}: {}", self.hostname, self.output_string()),
            Some(error) => format!("{}: {error}\n", self.hostname),
        }
    }
}
