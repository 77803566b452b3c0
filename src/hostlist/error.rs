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

//! Error types for host list resolution.

use thiserror::Error;

/// Errors that can occur while resolving the host list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostlistError {
    /// The source resolved to zero hosts.
    #[error("no hosts resolved from the given source")]
    Empty,

    /// The host or INI file could not be read.
    #[error("failed to read host file '{path}': {reason}")]
    FileRead { path: String, reason: String },

    /// The requested INI section does not exist in the file.
    #[error("section '{section}' not found in '{path}'")]
    SectionNotFound { section: String, path: String },
}
