// Copyright 2025 Webtrail (https://github.com/webtrail)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error taxonomy shared by all webtrail crates.
//!
//! Malformed input lines abort processing of the affected line/file;
//! missing files fail the affected pipeline stage only. An empty
//! prediction is a counted outcome, never an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebtrailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log line ({reason}): {line}")]
    MalformedLogLine { reason: &'static str, line: String },

    #[error("malformed topology line: {0}")]
    MalformedTopologyLine(String),

    #[error("malformed pattern line: {0}")]
    MalformedPatternLine(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, WebtrailError>;
