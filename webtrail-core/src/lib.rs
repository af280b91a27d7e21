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

//! Webtrail Core
//!
//! Fundamental data structures for web-usage mining: the navigational
//! link topology, raw visitor sessions, reconstructed candidate
//! sequences, and mined sequential patterns.

pub mod config;
pub mod error;
pub mod ngram;
pub mod pattern;
pub mod sequence;
pub mod session;
pub mod topology;

pub use config::{
    MiningConfig, PredictionConfig, ReconstructionConfig, DEFAULT_DURATION_THRESHOLD_MINUTES,
    DEFAULT_STEP_PENALTY,
};
pub use error::{Result, WebtrailError};
pub use ngram::ngrams;
pub use pattern::Pattern;
pub use sequence::Sequence;
pub use session::{Session, EXTERNAL_REFERRER};
pub use topology::Topology;

/// Separator between page identifiers in a serialized sequence or pattern.
pub const ITEM_SEPARATOR: char = '-';
