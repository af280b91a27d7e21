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

//! Webtrail Session Reconstruction
//!
//! Five link-based algorithms turn one raw, possibly-gapped click
//! sequence into one or more maximal candidate navigation paths
//! consistent with the site's hyperlink graph. The variants share one
//! contract (`Reconstruct`) and one extension primitive; they differ in
//! termination and branching policy.

pub mod complete_sra;
pub mod extension;
pub mod integer_programming;
pub mod logs;
pub mod navigation_oriented;
pub mod pipeline;
pub mod simple;
pub mod smart_sra;
pub mod time_oriented;
pub mod tracker;

pub use complete_sra::CompleteSra;
pub use extension::{Extender, LinkMode};
pub use integer_programming::IntegerProgramming;
pub use logs::{LogParser, LogRecord};
pub use navigation_oriented::NavigationOriented;
pub use pipeline::ReconstructionPipeline;
pub use simple::is_simple_session;
pub use smart_sra::SmartSra;
pub use time_oriented::TimeOriented;
pub use tracker::SessionTracker;

use serde::{Deserialize, Serialize};
use webtrail_core::{Sequence, Session, Topology};

/// Common contract of the reconstruction family.
///
/// Implementations return every accepted maximal sequence, each tagged
/// with the caller-supplied penalty. When `skip_trivial` is set,
/// sessions that are already a straight-line path on the graph are
/// skipped by algorithms that only add value on branching input.
pub trait Reconstruct {
    fn reconstruct(
        &mut self,
        topology: &Topology,
        session: &Session,
        penalty: f32,
        skip_trivial: bool,
    ) -> Vec<Sequence>;
}

/// The closed set of reconstruction strategies, selected at
/// configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    TimeOriented,
    NavigationOriented,
    SmartSra,
    CompleteSra,
    IntegerProgramming,
}

impl Algorithm {
    /// Short label used in evaluation reports.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::TimeOriented => "TO",
            Algorithm::NavigationOriented => "NO",
            Algorithm::SmartSra => "SmartSRA",
            Algorithm::CompleteSra => "CSRA",
            Algorithm::IntegerProgramming => "IP",
        }
    }

    /// Builds the strategy object for this variant.
    pub fn build(self, mode: LinkMode, max_extension_count: usize) -> Box<dyn Reconstruct> {
        match self {
            Algorithm::TimeOriented => Box::new(TimeOriented::new()),
            Algorithm::NavigationOriented => Box::new(NavigationOriented::new()),
            Algorithm::SmartSra => Box::new(SmartSra::new(mode)),
            Algorithm::CompleteSra => Box::new(CompleteSra::new(mode, max_extension_count)),
            Algorithm::IntegerProgramming => {
                Box::new(IntegerProgramming::new(mode, max_extension_count))
            }
        }
    }
}
