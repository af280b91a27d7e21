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

//! The shared extension primitive of the link-based reconstructors.
//!
//! A candidate sequence may be extended by a page iff its last element
//! has a qualifying link to that page and the sequence has fan-out
//! budget left. A successful extension freezes the parent and forks a
//! child with a fresh budget.

use serde::{Deserialize, Serialize};
use webtrail_core::{Sequence, Session, Topology};

/// How a qualifying link is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
    /// A directed edge must exist in the site topology.
    Topology,
    /// The page's recorded referrer must equal the candidate's last
    /// element exactly.
    Referrer,
}

/// Shared extension mechanics, parameterized by link mode and the
/// topology-mode fan-out budget.
#[derive(Debug, Clone, Copy)]
pub struct Extender {
    mode: LinkMode,
    max_extension_count: usize,
}

impl Extender {
    pub fn new(mode: LinkMode, max_extension_count: usize) -> Self {
        Self {
            mode,
            max_extension_count,
        }
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Whether `from` qualifies as the referrer of `to` under the
    /// running mode.
    pub fn is_referrer(
        &self,
        topology: &Topology,
        from: &str,
        to: &str,
        session: &Session,
    ) -> bool {
        match self.mode {
            LinkMode::Referrer => session.referrer_of(to) == Some(from),
            LinkMode::Topology => topology.has_link(from, to),
        }
    }

    /// Referrer mode is bounded by referrer ambiguity alone; topology
    /// mode charges the sequence's fan-out budget.
    fn can_extend(&self, sequence: &Sequence) -> bool {
        match self.mode {
            LinkMode::Referrer => true,
            LinkMode::Topology => {
                sequence.number_of_extension() < sequence.out_degree()
                    && sequence.number_of_extension() < self.max_extension_count
            }
        }
    }

    /// Attempts to extend `sequence` with `page`. On success the parent
    /// is frozen (non-maximal, budget charged) and the forked child is
    /// returned.
    pub fn try_extend(
        &self,
        topology: &Topology,
        sequence: &mut Sequence,
        page: &str,
        session: &Session,
    ) -> Option<Sequence> {
        if self.is_referrer(topology, sequence.last(), page, session) && self.can_extend(sequence)
        {
            sequence.mark_extended();
            return Some(sequence.fork(page, topology.out_degree(page)));
        }
        None
    }

    /// A fresh singleton candidate for `page`.
    pub fn seed(&self, topology: &Topology, page: &str) -> Sequence {
        Sequence::with_out_degree(page, topology.out_degree(page))
    }
}
