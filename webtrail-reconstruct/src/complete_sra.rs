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

//! Complete session reconstruction: exhaustive branch enumeration.
//!
//! A single forward pass over the session attempts to extend every
//! currently-maximal candidate with each page; pages that extend
//! nothing start a new singleton. The branch count is exponential in
//! ambiguous fan-out and is capped per sequence by the extension
//! budget. Length and per-session maximal-count histograms are kept for
//! diagnostics.

use crate::{extension::Extender, simple::is_simple_session, LinkMode, Reconstruct};
use std::collections::HashMap;
use webtrail_core::{Sequence, Session, Topology};

#[derive(Debug)]
pub struct CompleteSra {
    extender: Extender,
    length_histogram: HashMap<usize, u64>,
    sequence_count_histogram: HashMap<usize, u64>,
}

impl CompleteSra {
    pub fn new(mode: LinkMode, max_extension_count: usize) -> Self {
        Self {
            extender: Extender::new(mode, max_extension_count),
            length_histogram: HashMap::new(),
            sequence_count_histogram: HashMap::new(),
        }
    }

    /// Maximal-sequence length -> count, across every processed session.
    pub fn length_histogram(&self) -> &HashMap<usize, u64> {
        &self.length_histogram
    }

    /// Per-session maximal-sequence count -> number of sessions.
    pub fn sequence_count_histogram(&self) -> &HashMap<usize, u64> {
        &self.sequence_count_histogram
    }
}

impl Reconstruct for CompleteSra {
    fn reconstruct(
        &mut self,
        topology: &Topology,
        session: &Session,
        penalty: f32,
        skip_trivial: bool,
    ) -> Vec<Sequence> {
        if skip_trivial && is_simple_session(session) {
            return Vec::new();
        }

        let mut sequences: Vec<Sequence> = Vec::new();
        for page in session.pages() {
            let mut any_extended = false;
            let mut children: Vec<Sequence> = Vec::new();
            for index in 0..sequences.len() {
                if let Some(child) =
                    self.extender
                        .try_extend(topology, &mut sequences[index], page, session)
                {
                    any_extended = true;
                    children.push(child);
                }
            }
            if !any_extended {
                children.push(self.extender.seed(topology, page));
            }
            sequences.append(&mut children);
        }

        let mut output: Vec<Sequence> = Vec::new();
        for mut sequence in sequences {
            if sequence.len() >= 1 && sequence.is_maximal() {
                sequence.set_penalty(penalty);
                *self.length_histogram.entry(sequence.len()).or_insert(0) += 1;
                output.push(sequence);
            }
        }
        *self
            .sequence_count_histogram
            .entry(output.len())
            .or_insert(0) += 1;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webtrail_core::EXTERNAL_REFERRER;

    #[test]
    fn gap_yields_singletons() {
        // Topology {A->B, B->C}, session [A, C] with no edge A->C:
        // no extension happens, two singleton maximal sequences remain.
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");
        topology.add_edge("/b", "/c");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/c", "/a", 1);

        let mut algorithm = CompleteSra::new(LinkMode::Topology, usize::MAX);
        let sequences = algorithm.reconstruct(&topology, &session, 1.0, false);
        let mut rendered: Vec<String> = sequences.iter().map(Sequence::to_string).collect();
        rendered.sort();
        assert_eq!(rendered, vec!["/a", "/c"]);
    }

    #[test]
    fn enumerates_all_branches() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");
        topology.add_edge("/a", "/c");
        topology.add_edge("/b", "/d");
        topology.add_edge("/c", "/d");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);
        session.append_page("/c", "/a", 2);
        session.append_page("/d", "/b", 3);

        let mut algorithm = CompleteSra::new(LinkMode::Topology, usize::MAX);
        let sequences = algorithm.reconstruct(&topology, &session, 1.0, false);
        let mut rendered: Vec<String> = sequences.iter().map(Sequence::to_string).collect();
        rendered.sort();
        assert_eq!(rendered, vec!["/a-/b-/d", "/a-/c-/d"]);
    }

    #[test]
    fn budget_invariant_holds() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");
        topology.add_edge("/a", "/c");
        topology.add_edge("/a", "/d");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);
        session.append_page("/c", "/a", 2);
        session.append_page("/d", "/a", 3);

        let max_extension_count = 2;
        let mut algorithm = CompleteSra::new(LinkMode::Topology, max_extension_count);
        // With a budget of 2 the third extension of /a is refused and /d
        // starts its own singleton.
        let sequences = algorithm.reconstruct(&topology, &session, 1.0, false);
        let rendered: Vec<String> = sequences.iter().map(Sequence::to_string).collect();
        assert!(rendered.contains(&"/d".to_string()));
        for sequence in &sequences {
            assert!(
                sequence.number_of_extension()
                    <= sequence.out_degree().min(max_extension_count)
            );
        }
    }

    #[test]
    fn histograms_track_maximal_output() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);

        let mut algorithm = CompleteSra::new(LinkMode::Topology, usize::MAX);
        algorithm.reconstruct(&topology, &session, 1.0, false);

        assert_eq!(algorithm.length_histogram().get(&2), Some(&1));
        assert_eq!(algorithm.sequence_count_histogram().get(&1), Some(&1));
    }
}
