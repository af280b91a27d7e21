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

//! Objective-maximizing reconstruction.
//!
//! Runs the same exhaustive forward pass as the complete algorithm but
//! emits only the single longest maximal sequence per session, the
//! optimum of a path-length objective over the candidate set. Ties keep
//! the earliest candidate, so results are deterministic.

use crate::{extension::Extender, simple::is_simple_session, LinkMode, Reconstruct};
use webtrail_core::{Sequence, Session, Topology};

#[derive(Debug)]
pub struct IntegerProgramming {
    extender: Extender,
}

impl IntegerProgramming {
    pub fn new(mode: LinkMode, max_extension_count: usize) -> Self {
        Self {
            extender: Extender::new(mode, max_extension_count),
        }
    }
}

impl Reconstruct for IntegerProgramming {
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

        // First longest maximal candidate wins.
        let mut best: Option<Sequence> = None;
        for sequence in sequences {
            if !sequence.is_maximal() {
                continue;
            }
            match &best {
                Some(current) if sequence.len() <= current.len() => {}
                _ => best = Some(sequence),
            }
        }

        match best {
            Some(mut sequence) => {
                sequence.set_penalty(penalty);
                vec![sequence]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webtrail_core::EXTERNAL_REFERRER;

    #[test]
    fn keeps_only_longest_sequence() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");
        topology.add_edge("/b", "/c");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);
        session.append_page("/z", "/q", 2);
        session.append_page("/c", "/b", 3);

        let mut algorithm = IntegerProgramming::new(LinkMode::Topology, usize::MAX);
        let sequences = algorithm.reconstruct(&topology, &session, 1.0, false);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].to_string(), "/a-/b-/c");
    }

    #[test]
    fn tie_keeps_earliest_candidate() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");
        topology.add_edge("/a", "/c");

        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);
        session.append_page("/c", "/a", 2);

        let mut algorithm = IntegerProgramming::new(LinkMode::Topology, usize::MAX);
        let sequences = algorithm.reconstruct(&topology, &session, 1.0, false);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].to_string(), "/a-/b");
    }

    #[test]
    fn single_page_session_yields_singleton() {
        let session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        let mut algorithm = IntegerProgramming::new(LinkMode::Topology, usize::MAX);
        let sequences = algorithm.reconstruct(&Topology::new(), &session, 1.0, false);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].to_string(), "/a");
    }
}
