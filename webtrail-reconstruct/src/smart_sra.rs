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

//! Smart session reconstruction: iterative round-based branching.
//!
//! Each round finds the "start pages" of the remaining session — pages
//! with no valid referrer among any earlier unprocessed page — extends
//! every currently-maximal sequence whose last element qualifies as
//! their referrer (one child per match), then removes the start pages
//! and repeats until the session is drained. Branching is bounded by
//! actual referrer ambiguity, so no fan-out budget is needed.

use crate::{extension::Extender, simple::is_simple_session, LinkMode, Reconstruct};
use webtrail_core::{Sequence, Session, Topology};

#[derive(Debug)]
pub struct SmartSra {
    extender: Extender,
}

impl SmartSra {
    pub fn new(mode: LinkMode) -> Self {
        Self {
            extender: Extender::new(mode, usize::MAX),
        }
    }
}

impl Reconstruct for SmartSra {
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

        let mut remaining = session.clone();
        let mut sequences: Vec<Sequence> = Vec::new();

        while !remaining.is_empty() {
            let pages = remaining.pages();

            // Pages with no valid referrer among earlier remaining pages.
            let mut start_pages: Vec<String> = Vec::new();
            for (i, to_page) in pages.iter().enumerate() {
                let has_referrer = pages[..i].iter().any(|from_page| {
                    self.extender
                        .is_referrer(topology, from_page, to_page, &remaining)
                });
                if !has_referrer {
                    start_pages.push(to_page.clone());
                }
            }

            let mut round: Vec<Sequence> = Vec::new();
            if sequences.is_empty() {
                for page in &start_pages {
                    round.push(Sequence::new(page.clone()));
                }
            } else {
                for page in &start_pages {
                    for sequence in sequences.iter_mut() {
                        if self
                            .extender
                            .is_referrer(topology, sequence.last(), page, &remaining)
                        {
                            round.push(sequence.child_with(page.clone()));
                            sequence.set_maximal(false);
                        }
                    }
                }
            }

            // Carry over the maximal sequences this round did not extend.
            round.extend(sequences.drain(..).filter(Sequence::is_maximal));
            sequences = round;

            for page in &start_pages {
                remaining.remove_item(page);
            }
        }

        let mut output: Vec<Sequence> = sequences
            .into_iter()
            .filter(|s| s.len() >= 1 && s.is_maximal())
            .collect();
        for sequence in &mut output {
            sequence.set_penalty(penalty);
        }
        output
    }
}
