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

//! Navigation-oriented reconstruction: a single linear scan.
//!
//! When consecutive pages lack a direct link, the scan walks backward
//! for the nearest earlier page that links to the current one and
//! splices the intervening pages back in (modelling the visitor's use
//! of the Back button). When no earlier page qualifies, the current run
//! is closed and a new one starts. The result is a non-branching
//! partition of the session into maximal runs.

use crate::{simple::is_simple_session, Reconstruct};
use webtrail_core::{Sequence, Session, Topology};

#[derive(Debug, Default)]
pub struct NavigationOriented;

impl NavigationOriented {
    pub fn new() -> Self {
        Self
    }
}

impl Reconstruct for NavigationOriented {
    fn reconstruct(
        &mut self,
        topology: &Topology,
        session: &Session,
        penalty: f32,
        skip_trivial: bool,
    ) -> Vec<Sequence> {
        if session.is_empty() || (skip_trivial && is_simple_session(session)) {
            return Vec::new();
        }
        let pages = session.pages();
        let mut runs: Vec<Sequence> = Vec::new();
        let mut current = Sequence::new(pages[0].clone());

        for i in 1..pages.len() {
            let page = &pages[i];
            if topology.has_link(&pages[i - 1], page) {
                current.push_page(page.clone());
                continue;
            }
            // Walk backward for the nearest earlier page linking here,
            // splicing in the backtracked pages.
            let mut referrer_index = None;
            for j in (0..i).rev() {
                if topology.has_link(&pages[j], page) {
                    referrer_index = Some(j);
                    break;
                }
            }
            match referrer_index {
                Some(j) => {
                    for k in (j..i).rev() {
                        current.push_page(pages[k].clone());
                    }
                    current.push_page(page.clone());
                }
                None => {
                    runs.push(current);
                    current = Sequence::new(page.clone());
                }
            }
        }
        runs.push(current);

        for run in &mut runs {
            run.set_penalty(penalty);
        }
        runs
    }
}
