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

//! Time-oriented baseline: no graph reasoning at all.

use crate::{simple::is_simple_session, Reconstruct};
use webtrail_core::{Sequence, Session, Topology};

/// Zero-intelligence baseline and fallback predictor source: the whole
/// session is emitted as a single candidate sequence.
#[derive(Debug, Default)]
pub struct TimeOriented;

impl TimeOriented {
    pub fn new() -> Self {
        Self
    }
}

impl Reconstruct for TimeOriented {
    fn reconstruct(
        &mut self,
        _topology: &Topology,
        session: &Session,
        penalty: f32,
        skip_trivial: bool,
    ) -> Vec<Sequence> {
        if session.is_empty() || (skip_trivial && is_simple_session(session)) {
            return Vec::new();
        }
        vec![Sequence::from_joined(&session.joined(), penalty)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webtrail_core::EXTERNAL_REFERRER;

    #[test]
    fn whole_session_becomes_one_sequence() {
        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/x", 1);
        session.append_page("/c", "/y", 2);

        let mut algorithm = TimeOriented::new();
        let sequences = algorithm.reconstruct(&Topology::new(), &session, 0.5, false);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].to_string(), "/a-/b-/c");
        assert_eq!(sequences[0].penalty(), 0.5);
    }

    #[test]
    fn trivial_session_skipped_on_request() {
        let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        session.append_page("/b", "/a", 1);

        let mut algorithm = TimeOriented::new();
        assert!(algorithm
            .reconstruct(&Topology::new(), &session, 1.0, true)
            .is_empty());
        assert_eq!(
            algorithm
                .reconstruct(&Topology::new(), &session, 1.0, false)
                .len(),
            1
        );
    }
}
