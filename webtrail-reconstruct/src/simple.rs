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

//! Trivial-session detection.

use webtrail_core::{Session, EXTERNAL_REFERRER};

/// A session is simple (trivial) when it is already a straight-line
/// path: every page's referrer is the immediately preceding page, modulo
/// the external placeholder. A session is non-trivial only when some
/// page's referrer is neither of those and occurs in the visited list
/// strictly before position `i - 1` — that is, the click stream jumped
/// back to an earlier page.
pub fn is_simple_session(session: &Session) -> bool {
    if session.len() <= 1 {
        return true;
    }
    let pages = session.pages();
    let referrers = session.referrers();
    for i in 1..pages.len() {
        let referrer = referrers[i].trim();
        if referrer == pages[i - 1].trim() || referrer == EXTERNAL_REFERRER {
            continue;
        }
        if let Some(position) = pages.iter().position(|page| page == referrer) {
            if position < i - 1 {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_is_simple() {
        let mut s = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        s.append_page("/b", "/a", 1);
        s.append_page("/c", "/b", 2);
        assert!(is_simple_session(&s));
    }

    #[test]
    fn external_referrers_stay_simple() {
        let mut s = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        s.append_page("/b", EXTERNAL_REFERRER, 1);
        assert!(is_simple_session(&s));
    }

    #[test]
    fn backward_jump_is_not_simple() {
        let mut s = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        s.append_page("/b", "/a", 1);
        s.append_page("/c", "/b", 2);
        // /d was reached from /a, two positions back.
        s.append_page("/d", "/a", 3);
        assert!(!is_simple_session(&s));
    }

    #[test]
    fn single_page_is_simple() {
        let s = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
        assert!(is_simple_session(&s));
    }
}
