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

//! Raw per-visitor click history within a time window.
//!
//! A session carries two parallel lists: the visited pages in arrival
//! order and the referrer recorded for each visit. The equal-length
//! invariant holds for every reachable state; `append_page` and
//! `remove_item` maintain it together.

use crate::ITEM_SEPARATOR;

/// Placeholder recorded when the referrer is outside the mined site.
pub const EXTERNAL_REFERRER: &str = "****1";

#[derive(Debug, Clone, Default)]
pub struct Session {
    id: u64,
    ip: String,
    pages: Vec<String>,
    referrers: Vec<String>,
    initial_time: i64,
    end_time: i64,
}

impl Session {
    pub fn new(
        ip: impl Into<String>,
        initial_page: impl Into<String>,
        initial_referrer: impl Into<String>,
        time: i64,
        id: u64,
    ) -> Self {
        Self {
            id,
            ip: ip.into(),
            pages: vec![initial_page.into()],
            referrers: vec![initial_referrer.into()],
            initial_time: time,
            end_time: time,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn referrers(&self) -> &[String] {
        &self.referrers
    }

    pub fn initial_time(&self) -> i64 {
        self.initial_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }

    /// Appends a page view. A page already present in the session is
    /// silently ignored; re-visits do not extend the raw history.
    pub fn append_page(
        &mut self,
        page: impl Into<String>,
        referrer: impl Into<String>,
        time: i64,
    ) {
        let page = page.into();
        if !self.contains(&page) {
            self.pages.push(page);
            self.referrers.push(referrer.into());
            self.end_time = time;
        }
    }

    /// Removes the first occurrence of `page` together with its parallel
    /// referrer entry.
    pub fn remove_item(&mut self, page: &str) {
        if let Some(index) = self.pages.iter().position(|p| p == page) {
            self.pages.remove(index);
            self.referrers.remove(index);
        }
    }

    /// Referrer recorded for the first occurrence of `page`.
    pub fn referrer_of(&self, page: &str) -> Option<&str> {
        self.pages
            .iter()
            .position(|p| p == page)
            .map(|index| self.referrers[index].as_str())
    }

    /// The first `cut` page views as a fresh session, for evaluating a
    /// predictor against progressively shorter prefixes.
    pub fn truncated(&self, cut: usize) -> Session {
        let cut = cut.min(self.pages.len());
        Session {
            id: self.id,
            ip: self.ip.clone(),
            pages: self.pages[..cut].to_vec(),
            referrers: self.referrers[..cut].to_vec(),
            initial_time: self.initial_time,
            end_time: self.end_time,
        }
    }

    /// Dash-joined page list, the on-disk corpus representation.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i != 0 {
                out.push(ITEM_SEPARATOR);
            }
            out.push_str(page.trim());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut s = Session::new("10.0.0.1", "/a", EXTERNAL_REFERRER, 100, 1);
        s.append_page("/b", "/a", 101);
        s.append_page("/c", "/b", 103);
        s
    }

    #[test]
    fn parallel_lists_stay_aligned() {
        let s = session();
        assert_eq!(s.pages().len(), s.referrers().len());
        assert_eq!(s.referrer_of("/c"), Some("/b"));
        assert_eq!(s.end_time(), 103);
    }

    #[test]
    fn append_suppresses_duplicates() {
        let mut s = session();
        s.append_page("/b", "/c", 110);
        assert_eq!(s.len(), 3);
        // The original referrer and end time are untouched.
        assert_eq!(s.referrer_of("/b"), Some("/a"));
        assert_eq!(s.end_time(), 103);
    }

    #[test]
    fn remove_item_keeps_lists_parallel() {
        let mut s = session();
        s.remove_item("/b");
        assert_eq!(s.pages(), &["/a".to_string(), "/c".to_string()]);
        assert_eq!(s.referrers().len(), 2);
        assert_eq!(s.referrer_of("/c"), Some("/b"));
    }

    #[test]
    fn truncated_takes_prefix() {
        let s = session();
        let cut = s.truncated(2);
        assert_eq!(cut.pages(), &["/a".to_string(), "/b".to_string()]);
        assert_eq!(cut.referrers().len(), 2);
        assert_eq!(cut.id(), s.id());
    }

    #[test]
    fn joined_is_dash_separated() {
        assert_eq!(session().joined(), "/a-/b-/c");
    }
}
