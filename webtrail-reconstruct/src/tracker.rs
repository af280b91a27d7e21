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

//! Per-visitor session accumulation over a chronological log stream.

use crate::logs::LogRecord;
use std::collections::HashMap;
use webtrail_core::Session;

/// Groups log records into sessions keyed by client IP. A record joins
/// the visitor's open session while it arrives within
/// `duration_threshold` minutes of the session's FIRST page; otherwise
/// the open session is emitted and a fresh one starts.
#[derive(Debug)]
pub struct SessionTracker {
    sessions: HashMap<String, Session>,
    duration_threshold: i64,
    next_id: u64,
}

impl SessionTracker {
    pub fn new(duration_threshold: i64) -> Self {
        Self {
            sessions: HashMap::new(),
            duration_threshold,
            next_id: 0,
        }
    }

    /// Feeds one record. Returns the visitor's previous session when the
    /// record starts a new one.
    pub fn observe(&mut self, record: &LogRecord) -> Option<Session> {
        match self.sessions.get_mut(&record.ip) {
            Some(session)
                if record.time_minutes - session.initial_time() <= self.duration_threshold =>
            {
                session.append_page(&record.page, &record.referrer, record.time_minutes);
                None
            }
            Some(_) => {
                let replaced = self.sessions.insert(
                    record.ip.clone(),
                    self.fresh_session(record),
                );
                self.next_id += 1;
                replaced
            }
            None => {
                let session = self.fresh_session(record);
                self.next_id += 1;
                self.sessions.insert(record.ip.clone(), session);
                None
            }
        }
    }

    /// Removes and returns every open session whose first page is older
    /// than the duration threshold relative to `current_time`.
    pub fn expire(&mut self, current_time: i64) -> Vec<Session> {
        let expired_ips: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, session)| current_time - session.initial_time() > self.duration_threshold)
            .map(|(ip, _)| ip.clone())
            .collect();
        expired_ips
            .into_iter()
            .filter_map(|ip| self.sessions.remove(&ip))
            .collect()
    }

    /// Drains every open session, in no particular order. Used at end of
    /// input.
    pub fn flush_all(&mut self) -> Vec<Session> {
        self.sessions.drain().map(|(_, session)| session).collect()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn fresh_session(&self, record: &LogRecord) -> Session {
        Session::new(
            &record.ip,
            &record.page,
            &record.referrer,
            record.time_minutes,
            self.next_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str, page: &str, referrer: &str, time_minutes: i64) -> LogRecord {
        LogRecord {
            ip: ip.to_string(),
            page: page.to_string(),
            referrer: referrer.to_string(),
            time_minutes,
        }
    }

    #[test]
    fn records_within_threshold_join_one_session() {
        let mut tracker = SessionTracker::new(30);
        assert!(tracker.observe(&record("1.1.1.1", "/a", "****1", 0)).is_none());
        assert!(tracker.observe(&record("1.1.1.1", "/b", "/a", 10)).is_none());
        assert!(tracker.observe(&record("1.1.1.1", "/c", "/b", 29)).is_none());
        let sessions = tracker.flush_all();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].joined(), "/a-/b-/c");
    }

    #[test]
    fn threshold_measured_from_first_page() {
        // 25 and 45 are each within 30 minutes of their predecessor but
        // 45 is not within 30 minutes of the first page, so it starts a
        // new session.
        let mut tracker = SessionTracker::new(30);
        tracker.observe(&record("1.1.1.1", "/a", "****1", 0));
        tracker.observe(&record("1.1.1.1", "/b", "/a", 25));
        let flushed = tracker.observe(&record("1.1.1.1", "/c", "/b", 45));
        let flushed = flushed.expect("old session should be emitted");
        assert_eq!(flushed.joined(), "/a-/b");
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn visitors_are_tracked_independently() {
        let mut tracker = SessionTracker::new(30);
        tracker.observe(&record("1.1.1.1", "/a", "****1", 0));
        tracker.observe(&record("2.2.2.2", "/x", "****1", 5));
        tracker.observe(&record("1.1.1.1", "/b", "/a", 6));
        assert_eq!(tracker.active_count(), 2);
        let mut joined: Vec<String> =
            tracker.flush_all().iter().map(Session::joined).collect();
        joined.sort();
        assert_eq!(joined, vec!["/a-/b", "/x"]);
    }

    #[test]
    fn expire_removes_stale_sessions_only() {
        let mut tracker = SessionTracker::new(30);
        tracker.observe(&record("1.1.1.1", "/a", "****1", 0));
        tracker.observe(&record("2.2.2.2", "/x", "****1", 40));
        let expired = tracker.expire(50);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].joined(), "/a");
        assert_eq!(tracker.active_count(), 1);
    }
}
