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

//! Common-log-format access record parsing.

use chrono::NaiveDateTime;
use webtrail_core::{Result, WebtrailError, EXTERNAL_REFERRER};

const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// One usable page view extracted from an access log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub ip: String,
    pub page: String,
    pub referrer: String,
    pub time_minutes: i64,
}

/// Extracts page views from combined-log-format lines for a single site.
/// The domain name anchors referrer reduction: same-site referrers become
/// site-relative paths, everything else collapses to the external
/// placeholder.
#[derive(Debug)]
pub struct LogParser {
    domain_name: String,
}

impl LogParser {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
        }
    }

    /// Parses one log line. `Ok(None)` means the record is well formed
    /// but unusable: its URL or referrer contains `-`, which is reserved
    /// as the sequence separator.
    pub fn parse_line(&self, line: &str) -> Result<Option<LogRecord>> {
        let ip = self.ip_of(line)?;
        let page = strip_query(&self.url_of(line)?).to_string();
        let referrer = self.reduce_referrer(strip_query(&self.referrer_field(line)?));
        let time_minutes = self.time_of(line)?;

        if page.contains('-') || referrer.contains('-') {
            return Ok(None);
        }
        Ok(Some(LogRecord {
            ip,
            page,
            referrer,
            time_minutes,
        }))
    }

    /// Client address: the text before the first `-` separator.
    fn ip_of(&self, line: &str) -> Result<String> {
        let ip = line
            .split('-')
            .next()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| malformed("missing client address", line))?;
        Ok(ip.to_string())
    }

    /// The request URL: everything between the method and the protocol
    /// inside the first quoted field.
    fn url_of(&self, line: &str) -> Result<String> {
        let request = quoted_field(line, 0)
            .ok_or_else(|| malformed("missing quoted request field", line))?;
        let tokens: Vec<&str> = request.split(' ').collect();
        if tokens.len() < 3 {
            return Err(malformed("request field has no url", line));
        }
        Ok(tokens[1..tokens.len() - 1].concat())
    }

    /// The fourth quoted field, the recorded HTTP referrer.
    fn referrer_field(&self, line: &str) -> Result<String> {
        quoted_field(line, 1)
            .ok_or_else(|| malformed("missing quoted referrer field", line))
            .map(str::to_string)
    }

    /// Bracketed common-log clock, converted to minutes since the epoch.
    fn time_of(&self, line: &str) -> Result<i64> {
        let open = line
            .find('[')
            .ok_or_else(|| malformed("missing timestamp", line))?;
        let close = line[open..]
            .find(']')
            .map(|offset| open + offset)
            .ok_or_else(|| malformed("unterminated timestamp", line))?;
        let stamp = line[open + 1..close]
            .split(' ')
            .next()
            .ok_or_else(|| malformed("empty timestamp", line))?;
        let parsed = NaiveDateTime::parse_from_str(stamp, TIME_FORMAT)
            .map_err(|_| malformed("unparseable timestamp", line))?;
        Ok(parsed.and_utc().timestamp() / 60)
    }

    /// Same-site referrers are reduced to their site-relative path; every
    /// other referrer becomes the external placeholder.
    fn reduce_referrer(&self, referrer: &str) -> String {
        match referrer.find(&self.domain_name) {
            Some(start) => {
                let path = &referrer[start + self.domain_name.len()..];
                if path.is_empty() {
                    "/".to_string()
                } else {
                    path.to_string()
                }
            }
            None => EXTERNAL_REFERRER.to_string(),
        }
    }
}

fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}

/// The text between quote pair `index` (0-based) of `line`.
fn quoted_field(line: &str, index: usize) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?; // before the first quote
    parts.nth(index * 2)
}

fn malformed(reason: &'static str, line: &str) -> WebtrailError {
    WebtrailError::MalformedLogLine {
        reason,
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "10.0.0.7 - - [01/Apr/2008:03:05:14 +0200] \"GET /news/world.html?ref=rss HTTP/1.1\" 200 5120 \"http://example.com/index.html\" \"Mozilla/5.0\"";

    fn parser() -> LogParser {
        LogParser::new("example.com")
    }

    #[test]
    fn extracts_all_fields() {
        let record = parser().parse_line(LINE).unwrap().unwrap();
        assert_eq!(record.ip, "10.0.0.7");
        assert_eq!(record.page, "/news/world.html");
        assert_eq!(record.referrer, "/index.html");
        // 2008-04-01T03:05:14Z truncated to minutes.
        assert_eq!(record.time_minutes, 1207019114 / 60);
    }

    #[test]
    fn external_referrer_collapses_to_placeholder() {
        let line = LINE.replace("http://example.com/index.html", "http://other.org/page");
        let record = parser().parse_line(&line).unwrap().unwrap();
        assert_eq!(record.referrer, EXTERNAL_REFERRER);
    }

    #[test]
    fn bare_domain_referrer_becomes_root() {
        let line = LINE.replace("http://example.com/index.html", "http://example.com");
        let record = parser().parse_line(&line).unwrap().unwrap();
        assert_eq!(record.referrer, "/");
    }

    #[test]
    fn separator_in_url_skips_record() {
        let line = LINE.replace("/news/world.html", "/news/breaking-news.html");
        assert_eq!(parser().parse_line(&line).unwrap(), None);
    }

    #[test]
    fn malformed_line_is_an_error() {
        let err = parser().parse_line("garbage without quotes").unwrap_err();
        assert!(matches!(err, WebtrailError::MalformedLogLine { .. }));
    }
}
