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

//! Raw-log to sequence-corpus batch pipeline.
//!
//! Wires the log parser, the per-IP session tracker and one
//! reconstruction algorithm together and streams the resulting maximal
//! sequences to a writer as dash-joined lines, one per sequence.

use crate::{logs::LogParser, tracker::SessionTracker, Reconstruct};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, warn};
use webtrail_core::{Result, Session, Topology};

const EXPIRY_SWEEP_INTERVAL: u64 = 1000;

pub struct ReconstructionPipeline<W: Write> {
    parser: LogParser,
    tracker: SessionTracker,
    algorithm: Box<dyn Reconstruct>,
    topology: Topology,
    skip_simple: bool,
    writer: W,
    records_seen: u64,
    records_skipped: u64,
    sequences_written: u64,
}

impl<W: Write> ReconstructionPipeline<W> {
    pub fn new(
        parser: LogParser,
        tracker: SessionTracker,
        algorithm: Box<dyn Reconstruct>,
        topology: Topology,
        skip_simple: bool,
        writer: W,
    ) -> Self {
        Self {
            parser,
            tracker,
            algorithm,
            topology,
            skip_simple,
            writer,
            records_seen: 0,
            records_skipped: 0,
            sequences_written: 0,
        }
    }

    /// Feeds one raw log line. Unusable and malformed lines are counted
    /// and skipped so a single bad record cannot abort a batch run.
    pub fn process_line(&mut self, line: &str) -> Result<()> {
        let record = match self.parser.parse_line(line) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.records_skipped += 1;
                return Ok(());
            }
            Err(error) => {
                warn!(%error, "skipping malformed log line");
                self.records_skipped += 1;
                return Ok(());
            }
        };

        if let Some(expired) = self.tracker.observe(&record) {
            self.emit(&expired)?;
        }
        if self.records_seen % EXPIRY_SWEEP_INTERVAL == 0 {
            for session in self.tracker.expire(record.time_minutes) {
                self.emit(&session)?;
            }
        }
        self.records_seen += 1;
        Ok(())
    }

    pub fn process_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        for line in BufReader::new(reader).lines() {
            self.process_line(&line?)?;
        }
        Ok(())
    }

    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "processing log file");
        self.process_reader(File::open(path)?)
    }

    /// Processes every file in `path` (or `path` itself when it is a
    /// single file), then drains the remaining open sessions.
    pub fn process(&mut self, path: &Path) -> Result<PipelineSummary> {
        if path.is_dir() {
            let mut entries: Vec<_> = std::fs::read_dir(path)?
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .collect();
            entries.sort();
            for entry in entries {
                self.process_file(&entry)?;
            }
        } else {
            self.process_file(path)?;
        }
        self.finish()
    }

    /// Flushes every open session and the underlying writer.
    pub fn finish(&mut self) -> Result<PipelineSummary> {
        for session in self.tracker.flush_all() {
            self.emit(&session)?;
        }
        self.writer.flush()?;
        Ok(PipelineSummary {
            records_seen: self.records_seen,
            records_skipped: self.records_skipped,
            sequences_written: self.sequences_written,
        })
    }

    fn emit(&mut self, session: &Session) -> Result<()> {
        for sequence in
            self.algorithm
                .reconstruct(&self.topology, session, 1.0, self.skip_simple)
        {
            writeln!(self.writer, "{sequence}")?;
            self.sequences_written += 1;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub records_seen: u64,
    pub records_skipped: u64,
    pub sequences_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Algorithm, LinkMode};

    fn line(ip: &str, page: &str, referrer: &str, minute: u32) -> String {
        format!(
            "{ip} - - [01/Apr/2008:03:{minute:02}:00 +0200] \"GET {page} HTTP/1.1\" 200 100 \"http://example.com{referrer}\" \"UA\""
        )
    }

    #[test]
    fn sessions_flow_through_to_corpus_lines() {
        let mut topology = Topology::new();
        topology.add_edge("/a", "/b");

        let mut pipeline = ReconstructionPipeline::new(
            LogParser::new("example.com"),
            SessionTracker::new(30),
            Algorithm::TimeOriented.build(LinkMode::Topology, usize::MAX),
            topology,
            false,
            Vec::new(),
        );
        pipeline.process_line(&line("1.1.1.1", "/a", "/", 0)).unwrap();
        pipeline.process_line(&line("1.1.1.1", "/b", "/a", 5)).unwrap();
        let summary = pipeline.finish().unwrap();

        assert_eq!(summary.records_seen, 2);
        assert_eq!(summary.sequences_written, 1);
        let output = String::from_utf8(std::mem::take(&mut pipeline.writer)).unwrap();
        assert_eq!(output, "/a-/b\n");
    }

    #[test]
    fn bad_lines_are_skipped_not_fatal() {
        let mut pipeline = ReconstructionPipeline::new(
            LogParser::new("example.com"),
            SessionTracker::new(30),
            Algorithm::TimeOriented.build(LinkMode::Topology, usize::MAX),
            Topology::new(),
            false,
            Vec::new(),
        );
        pipeline.process_line("not an access log line").unwrap();
        pipeline
            .process_line(&line("1.1.1.1", "/with-dash", "/", 0))
            .unwrap();
        let summary = pipeline.finish().unwrap();
        assert_eq!(summary.records_skipped, 2);
        assert_eq!(summary.sequences_written, 0);
    }
}
