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

//! End-to-end checks: raw access log in, sequence corpus out, and a
//! property over the shared extension budget.

use proptest::prelude::*;
use std::io::Write as _;
use webtrail_core::{Session, Topology, EXTERNAL_REFERRER};
use webtrail_reconstruct::{
    Algorithm, LinkMode, LogParser, Reconstruct, ReconstructionPipeline, SessionTracker,
};

fn log_line(ip: &str, page: &str, referrer: &str, hour: u32, minute: u32) -> String {
    format!(
        "{ip} - - [01/Apr/2008:{hour:02}:{minute:02}:00 +0200] \"GET {page} HTTP/1.1\" 200 100 \"http://example.com{referrer}\" \"UA\""
    )
}

#[test]
fn pipeline_builds_corpus_from_log_file() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    // Visitor one browses twice with a 40 minute gap in between, so the
    // run splits into two sessions. Visitor two interleaves.
    writeln!(log, "{}", log_line("1.1.1.1", "/a", "/", 3, 0)).unwrap();
    writeln!(log, "{}", log_line("2.2.2.2", "/x", "/", 3, 1)).unwrap();
    writeln!(log, "{}", log_line("1.1.1.1", "/b", "/a", 3, 10)).unwrap();
    writeln!(log, "{}", log_line("1.1.1.1", "/c", "/b", 3, 50)).unwrap();
    log.flush().unwrap();

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
    let summary = pipeline.process(log.path()).unwrap();
    assert_eq!(summary.records_seen, 4);
    assert_eq!(summary.records_skipped, 0);
    assert_eq!(summary.sequences_written, 3);
}

#[test]
fn complete_sra_splits_on_missing_link() {
    // Pages A then C with no A -> C edge: the complete algorithm keeps
    // two singleton maximal sequences.
    let mut topology = Topology::new();
    topology.add_edge("/a", "/b");
    topology.add_edge("/b", "/c");

    let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
    session.append_page("/c", "/a", 2);

    let mut algorithm = Algorithm::CompleteSra.build(LinkMode::Topology, usize::MAX);
    let mut rendered: Vec<String> = algorithm
        .reconstruct(&topology, &session, 1.0, false)
        .iter()
        .map(ToString::to_string)
        .collect();
    rendered.sort();
    assert_eq!(rendered, vec!["/a", "/c"]);
}

#[test]
fn all_graph_algorithms_agree_on_straight_lines() {
    let mut topology = Topology::new();
    topology.add_edge("/a", "/b");
    topology.add_edge("/b", "/c");

    let mut session = Session::new("ip", "/a", EXTERNAL_REFERRER, 0, 1);
    session.append_page("/b", "/a", 1);
    session.append_page("/c", "/b", 2);

    for algorithm in [
        Algorithm::TimeOriented,
        Algorithm::NavigationOriented,
        Algorithm::SmartSra,
        Algorithm::CompleteSra,
        Algorithm::IntegerProgramming,
    ] {
        let sequences = algorithm
            .build(LinkMode::Topology, usize::MAX)
            .reconstruct(&topology, &session, 1.0, false);
        assert_eq!(sequences.len(), 1, "{algorithm:?}");
        assert_eq!(sequences[0].to_string(), "/a-/b-/c", "{algorithm:?}");
    }
}

proptest! {
    // A hub page followed by a shuffle of its children: no emitted
    // sequence may record more extensions than the hub's out-degree or
    // the configured budget, whatever the session order.
    #[test]
    fn extension_budget_never_exceeded(
        children in proptest::sample::subsequence(
            vec!["/p1", "/p2", "/p3", "/p4", "/p5"], 1..=5),
        budget in 1usize..=5,
    ) {
        let mut topology = Topology::new();
        for child in &children {
            topology.add_edge("/hub", *child);
        }

        let mut session = Session::new("ip", "/hub", EXTERNAL_REFERRER, 0, 1);
        for (i, child) in children.iter().enumerate() {
            session.append_page(*child, "/hub", 1 + i as i64);
        }

        let mut algorithm = Algorithm::CompleteSra.build(LinkMode::Topology, budget);
        for sequence in algorithm.reconstruct(&topology, &session, 1.0, false) {
            prop_assert!(sequence.number_of_extension() <= budget);
            prop_assert!(sequence.number_of_extension() <= sequence.out_degree());
        }
    }
}
