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

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::WebtrailConfig;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webtrail_core::Topology;
use webtrail_evals::PredictionEvaluator;
use webtrail_miner::{SequenceCorpus, SequentialApriori};
use webtrail_predict::PatternModel;
use webtrail_reconstruct::{
    Algorithm, LinkMode, LogParser, ReconstructionPipeline, SessionTracker,
};

#[derive(Parser, Debug)]
#[command(name = "webtrail", author, version, about = "Web usage mining toolkit", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct navigation sequences from raw access logs
    Reconstruct(ReconstructArgs),
    /// Mine frequent sequential patterns from a sequence corpus
    Mine(MineArgs),
    /// Evaluate next-page prediction across reconstruction algorithms
    Evaluate(EvaluateArgs),
    /// Print the length histogram of a sequence corpus
    Stats(StatsArgs),
}

#[derive(clap::Args, Debug)]
struct ReconstructArgs {
    /// Raw access log file or directory of log files
    #[arg(long)]
    input: PathBuf,

    /// Site topology file (page,neighbor1,neighbor2,...)
    #[arg(long)]
    topology: PathBuf,

    /// Output corpus file, one dash-joined sequence per line
    #[arg(long)]
    output: PathBuf,

    /// Site domain name, e.g. example.com
    #[arg(long)]
    domain: String,

    #[arg(long, value_enum, default_value_t = AlgorithmArg::CompleteSra)]
    algorithm: AlgorithmArg,

    #[arg(long, value_enum, default_value_t = ModeArg::Topology)]
    mode: ModeArg,

    /// Skip sessions that are already straight-line paths
    #[arg(long)]
    skip_simple: bool,

    /// Fan-out budget per candidate sequence (topology mode)
    #[arg(long)]
    max_extensions: Option<usize>,

    /// Session expiry threshold in minutes
    #[arg(long)]
    duration_threshold: Option<i64>,
}

#[derive(clap::Args, Debug)]
struct MineArgs {
    /// Sequence corpus file
    #[arg(long)]
    input: PathBuf,

    /// Minimum support for a frequent pattern
    #[arg(long)]
    threshold: Option<f32>,

    /// Output file for maximal patterns
    #[arg(long)]
    maximal_output: PathBuf,

    /// Output file for all frequent patterns
    #[arg(long)]
    all_output: PathBuf,
}

#[derive(clap::Args, Debug)]
struct EvaluateArgs {
    /// Raw access log file or directory of log files
    #[arg(long)]
    input: PathBuf,

    /// Site topology file
    #[arg(long)]
    topology: PathBuf,

    /// Site domain name
    #[arg(long)]
    domain: String,

    /// Report output file
    #[arg(long)]
    output: PathBuf,

    /// Pattern file mined from the time-oriented corpus
    #[arg(long)]
    patterns_to: PathBuf,

    /// Pattern file mined from the smart reconstruction corpus
    #[arg(long)]
    patterns_smart_sra: PathBuf,

    /// Pattern file mined from the complete reconstruction corpus
    #[arg(long)]
    patterns_complete_sra: PathBuf,

    /// Pattern file mined from the objective-maximizing corpus
    #[arg(long)]
    patterns_ip: PathBuf,

    /// Pattern file mined from the navigation-oriented corpus
    #[arg(long)]
    patterns_no: PathBuf,

    /// Number of items in each sampled prediction set
    #[arg(long)]
    predicted_items: Option<usize>,

    /// Maximum prefix-shrinking rounds for unmatched candidates
    #[arg(long)]
    max_tail_count: Option<usize>,

    /// Session expiry threshold in minutes
    #[arg(long)]
    duration_threshold: Option<i64>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct StatsArgs {
    /// Sequence corpus files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlgorithmArg {
    To,
    No,
    SmartSra,
    CompleteSra,
    Ip,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::To => Algorithm::TimeOriented,
            AlgorithmArg::No => Algorithm::NavigationOriented,
            AlgorithmArg::SmartSra => Algorithm::SmartSra,
            AlgorithmArg::CompleteSra => Algorithm::CompleteSra,
            AlgorithmArg::Ip => Algorithm::IntegerProgramming,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Topology,
    Referrer,
}

impl From<ModeArg> for LinkMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Topology => LinkMode::Topology,
            ModeArg::Referrer => LinkMode::Referrer,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webtrail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = WebtrailConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Reconstruct(args) => reconstruct(args, &config),
        Command::Mine(args) => mine(args, &config),
        Command::Evaluate(args) => evaluate(args, &config),
        Command::Stats(args) => stats(args),
    }
}

fn reconstruct(args: ReconstructArgs, config: &WebtrailConfig) -> Result<()> {
    let topology = Topology::load(&args.topology)
        .with_context(|| format!("loading topology {}", args.topology.display()))?;
    let duration_threshold = args
        .duration_threshold
        .unwrap_or(config.reconstruction.duration_threshold_minutes);
    let max_extensions = args
        .max_extensions
        .unwrap_or(config.reconstruction.max_extension_count);
    let skip_simple = args.skip_simple || config.reconstruction.skip_simple_sessions;
    let algorithm: Algorithm = args.algorithm.into();

    let writer = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("creating output {}", args.output.display()))?,
    );
    let mut pipeline = ReconstructionPipeline::new(
        LogParser::new(&args.domain),
        SessionTracker::new(duration_threshold),
        algorithm.build(args.mode.into(), max_extensions),
        topology,
        skip_simple,
        writer,
    );
    let summary = pipeline
        .process(&args.input)
        .with_context(|| format!("processing {}", args.input.display()))?;
    info!(
        algorithm = algorithm.label(),
        records = summary.records_seen,
        skipped = summary.records_skipped,
        sequences = summary.sequences_written,
        "reconstruction finished"
    );
    Ok(())
}

fn mine(args: MineArgs, config: &WebtrailConfig) -> Result<()> {
    let corpus = SequenceCorpus::load(&args.input)
        .with_context(|| format!("loading corpus {}", args.input.display()))?;
    let threshold = args.threshold.unwrap_or(config.mining.threshold);

    let mut apriori = SequentialApriori::new(threshold);
    apriori.mine(&corpus);
    apriori
        .write_results(&args.maximal_output, &args.all_output)
        .context("writing pattern files")?;

    info!(
        sequences = corpus.len(),
        threshold,
        patterns = apriori.pattern_count(),
        maximal = apriori.maximal_count(),
        "mining finished"
    );
    for (length, count) in apriori.length_histogram() {
        info!(length, count, "maximal pattern length");
    }
    Ok(())
}

fn evaluate(args: EvaluateArgs, config: &WebtrailConfig) -> Result<()> {
    let topology = Topology::load(&args.topology)
        .with_context(|| format!("loading topology {}", args.topology.display()))?;
    let models = vec![
        (Algorithm::TimeOriented, load_model(&args.patterns_to)?),
        (Algorithm::SmartSra, load_model(&args.patterns_smart_sra)?),
        (
            Algorithm::CompleteSra,
            load_model(&args.patterns_complete_sra)?,
        ),
        (Algorithm::IntegerProgramming, load_model(&args.patterns_ip)?),
        (Algorithm::NavigationOriented, load_model(&args.patterns_no)?),
    ];
    let predicted_items = args
        .predicted_items
        .unwrap_or(config.prediction.predicted_items);
    let max_tail_count = args
        .max_tail_count
        .unwrap_or(config.prediction.max_tail_count);
    let duration_threshold = args
        .duration_threshold
        .unwrap_or(config.reconstruction.duration_threshold_minutes);

    let mut evaluator = match args.seed {
        Some(seed) => {
            PredictionEvaluator::with_seed(topology, models, predicted_items, max_tail_count, seed)
        }
        None => PredictionEvaluator::new(topology, models, predicted_items, max_tail_count),
    };
    evaluator.set_step_penalty(config.prediction.step_penalty);

    replay_sessions(
        &args.input,
        &args.domain,
        duration_threshold,
        &mut evaluator,
    )?;

    let report = evaluator.into_report();
    let text = report.render_text();
    std::fs::write(&args.output, &text)
        .with_context(|| format!("writing report {}", args.output.display()))?;
    print!("{text}");
    Ok(())
}

/// Streams raw logs through the session tracker, scoring every session
/// as it expires.
fn replay_sessions(
    input: &Path,
    domain: &str,
    duration_threshold: i64,
    evaluator: &mut PredictionEvaluator,
) -> Result<()> {
    let parser = LogParser::new(domain);
    let mut tracker = SessionTracker::new(duration_threshold);
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
    } else {
        files.push(input.to_path_buf());
    }

    let mut counter: u64 = 0;
    for path in files {
        info!(path = %path.display(), "replaying log file");
        let reader = BufReader::new(
            File::open(&path).with_context(|| format!("opening {}", path.display()))?,
        );
        for line in reader.lines() {
            let Ok(Some(record)) = parser.parse_line(&line?) else {
                continue;
            };
            if let Some(expired) = tracker.observe(&record) {
                evaluator.evaluate_session(&expired);
            }
            if counter % 1000 == 0 {
                for session in tracker.expire(record.time_minutes) {
                    evaluator.evaluate_session(&session);
                }
            }
            counter += 1;
        }
    }
    for session in tracker.flush_all() {
        evaluator.evaluate_session(&session);
    }
    Ok(())
}

fn load_model(path: &Path) -> Result<PatternModel> {
    PatternModel::load(path).with_context(|| format!("loading pattern file {}", path.display()))
}

fn stats(args: StatsArgs) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for input in &args.inputs {
        let corpus = SequenceCorpus::load(input)
            .with_context(|| format!("loading corpus {}", input.display()))?;

        // Lengths of ten or more share the last bucket.
        let mut buckets = [0u64; 10];
        for (length, count) in corpus.length_histogram() {
            let slot = length.clamp(1, 10) - 1;
            buckets[slot] += count;
        }
        writeln!(stdout, "File name = {}", input.display())?;
        for (i, count) in buckets.iter().enumerate() {
            writeln!(stdout, "{},{}", i + 1, count)?;
        }
        writeln!(stdout, "Total = {}", corpus.len())?;
    }
    Ok(())
}
