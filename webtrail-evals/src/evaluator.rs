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

//! The evaluation orchestrator: one reconstructor/predictor pair per
//! algorithm, scored trial by trial over replayed sessions.

use crate::report::EvaluationReport;
use std::collections::HashMap;
use tracing::debug;
use webtrail_core::{Session, Topology, DEFAULT_STEP_PENALTY};
use webtrail_predict::{BayesianPredictor, PatternModel};
use webtrail_reconstruct::{Algorithm, LinkMode, Reconstruct};

struct Engine {
    algorithm: Algorithm,
    reconstructor: Box<dyn Reconstruct>,
    predictor: BayesianPredictor,
}

pub struct PredictionEvaluator {
    topology: Topology,
    engines: Vec<Engine>,
    step_penalty: f32,
    report: EvaluationReport,
}

impl PredictionEvaluator {
    /// One engine per `(algorithm, model)` pair; reconstruction runs in
    /// topology mode with an unbounded extension budget, matching how
    /// the training corpora are produced.
    pub fn new(
        topology: Topology,
        models: Vec<(Algorithm, PatternModel)>,
        predicted_items: usize,
        max_tail_count: usize,
    ) -> Self {
        Self::build(topology, models, predicted_items, max_tail_count, None)
    }

    /// Deterministic variant for reproducible evaluation runs.
    pub fn with_seed(
        topology: Topology,
        models: Vec<(Algorithm, PatternModel)>,
        predicted_items: usize,
        max_tail_count: usize,
        seed: u64,
    ) -> Self {
        Self::build(topology, models, predicted_items, max_tail_count, Some(seed))
    }

    fn build(
        topology: Topology,
        models: Vec<(Algorithm, PatternModel)>,
        predicted_items: usize,
        max_tail_count: usize,
        seed: Option<u64>,
    ) -> Self {
        let engines = models
            .into_iter()
            .map(|(algorithm, model)| Engine {
                algorithm,
                reconstructor: algorithm.build(LinkMode::Topology, usize::MAX),
                predictor: match seed {
                    Some(seed) => BayesianPredictor::with_seed(
                        model,
                        predicted_items,
                        max_tail_count,
                        seed,
                    ),
                    None => BayesianPredictor::new(model, predicted_items, max_tail_count),
                },
            })
            .collect();
        Self {
            topology,
            engines,
            step_penalty: DEFAULT_STEP_PENALTY,
            report: EvaluationReport::default(),
        }
    }

    pub fn set_step_penalty(&mut self, step_penalty: f32) {
        self.step_penalty = step_penalty;
    }

    /// Scores one session. A single-page session carries no predictable
    /// transition and is only counted; longer sessions yield one trial
    /// per position after the first.
    pub fn evaluate_session(&mut self, session: &Session) {
        if session.len() <= 1 {
            self.report.trivial_sessions += 1;
            return;
        }
        for index in 1..session.len() {
            self.predict_at(session, index);
        }
        self.report.complex_sessions += 1;
    }

    /// One trial: predict the page at `index` from every shorter prefix,
    /// older cuts discounted by successive powers of the step penalty.
    fn predict_at(&mut self, session: &Session, index: usize) {
        let target = session.pages()[index].trim();
        let mut outcomes: HashMap<Algorithm, (bool, bool)> = HashMap::new();

        for engine in &mut self.engines {
            let mut candidates = Vec::new();
            for cut in (1..=index).rev() {
                let prefix = session.truncated(cut);
                let penalty = self.step_penalty.powi((index - cut) as i32);
                candidates.extend(engine.reconstructor.reconstruct(
                    &self.topology,
                    &prefix,
                    penalty,
                    false,
                ));
            }

            let mut matched = Vec::new();
            let predicted = engine.predictor.predict_next_item(&candidates, &mut matched);
            let hit = predicted.contains(target);
            let empty = predicted.is_empty();
            debug!(
                algorithm = engine.algorithm.label(),
                target,
                hit,
                candidates = candidates.len(),
                "prediction trial"
            );
            self.report.record(engine.algorithm.label(), hit, empty);
            outcomes.insert(engine.algorithm, (hit, empty));
        }

        // Combined complete + time-oriented predictor.
        if let (Some(&(to_hit, to_empty)), Some(&(csra_hit, csra_empty))) = (
            outcomes.get(&Algorithm::TimeOriented),
            outcomes.get(&Algorithm::CompleteSra),
        ) {
            self.report
                .record("CTO", to_hit || csra_hit, to_empty && csra_empty);
        }
        self.report.tries += 1;
    }

    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    pub fn into_report(self) -> EvaluationReport {
        self.report
    }
}
