//! Comparison harness: independent baseline vs debate on the same turn.
//!
//! Both methods judge the exact same [`Interaction`]. Per turn we record
//! each method's per-juror scores and average plus
//! `score_delta = debate − independent`; across a run, the mean of the
//! per-turn averages and the overall delta.
//!
//! Reported figures are rounded to three decimals. The raw means from
//! [`crate::score::mean`] are not.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::completion::{CompletionError, CompletionService};
use crate::debate::{self, DebateConfig, DebateError, DebateOrchestrator};
use crate::independent::{self, IndependentScorer};
use crate::interaction::Interaction;
use crate::persona::PersonaRegistry;
use crate::score::{mean, ScoreSheet};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("independent scoring failed on turn {turn}: {source}")]
    Independent {
        turn: usize,
        #[source]
        source: CompletionError,
    },

    #[error("debate scoring failed on turn {turn}: {source}")]
    Debate {
        turn: usize,
        #[source]
        source: DebateError,
    },

    #[error(transparent)]
    Config(#[from] DebateError),
}

/// Round to three decimals for reporting.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Debate average minus independent average, unrounded.
pub fn score_delta(debate_average: f64, independent_average: f64) -> f64 {
    debate_average - independent_average
}

/// One method's result for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodEval {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate_rounds: Option<u32>,
    pub per_juror_scores: Vec<f64>,
    pub avg_human_score: f64,
    pub parse_failures: usize,
}

impl MethodEval {
    pub fn from_sheet(method: &str, sheet: &ScoreSheet, debate_rounds: Option<u32>) -> Self {
        Self {
            method: method.to_string(),
            debate_rounds,
            per_juror_scores: sheet.scores.clone(),
            avg_human_score: round3(sheet.average()),
            parse_failures: sheet.parse_failures,
        }
    }
}

/// Result record for one conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number (1-indexed).
    pub turn: usize,
    pub question: String,
    pub answer: String,
    pub independent_eval: MethodEval,
    pub debate_eval: MethodEval,
    pub score_delta: f64,
}

impl TurnRecord {
    pub fn new(
        turn: usize,
        interaction: &Interaction,
        independent: &ScoreSheet,
        debate: &ScoreSheet,
        debate_rounds: u32,
    ) -> Self {
        let independent_eval = MethodEval::from_sheet(independent::METHOD_NAME, independent, None);
        let debate_eval = MethodEval::from_sheet(debate::METHOD_NAME, debate, Some(debate_rounds));
        let score_delta = round3(score_delta(
            debate_eval.avg_human_score,
            independent_eval.avg_human_score,
        ));
        Self {
            turn,
            question: interaction.question().to_string(),
            answer: interaction.answer().to_string(),
            independent_eval,
            debate_eval,
            score_delta,
        }
    }
}

/// Run-level aggregate over all turns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub turns: usize,
    pub independent_avg: f64,
    pub debate_avg: f64,
    pub overall_delta: f64,
    pub independent_parse_failures: usize,
    pub debate_parse_failures: usize,
}

impl ComparisonSummary {
    /// Aggregate turn records. Zero turns yields all-zero averages.
    pub fn from_turns(turns: &[TurnRecord]) -> Self {
        let independent: Vec<f64> = turns
            .iter()
            .map(|t| t.independent_eval.avg_human_score)
            .collect();
        let debate: Vec<f64> = turns.iter().map(|t| t.debate_eval.avg_human_score).collect();

        let independent_avg = round3(mean(&independent));
        let debate_avg = round3(mean(&debate));
        Self {
            turns: turns.len(),
            independent_avg,
            debate_avg,
            overall_delta: round3(score_delta(debate_avg, independent_avg)),
            independent_parse_failures: turns
                .iter()
                .map(|t| t.independent_eval.parse_failures)
                .sum(),
            debate_parse_failures: turns.iter().map(|t| t.debate_eval.parse_failures).sum(),
        }
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "independent avg: {:.3} | debate avg: {:.3} | delta: {:+.3} | {} turns",
            self.independent_avg, self.debate_avg, self.overall_delta, self.turns
        )
    }
}

/// Runs both scoring methods over each turn's interaction.
pub struct ComparisonHarness {
    jury_models: Vec<String>,
    independent: IndependentScorer,
    debate: DebateOrchestrator,
}

impl ComparisonHarness {
    pub fn new(
        service: Arc<dyn CompletionService>,
        jury_models: Vec<String>,
        personas: PersonaRegistry,
        config: DebateConfig,
    ) -> Result<Self, HarnessError> {
        let independent = IndependentScorer::new(service.clone(), config.score_policy);
        let debate = DebateOrchestrator::with_config(service, personas, config)?;
        Ok(Self {
            jury_models,
            independent,
            debate,
        })
    }

    pub fn jury_models(&self) -> &[String] {
        &self.jury_models
    }

    pub fn debate_rounds(&self) -> u32 {
        self.debate.config().num_rounds
    }

    /// Judge one turn with the baseline, then the debate.
    pub async fn judge_turn(
        &self,
        turn: usize,
        interaction: &Interaction,
    ) -> Result<TurnRecord, HarnessError> {
        info!(turn, "independent scoring");
        let independent = self
            .independent
            .judge(&self.jury_models, interaction)
            .await
            .map_err(|source| HarnessError::Independent { turn, source })?;

        info!(turn, "debate scoring");
        let debate = self
            .debate
            .judge(&self.jury_models, interaction)
            .await
            .map_err(|source| HarnessError::Debate { turn, source })?;

        let record = TurnRecord::new(
            turn,
            interaction,
            &independent,
            &debate.scores,
            self.debate_rounds(),
        );
        info!(
            turn,
            independent = record.independent_eval.avg_human_score,
            debate = record.debate_eval.avg_human_score,
            delta = record.score_delta,
            "turn judged"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChatMessage;
    use crate::score::ScorePolicy;
    use crate::testing::{scripted_juror, StubService};

    fn sheet(scores: &[f64]) -> ScoreSheet {
        ScoreSheet {
            scores: scores.to_vec(),
            parse_failures: 0,
        }
    }

    fn interaction() -> Interaction {
        Interaction::new("Do you ever get tired of this job?", "Some days, yeah. Mondays mostly.")
    }

    #[test]
    fn test_turn_delta() {
        let independent = sheet(&[0.1, 0.9]);
        let debate = sheet(&[0.6, 0.7]);
        assert!((score_delta(debate.average(), independent.average()) - 0.15).abs() < 1e-9);

        let record = TurnRecord::new(1, &interaction(), &independent, &debate, 2);
        assert_eq!(record.independent_eval.avg_human_score, 0.5);
        assert_eq!(record.debate_eval.avg_human_score, 0.65);
        assert_eq!(record.score_delta, 0.15);
        assert_eq!(record.independent_eval.method, independent::METHOD_NAME);
        assert_eq!(record.independent_eval.debate_rounds, None);
        assert_eq!(record.debate_eval.method, debate::METHOD_NAME);
        assert_eq!(record.debate_eval.debate_rounds, Some(2));
        assert_eq!(record.question, interaction().question());
    }

    #[test]
    fn test_empty_scores_average_zero() {
        let record = TurnRecord::new(1, &interaction(), &sheet(&[]), &sheet(&[]), 2);
        assert_eq!(record.independent_eval.avg_human_score, 0.0);
        assert_eq!(record.debate_eval.avg_human_score, 0.0);
        assert_eq!(record.score_delta, 0.0);
    }

    #[test]
    fn test_summary_over_turns() {
        let turns = vec![
            TurnRecord::new(1, &interaction(), &sheet(&[0.1, 0.9]), &sheet(&[0.6, 0.7]), 2),
            TurnRecord::new(2, &interaction(), &sheet(&[0.3]), &sheet(&[0.4]), 2),
        ];
        let summary = ComparisonSummary::from_turns(&turns);
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.independent_avg, 0.4);
        assert_eq!(summary.debate_avg, 0.525);
        assert_eq!(summary.overall_delta, 0.125);
        assert!(summary.summary_line().contains("delta: +0.125"));
    }

    #[test]
    fn test_summary_without_turns() {
        let summary = ComparisonSummary::from_turns(&[]);
        assert_eq!(summary.independent_avg, 0.0);
        assert_eq!(summary.debate_avg, 0.0);
        assert_eq!(summary.overall_delta, 0.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.15000000000000002), 0.15);
        assert_eq!(round3(0.66666), 0.667);
        assert_eq!(round3(-0.0004), 0.0);
    }

    #[tokio::test]
    async fn test_judge_turn_runs_both_methods() {
        let stub = StubService::new(scripted_juror);
        let harness = ComparisonHarness::new(
            stub.clone(),
            vec!["juror-a".to_string(), "juror-b".to_string()],
            PersonaRegistry::default(),
            DebateConfig::default(),
        )
        .unwrap();
        assert_eq!(harness.jury_models(), ["juror-a", "juror-b"]);
        assert_eq!(harness.debate_rounds(), 2);

        let record = harness.judge_turn(1, &interaction()).await.unwrap();
        assert_eq!(record.independent_eval.per_juror_scores, vec![0.2, 0.8]);
        assert_eq!(record.debate_eval.per_juror_scores, vec![0.2, 0.8]);
        assert_eq!(record.score_delta, 0.0);
        // 2 baseline calls + 2 jurors x 2 rounds.
        assert_eq!(stub.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_empty_jury_turn() {
        let stub = StubService::new(scripted_juror);
        let harness = ComparisonHarness::new(
            stub,
            vec![],
            PersonaRegistry::default(),
            DebateConfig::default(),
        )
        .unwrap();

        let record = harness.judge_turn(1, &interaction()).await.unwrap();
        assert_eq!(record.independent_eval.avg_human_score, 0.0);
        assert_eq!(record.debate_eval.avg_human_score, 0.0);
    }

    #[tokio::test]
    async fn test_debate_failure_tagged_with_turn() {
        let stub = StubService::new(|model: &str, messages: &[ChatMessage]| {
            // Baseline requests have two messages; fail only inside the debate.
            if messages.len() > 2 || messages[0].content.contains("persona") {
                Err(CompletionError::RequestFailed("timeout".to_string()))
            } else {
                scripted_juror(model, messages)
            }
        });
        let harness = ComparisonHarness::new(
            stub,
            vec!["juror-a".to_string()],
            PersonaRegistry::default(),
            DebateConfig {
                num_rounds: 1,
                score_policy: ScorePolicy::default(),
            },
        )
        .unwrap();

        let err = harness.judge_turn(3, &interaction()).await.unwrap_err();
        assert!(matches!(err, HarnessError::Debate { turn: 3, .. }));
    }

    #[test]
    fn test_zero_rounds_is_config_error() {
        let result = ComparisonHarness::new(
            StubService::new(scripted_juror),
            vec![],
            PersonaRegistry::default(),
            DebateConfig {
                num_rounds: 0,
                score_policy: ScorePolicy::default(),
            },
        );
        assert!(matches!(result, Err(HarnessError::Config(DebateError::NoRounds))));
    }
}
