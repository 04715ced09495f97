//! Score extraction from free-text juror output.
//!
//! Jurors are asked to open their reply with `HUMAN_SCORE=<value>`. The
//! parser reads the first line only, takes whatever follows the last `=`,
//! and parses it as a finite float. Anything else (including `nan` and
//! `inf`) is a [`ParsedScore::Failure`];
//! [`ScorePolicy`] turns that into the sentinel score and logs it, so one
//! noisy juror never aborts a session.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Key jurors are told to emit.
pub const SCORE_KEY: &str = "HUMAN_SCORE";

/// Score substituted for unparseable output unless configured otherwise.
pub const SENTINEL_SCORE: f64 = 0.0;

/// Outcome of parsing one juror response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedScore {
    Parsed(f64),
    Failure { raw: String },
}

/// Stateless `HUMAN_SCORE=<value>` extractor.
pub struct ScoreParser;

impl ScoreParser {
    pub fn parse(raw: &str) -> ParsedScore {
        let first_line = raw.split('\n').next().unwrap_or("");
        let value = match first_line.rsplit_once('=') {
            Some((_, value)) => value.trim(),
            None => {
                return ParsedScore::Failure {
                    raw: raw.to_string(),
                }
            }
        };

        match value.parse::<f64>() {
            Ok(score) if score.is_finite() => ParsedScore::Parsed(score),
            _ => ParsedScore::Failure {
                raw: raw.to_string(),
            },
        }
    }
}

/// A juror's resolved score. `parsed` is false when the sentinel was used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JurorScore {
    pub value: f64,
    pub parsed: bool,
}

/// What to record when a juror's output cannot be parsed.
///
/// The default sentinel (0.0) counts an unparseable reply as "definitely a
/// bot", which is indistinguishable from a confident bot verdict in the
/// averages. [`ScoreSheet::parse_failures`] keeps the count visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePolicy {
    pub parse_failure_score: f64,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            parse_failure_score: SENTINEL_SCORE,
        }
    }
}

impl ScorePolicy {
    pub fn with_failure_score(parse_failure_score: f64) -> Self {
        Self {
            parse_failure_score,
        }
    }

    /// Parse `raw` and apply the failure policy, logging the outcome.
    pub fn score_response(
        &self,
        method: &str,
        evaluator: usize,
        model: &str,
        raw: &str,
    ) -> JurorScore {
        match ScoreParser::parse(raw) {
            ParsedScore::Parsed(value) => {
                info!(method, evaluator, model, score = value, "juror score");
                JurorScore {
                    value,
                    parsed: true,
                }
            }
            ParsedScore::Failure { raw } => {
                error!(
                    method,
                    evaluator,
                    model,
                    raw = %raw,
                    sentinel = self.parse_failure_score,
                    "failed to parse {SCORE_KEY}"
                );
                JurorScore {
                    value: self.parse_failure_score,
                    parsed: false,
                }
            }
        }
    }
}

/// Per-juror scores from one scoring method, in juror order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub scores: Vec<f64>,
    pub parse_failures: usize,
}

impl ScoreSheet {
    pub fn push(&mut self, score: JurorScore) {
        if !score.parsed {
            self.parse_failures += 1;
        }
        self.scores.push(score.value);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn average(&self) -> f64 {
        mean(&self.scores)
    }
}

impl FromIterator<JurorScore> for ScoreSheet {
    fn from_iter<I: IntoIterator<Item = JurorScore>>(iter: I) -> Self {
        let mut sheet = ScoreSheet::default();
        for score in iter {
            sheet.push(score);
        }
        sheet
    }
}

/// Unweighted mean; 0.0 for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
