//! Debate orchestrator: drives the one-by-one jury across all rounds.
//!
//! Ties the session state machine, persona registry, and score policy to a
//! completion service. Calls are awaited strictly in order: juror `i`'s
//! prompt depends on jurors `0..i` from the same round, and each round
//! depends on the histories filled in by the round before.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::completion::{CompletionError, CompletionService};
use crate::interaction::Interaction;
use crate::persona::PersonaRegistry;
use crate::score::{ScorePolicy, ScoreSheet};

use super::state::{DebateSession, Evaluator, TransitionError};

/// Configuration for the debate orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Rounds per session. Must be at least 1.
    pub num_rounds: u32,
    /// What to record for unparseable juror output.
    pub score_policy: ScorePolicy,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            num_rounds: 2,
            score_policy: ScorePolicy::default(),
        }
    }
}

/// Error from the debate orchestrator.
#[derive(Debug, Error)]
pub enum DebateError {
    #[error("debate needs at least one round")]
    NoRounds,

    #[error("completion failed in round {round} for juror {evaluator} ({model}): {source}")]
    Completion {
        round: u32,
        evaluator: usize,
        model: String,
        #[source]
        source: CompletionError,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Outcome of a completed debate session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateOutcome {
    /// Last-round scores, one per juror in speaking order.
    pub scores: ScoreSheet,
    /// The session snapshot at completion.
    pub session: DebateSession,
}

impl DebateOutcome {
    pub fn average(&self) -> f64 {
        self.scores.average()
    }

    pub fn rounds_completed(&self) -> u32 {
        self.session.current_round()
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "[DEBATE] {} rounds | {} jurors | avg={:.3} | parse_failures={}",
            self.rounds_completed(),
            self.scores.len(),
            self.average(),
            self.scores.parse_failures
        )
    }
}

/// Runs debate sessions against an injected completion service.
pub struct DebateOrchestrator {
    service: Arc<dyn CompletionService>,
    personas: PersonaRegistry,
    config: DebateConfig,
}

impl DebateOrchestrator {
    /// Create an orchestrator with the default personas and config.
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            personas: PersonaRegistry::default(),
            config: DebateConfig::default(),
        }
    }

    /// Create an orchestrator with custom personas and config.
    pub fn with_config(
        service: Arc<dyn CompletionService>,
        personas: PersonaRegistry,
        config: DebateConfig,
    ) -> Result<Self, DebateError> {
        if config.num_rounds == 0 {
            return Err(DebateError::NoRounds);
        }
        Ok(Self {
            service,
            personas,
            config,
        })
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Bind each jury model to its slot and persona.
    pub fn evaluators(&self, jury_models: &[String]) -> Vec<Evaluator> {
        jury_models
            .iter()
            .enumerate()
            .map(|(index, model)| Evaluator {
                index,
                model: model.clone(),
                persona: self.personas.persona_for(index).to_string(),
            })
            .collect()
    }

    /// Run a full debate over `interaction`.
    ///
    /// A juror whose final reply cannot be parsed gets the policy's sentinel;
    /// a failed completion aborts the session and is returned as an error.
    pub async fn judge(
        &self,
        jury_models: &[String],
        interaction: &Interaction,
    ) -> Result<DebateOutcome, DebateError> {
        let mut session = DebateSession::new(
            interaction.clone(),
            self.evaluators(jury_models),
            self.config.num_rounds,
        );
        info!(
            jurors = jury_models.len(),
            rounds = self.config.num_rounds,
            "debate session started"
        );

        while session.current_round() < session.num_rounds() {
            let round = session.begin_round()?;
            for evaluator in 0..session.evaluators().len() {
                let request = session.prepare_turn(evaluator)?;
                let result = self
                    .service
                    .complete(&request.model, &request.messages)
                    .await;
                let response = match result {
                    Ok(response) => response,
                    Err(source) => {
                        session.abort("completion failed");
                        error!(
                            round,
                            evaluator,
                            model = %request.model,
                            error = %source,
                            "juror call failed"
                        );
                        return Err(DebateError::Completion {
                            round,
                            evaluator,
                            model: request.model,
                            source,
                        });
                    }
                };
                debug!(round, evaluator, model = %request.model, "juror responded");
                session.record_response(request, response)?;
            }
            session.end_round()?;
        }

        let scores = session.aggregate(&self.config.score_policy)?;
        let outcome = DebateOutcome { scores, session };
        info!("{}", outcome.summary_line());
        Ok(outcome)
    }
}
