//! Independent scoring baseline.
//!
//! Each juror gets one isolated call: the jury system prompt and a single
//! user message with the interaction and the score instruction. No
//! history, no rounds, no visibility into other jurors. This is the
//! control condition the debate is compared against.

use std::sync::Arc;

use tracing::error;

use crate::completion::{CompletionError, CompletionService};
use crate::interaction::Interaction;
use crate::message::ChatMessage;
use crate::prompts::{independent_user_message, JURY_SYSTEM_PROMPT};
use crate::score::{ScorePolicy, ScoreSheet};

/// Method name recorded for baseline scores.
pub const METHOD_NAME: &str = "independent";

pub struct IndependentScorer {
    service: Arc<dyn CompletionService>,
    policy: ScorePolicy,
}

impl IndependentScorer {
    pub fn new(service: Arc<dyn CompletionService>, policy: ScorePolicy) -> Self {
        Self { service, policy }
    }

    /// Messages sent to every juror for `interaction`.
    pub fn request(interaction: &Interaction) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(JURY_SYSTEM_PROMPT),
            ChatMessage::user(independent_user_message(interaction)),
        ]
    }

    /// Score `interaction` with each juror once, in jury order.
    ///
    /// Calls are issued one after another; no juror's result depends on
    /// another's, so ordering does not affect the scores.
    pub async fn judge(
        &self,
        jury_models: &[String],
        interaction: &Interaction,
    ) -> Result<ScoreSheet, CompletionError> {
        let messages = Self::request(interaction);
        let mut sheet = ScoreSheet::default();

        for (juror, model) in jury_models.iter().enumerate() {
            let raw = self
                .service
                .complete(model, &messages)
                .await
                .inspect_err(|e| error!(juror, model = %model, error = %e, "juror call failed"))?;
            sheet.push(self.policy.score_response(METHOD_NAME, juror, model, &raw));
        }

        Ok(sheet)
    }
}
