//! Interrogator ↔ tech-support turn iterator.
//!
//! Each turn produces one [`Interaction`] for the jury. The tech-support
//! agent keeps its own transcript (questions as user turns, its replies as
//! assistant turns). Questions come either from an interrogator model,
//! which sees each reply before asking the next question, or from a fixed
//! list.

use std::collections::VecDeque;
use std::sync::Arc;

use coordination::{ChatMessage, CompletionError, CompletionService, Interaction};
use tracing::{debug, info};

use crate::prompts::{
    follow_up_prompt, FIRST_QUESTION_PROMPT, INTERROGATOR_SYSTEM_PROMPT, SYSTEM_ROLE_PROMPT,
};

/// Where the next question comes from.
pub enum QuestionSource {
    Interrogator {
        model: String,
        messages: Vec<ChatMessage>,
    },
    Scripted(VecDeque<String>),
}

impl QuestionSource {
    pub fn interrogator(model: impl Into<String>) -> Self {
        Self::Interrogator {
            model: model.into(),
            messages: vec![
                ChatMessage::system(INTERROGATOR_SYSTEM_PROMPT),
                ChatMessage::user(FIRST_QUESTION_PROMPT),
            ],
        }
    }

    pub fn scripted(questions: impl IntoIterator<Item = String>) -> Self {
        Self::Scripted(questions.into_iter().collect())
    }
}

pub struct Conversation {
    service: Arc<dyn CompletionService>,
    role_play_model: String,
    questions: QuestionSource,
    tech_support: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(
        service: Arc<dyn CompletionService>,
        role_play_model: impl Into<String>,
        questions: QuestionSource,
    ) -> Self {
        Self {
            service,
            role_play_model: role_play_model.into(),
            questions,
            tech_support: vec![ChatMessage::system(SYSTEM_ROLE_PROMPT)],
        }
    }

    /// Ask the next question and collect the answer.
    ///
    /// Returns `None` once a scripted question list is exhausted.
    pub async fn next_turn(&mut self) -> Result<Option<Interaction>, CompletionError> {
        let question = match &mut self.questions {
            QuestionSource::Interrogator { model, messages } => {
                let question = self.service.complete(model, messages).await?;
                messages.push(ChatMessage::assistant(question.clone()));
                question
            }
            QuestionSource::Scripted(queue) => match queue.pop_front() {
                Some(question) => question,
                None => return Ok(None),
            },
        };
        info!(question = %question, "interrogator");

        self.tech_support.push(ChatMessage::user(question.clone()));
        let answer = self
            .service
            .complete(&self.role_play_model, &self.tech_support)
            .await?;
        self.tech_support.push(ChatMessage::assistant(answer.clone()));
        info!(answer = %answer, "tech support");

        if let QuestionSource::Interrogator { messages, .. } = &mut self.questions {
            messages.push(ChatMessage::user(follow_up_prompt(&answer)));
        }
        debug!(transcript = self.tech_support.len(), "turn complete");

        Ok(Some(Interaction::new(question, answer)))
    }

    /// Tech-support transcript so far, including its system prompt.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.tech_support
    }
}
