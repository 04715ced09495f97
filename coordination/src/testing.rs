//! Deterministic completion stub shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::completion::{CompletionError, CompletionService};
use crate::message::ChatMessage;

type Responder =
    Box<dyn Fn(&str, &[ChatMessage]) -> Result<String, CompletionError> + Send + Sync>;

/// Records every call and answers with a pure function of (model, messages).
pub(crate) struct StubService {
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    respond: Responder,
}

impl StubService {
    pub(crate) fn new(
        respond: impl Fn(&str, &[ChatMessage]) -> Result<String, CompletionError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for StubService {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        (self.respond)(model, messages)
    }
}

/// Fixed per-model score, tagged with the debate round inferred from the
/// request length (system + 2 per prior round + user).
pub(crate) fn scripted_juror(
    model: &str,
    messages: &[ChatMessage],
) -> Result<String, CompletionError> {
    let score = match model {
        "juror-a" => "0.2",
        "juror-b" => "0.8",
        "juror-c" => "0.5",
        _ => return Ok(format!("I refuse to give a number ({model})")),
    };
    let round = messages.len() / 2;
    Ok(format!("HUMAN_SCORE={score}\n{model} argues in round {round}"))
}
