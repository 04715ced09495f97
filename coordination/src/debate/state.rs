//! Debate state machine: phases, per-juror history, and round transcripts.

use serde::{Deserialize, Serialize};

use crate::interaction::Interaction;
use crate::message::ChatMessage;
use crate::prompts::{debate_user_message, juror_system_prompt};
use crate::score::{ScorePolicy, ScoreSheet};

use super::METHOD_NAME;

/// Phase of a debate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Session created, no round started.
    Idle,
    /// A new round has been opened.
    RoundStart,
    /// Jurors are speaking, one at a time.
    EvaluatorTurn,
    /// Every juror has spoken this round.
    RoundEnd,
    /// Scoring the last round's transcript.
    Aggregate,
    /// Final scores computed.
    Done,
    /// A completion call failed mid-session.
    Aborted,
}

impl DebatePhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::Idle => &[Self::RoundStart, Self::Aborted],
            // RoundStart → RoundEnd only happens with an empty jury.
            Self::RoundStart => &[Self::EvaluatorTurn, Self::RoundEnd, Self::Aborted],
            Self::EvaluatorTurn => &[Self::EvaluatorTurn, Self::RoundEnd, Self::Aborted],
            Self::RoundEnd => &[Self::RoundStart, Self::Aggregate, Self::Aborted],
            Self::Aggregate => &[Self::Done, Self::Aborted],
            Self::Done | Self::Aborted => &[],
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::RoundStart => write!(f, "round_start"),
            Self::EvaluatorTurn => write!(f, "evaluator_turn"),
            Self::RoundEnd => write!(f, "round_end"),
            Self::Aggregate => write!(f, "aggregate"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} → {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for TransitionError {}

/// A juror slot: index, model, and the persona assigned at session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluator {
    pub index: usize,
    pub model: String,
    pub persona: String,
}

impl Evaluator {
    pub fn system_message(&self) -> ChatMessage {
        ChatMessage::system(juror_system_prompt(&self.persona))
    }
}

/// Append-only message log private to one juror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentHistory {
    entries: Vec<ChatMessage>,
}

impl AgentHistory {
    fn push(&mut self, message: ChatMessage) {
        self.entries.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw juror responses for one round, in speaking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTranscript {
    /// Round number (1-indexed).
    pub round: u32,
    pub responses: Vec<String>,
}

impl RoundTranscript {
    fn new(round: u32) -> Self {
        Self {
            round,
            responses: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// One outbound juror call, built by [`DebateSession::prepare_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub round: u32,
    pub evaluator: usize,
    pub model: String,
    /// The new user message for this round (recorded into history later).
    pub user_message: ChatMessage,
    /// Full outbound transcript: persona system prompt, history, user message.
    pub messages: Vec<ChatMessage>,
}

/// State for judging one interaction across all rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    phase: DebatePhase,
    interaction: Interaction,
    evaluators: Vec<Evaluator>,
    histories: Vec<AgentHistory>,
    transcripts: Vec<RoundTranscript>,
    current_round: u32,
    num_rounds: u32,
}

impl DebateSession {
    pub fn new(interaction: Interaction, evaluators: Vec<Evaluator>, num_rounds: u32) -> Self {
        let histories = vec![AgentHistory::default(); evaluators.len()];
        Self {
            phase: DebatePhase::Idle,
            interaction,
            evaluators,
            histories,
            transcripts: Vec::new(),
            current_round: 0,
            num_rounds,
        }
    }

    fn transition(&mut self, to: DebatePhase, reason: &str) -> Result<(), TransitionError> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(self.reject(
                to,
                format!(
                    "not a valid transition (allowed: {:?})",
                    self.phase.valid_transitions()
                ),
            ));
        }
        tracing::trace!(from = %self.phase, to = %to, reason, "debate transition");
        self.phase = to;
        Ok(())
    }

    fn reject(&self, to: DebatePhase, reason: impl Into<String>) -> TransitionError {
        TransitionError {
            from: self.phase,
            to,
            reason: reason.into(),
        }
    }

    /// Open the next round. Returns its number.
    pub fn begin_round(&mut self) -> Result<u32, TransitionError> {
        if self.current_round >= self.num_rounds {
            return Err(self.reject(
                DebatePhase::RoundStart,
                format!("all {} rounds already run", self.num_rounds),
            ));
        }
        self.transition(DebatePhase::RoundStart, "round opened")?;
        self.current_round += 1;
        self.transcripts.push(RoundTranscript::new(self.current_round));
        Ok(self.current_round)
    }

    /// Build the outbound request for `evaluator`, who must be next to speak.
    pub fn prepare_turn(&mut self, evaluator: usize) -> Result<TurnRequest, TransitionError> {
        let next = self.current_transcript().map_or(0, RoundTranscript::len);
        if evaluator != next || evaluator >= self.evaluators.len() {
            return Err(self.reject(
                DebatePhase::EvaluatorTurn,
                format!("juror {evaluator} is out of turn (next speaker: {next})"),
            ));
        }
        self.transition(DebatePhase::EvaluatorTurn, "juror speaking")?;

        let round = self.current_round;
        let peers: Vec<(usize, &str)> = self
            .current_transcript()
            .map(|t| {
                t.responses
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i, r.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        let user_message = ChatMessage::user(debate_user_message(round, &self.interaction, &peers));

        let juror = &self.evaluators[evaluator];
        let mut messages = Vec::with_capacity(self.histories[evaluator].len() + 2);
        messages.push(juror.system_message());
        messages.extend(self.histories[evaluator].messages().iter().cloned());
        messages.push(user_message.clone());

        Ok(TurnRequest {
            round,
            evaluator,
            model: juror.model.clone(),
            user_message,
            messages,
        })
    }

    /// Record a juror's reply into the round transcript and its own history.
    pub fn record_response(
        &mut self,
        request: TurnRequest,
        response: String,
    ) -> Result<(), TransitionError> {
        let next = self.current_transcript().map_or(0, RoundTranscript::len);
        if self.phase != DebatePhase::EvaluatorTurn
            || request.round != self.current_round
            || request.evaluator != next
        {
            return Err(self.reject(
                DebatePhase::EvaluatorTurn,
                format!(
                    "response for juror {} in round {} does not match the open turn",
                    request.evaluator, request.round
                ),
            ));
        }

        if let Some(transcript) = self.transcripts.last_mut() {
            transcript.responses.push(response.clone());
        }
        let history = &mut self.histories[request.evaluator];
        history.push(request.user_message);
        history.push(ChatMessage::assistant(response));
        Ok(())
    }

    /// Close the current round once every juror has spoken.
    pub fn end_round(&mut self) -> Result<(), TransitionError> {
        let spoken = self.current_transcript().map_or(0, RoundTranscript::len);
        if spoken != self.evaluators.len() {
            return Err(self.reject(
                DebatePhase::RoundEnd,
                format!("{spoken} of {} jurors have spoken", self.evaluators.len()),
            ));
        }
        self.transition(DebatePhase::RoundEnd, "round closed")
    }

    /// Score the last round's transcript, one score per juror in order.
    pub fn aggregate(&mut self, policy: &ScorePolicy) -> Result<ScoreSheet, TransitionError> {
        if self.current_round != self.num_rounds {
            return Err(self.reject(
                DebatePhase::Aggregate,
                format!(
                    "only {} of {} rounds completed",
                    self.current_round, self.num_rounds
                ),
            ));
        }
        self.transition(DebatePhase::Aggregate, "final round closed")?;

        let sheet: ScoreSheet = self
            .current_transcript()
            .map(|t| {
                t.responses
                    .iter()
                    .enumerate()
                    .map(|(i, raw)| {
                        policy.score_response(METHOD_NAME, i, &self.evaluators[i].model, raw)
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.transition(DebatePhase::Done, "scores computed")?;
        Ok(sheet)
    }

    /// Mark the session aborted. No-op once terminal.
    pub fn abort(&mut self, reason: &str) {
        if !self.phase.is_terminal() {
            tracing::trace!(from = %self.phase, reason, "debate aborted");
            self.phase = DebatePhase::Aborted;
        }
    }

    fn current_transcript(&self) -> Option<&RoundTranscript> {
        self.transcripts.last()
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn evaluators(&self) -> &[Evaluator] {
        &self.evaluators
    }

    pub fn history(&self, evaluator: usize) -> Option<&AgentHistory> {
        self.histories.get(evaluator)
    }

    pub fn histories(&self) -> &[AgentHistory] {
        &self.histories
    }

    pub fn transcripts(&self) -> &[RoundTranscript] {
        &self.transcripts
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn num_rounds(&self) -> u32 {
        self.num_rounds
    }

    /// Whether the session has ended.
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | {} jurors",
            self.phase,
            self.current_round,
            self.num_rounds,
            self.evaluators.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jurors(n: usize) -> Vec<Evaluator> {
        (0..n)
            .map(|index| Evaluator {
                index,
                model: format!("m{index}"),
                persona: format!("persona {index}"),
            })
            .collect()
    }

    fn session(n: usize, rounds: u32) -> DebateSession {
        DebateSession::new(Interaction::new("q?", "a."), jurors(n), rounds)
    }

    fn speak(session: &mut DebateSession, evaluator: usize, text: &str) {
        let request = session.prepare_turn(evaluator).unwrap();
        session.record_response(request, text.to_string()).unwrap();
    }

    #[test]
    fn test_new_session() {
        let session = session(2, 3);
        assert_eq!(session.phase(), DebatePhase::Idle);
        assert_eq!(session.current_round(), 0);
        assert_eq!(session.num_rounds(), 3);
        assert_eq!(session.histories().len(), 2);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_full_session_cycle() {
        let mut s = session(2, 2);
        for round in 1..=2 {
            assert_eq!(s.begin_round().unwrap(), round);
            speak(&mut s, 0, "HUMAN_SCORE=0.4");
            speak(&mut s, 1, "HUMAN_SCORE=0.6");
            s.end_round().unwrap();
        }
        let sheet = s.aggregate(&ScorePolicy::default()).unwrap();
        assert_eq!(sheet.scores, vec![0.4, 0.6]);
        assert_eq!(s.phase(), DebatePhase::Done);
        assert_eq!(s.transcripts().len(), 2);
        assert!(s.histories().iter().all(|h| h.len() == 4));
        assert!(s.status_line().contains("round 2/2"));
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut s = session(3, 1);
        s.begin_round().unwrap();
        let err = s.prepare_turn(1).unwrap_err();
        assert_eq!(err.to, DebatePhase::EvaluatorTurn);
        assert!(err.reason.contains("out of turn"));
    }

    #[test]
    fn test_end_round_requires_every_juror() {
        let mut s = session(2, 1);
        s.begin_round().unwrap();
        speak(&mut s, 0, "HUMAN_SCORE=0.5");
        assert!(s.end_round().is_err());
    }

    #[test]
    fn test_aggregate_requires_last_round() {
        let mut s = session(1, 2);
        s.begin_round().unwrap();
        speak(&mut s, 0, "HUMAN_SCORE=0.5");
        s.end_round().unwrap();
        assert!(s.aggregate(&ScorePolicy::default()).is_err());
    }

    #[test]
    fn test_cannot_exceed_round_budget() {
        let mut s = session(1, 1);
        s.begin_round().unwrap();
        speak(&mut s, 0, "HUMAN_SCORE=0.5");
        s.end_round().unwrap();
        assert!(s.begin_round().is_err());
    }

    #[test]
    fn test_empty_jury_rounds() {
        let mut s = session(0, 2);
        for _ in 0..2 {
            s.begin_round().unwrap();
            s.end_round().unwrap();
        }
        let sheet = s.aggregate(&ScorePolicy::default()).unwrap();
        assert!(sheet.is_empty());
        assert_eq!(sheet.average(), 0.0);
    }

    #[test]
    fn test_abort_is_terminal() {
        let mut s = session(2, 2);
        s.begin_round().unwrap();
        s.abort("completion failed");
        assert!(s.is_complete());
        assert_eq!(s.phase(), DebatePhase::Aborted);
        assert!(s.begin_round().is_err());
    }

    #[test]
    fn test_invalid_transition_display() {
        let mut s = session(1, 1);
        let err = s.end_round().unwrap_err();
        assert_eq!(err.from, DebatePhase::Idle);
        assert!(err.to_string().contains("idle → round_end"));
    }
}
