//! Debate Judging: One-by-One Multi-Round Jury Protocol
//!
//! Every juror speaks once per round, always in index order. Within a round
//! juror `i` sees the replies of jurors `0..i` from that same round, and
//! carries its own private history from earlier rounds. Final scores come
//! from the last round only.
//!
//! # Debate Flow
//!
//! ```text
//! Idle → RoundStart → EvaluatorTurn(0) → … → EvaluatorTurn(N-1) → RoundEnd
//!            ▲                                                      │
//!            └──────────────── rounds left ─────────────────────────┤
//!                                                                   ▼
//!                                                    Aggregate → Done
//!
//! completion failure at any turn → Aborted
//! ```

pub mod orchestrator;
pub mod state;

pub use orchestrator::{DebateConfig, DebateError, DebateOrchestrator, DebateOutcome};
pub use state::{
    AgentHistory, DebatePhase, DebateSession, Evaluator, RoundTranscript, TransitionError,
    TurnRequest,
};

/// Method name recorded for debate scores.
pub const METHOD_NAME: &str = "debate_one_by_one";
