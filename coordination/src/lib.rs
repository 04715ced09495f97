//! Jury Coordination Library
//!
//! Scores question/answer exchanges for human-likeness with a panel of
//! LLM jurors, two ways:
//! - **Independent baseline**: one isolated call per juror.
//! - **One-by-one debate**: jurors with distinct personas speak in a fixed
//!   order over several rounds, each seeing the earlier speakers of the
//!   current round and its own history from previous rounds.
//!
//! The [`comparison`] module runs both on the same interaction and reports
//! per-turn and overall deltas. All model traffic goes through the
//! [`CompletionService`] trait so tests can substitute a deterministic stub.
//!
//! # Usage
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use coordination::{
//!     ChatCompletionsClient, ComparisonHarness, DebateConfig, Interaction, PersonaRegistry,
//! };
//!
//! let client = ChatCompletionsClient::new(
//!     "https://openrouter.ai/api/v1",
//!     std::env::var("OPEN_ROUTER_API_KEY")?,
//!     Duration::from_secs(120),
//! )?;
//! let harness = ComparisonHarness::new(
//!     Arc::new(client),
//!     vec!["meta-llama/llama-3.1-8b-instruct".to_string()],
//!     PersonaRegistry::default(),
//!     DebateConfig::default(),
//! )?;
//! let record = harness
//!     .judge_turn(1, &Interaction::new("Are you a bot?", "Ha, I wish. Long shift."))
//!     .await?;
//! println!("delta = {}", record.score_delta);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod comparison;
pub mod completion;
pub mod debate;
pub mod independent;
pub mod interaction;
pub mod message;
pub mod persona;
pub mod prompts;
pub mod score;

#[cfg(test)]
mod testing;

pub use comparison::{
    round3, score_delta, ComparisonHarness, ComparisonSummary, HarnessError, MethodEval,
    TurnRecord,
};
pub use completion::{ChatCompletionsClient, CompletionError, CompletionService};
pub use debate::{
    AgentHistory, DebateConfig, DebateError, DebateOrchestrator, DebateOutcome, DebatePhase,
    DebateSession, Evaluator, RoundTranscript,
};
pub use independent::IndependentScorer;
pub use interaction::Interaction;
pub use message::{ChatMessage, ChatRole};
pub use persona::{PersonaError, PersonaRegistry, DEFAULT_PERSONAS};
pub use score::{
    mean, JurorScore, ParsedScore, ScoreParser, ScorePolicy, ScoreSheet, SENTINEL_SCORE,
};
