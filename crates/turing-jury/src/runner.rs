//! Comparison run: conversation turns judged by both scoring methods.

use std::sync::Arc;

use anyhow::{Context, Result};
use coordination::{
    ComparisonHarness, CompletionService, DebateConfig, PersonaRegistry, TurnRecord,
};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::conversation::{Conversation, QuestionSource};
use crate::report::{RunConfigRecord, RunReport};

/// Drive up to `max_turns` turns and judge each one.
///
/// With `questions`, the interrogator model is not called and the run stops
/// early when the list runs out.
pub async fn run_comparison(
    service: Arc<dyn CompletionService>,
    config: &RunConfig,
    questions: Option<Vec<String>>,
) -> Result<RunReport> {
    if config.jury_models.is_empty() {
        warn!("jury is empty; every average will be 0.0");
    }

    let harness = ComparisonHarness::new(
        service.clone(),
        config.jury_models.clone(),
        PersonaRegistry::default(),
        DebateConfig {
            num_rounds: config.debate_rounds,
            score_policy: config.score_policy,
        },
    )
    .context("Invalid debate configuration")?;

    let source = match questions {
        Some(list) => {
            info!(count = list.len(), "using scripted questions");
            QuestionSource::scripted(list)
        }
        None => QuestionSource::interrogator(config.interrogator_model.as_str()),
    };
    let mut conversation = Conversation::new(service, config.role_play_model.as_str(), source);

    info!(
        role_play = %config.role_play_model,
        jury = config.jury_models.len(),
        max_turns = config.max_turns,
        debate_rounds = config.debate_rounds,
        "starting comparison run"
    );

    let mut turns: Vec<TurnRecord> = Vec::with_capacity(config.max_turns);
    for turn in 1..=config.max_turns {
        let interaction = match conversation
            .next_turn()
            .await
            .with_context(|| format!("conversation failed on turn {turn}"))?
        {
            Some(interaction) => interaction,
            None => {
                info!(turn, "question list exhausted");
                break;
            }
        };
        let record = harness.judge_turn(turn, &interaction).await?;
        turns.push(record);
    }

    Ok(RunReport::new(RunConfigRecord::from(config), turns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coordination::{ChatMessage, CompletionError};

    /// Every juror answers with a fixed score; other roles echo a stock line.
    struct FixedScore(f64);

    #[async_trait]
    impl CompletionService for FixedScore {
        async fn complete(
            &self,
            model: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, CompletionError> {
            if model.starts_with("juror") {
                Ok(format!("HUMAN_SCORE={}\nsounds tired enough", self.0))
            } else {
                Ok(format!("{model} says hi"))
            }
        }
    }

    fn config(jury: &[&str], max_turns: usize) -> RunConfig {
        RunConfig {
            role_play_model: "agent".to_string(),
            interrogator_model: "interrogator".to_string(),
            jury_models: jury.iter().map(|m| m.to_string()).collect(),
            max_turns,
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn test_runs_max_turns_with_interrogator() {
        let report = run_comparison(
            Arc::new(FixedScore(0.4)),
            &config(&["juror-a", "juror-b"], 2),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.turns.len(), 2);
        assert_eq!(report.turns[0].question, "interrogator says hi");
        assert_eq!(report.turns[1].turn, 2);
        assert_eq!(report.summary.independent_avg, 0.4);
        assert_eq!(report.summary.debate_avg, 0.4);
        assert_eq!(report.summary.overall_delta, 0.0);
    }

    #[tokio::test]
    async fn test_scripted_questions_cap_turns() {
        let questions = vec!["one?".to_string()];
        let report = run_comparison(
            Arc::new(FixedScore(0.9)),
            &config(&["juror-a"], 3),
            Some(questions),
        )
        .await
        .unwrap();

        assert_eq!(report.turns.len(), 1);
        assert_eq!(report.turns[0].question, "one?");
        assert_eq!(report.summary.turns, 1);
    }

    #[tokio::test]
    async fn test_zero_rounds_rejected() {
        let mut cfg = config(&["juror-a"], 1);
        cfg.debate_rounds = 0;
        let err = run_comparison(Arc::new(FixedScore(0.5)), &cfg, None)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid debate configuration"));
    }
}
