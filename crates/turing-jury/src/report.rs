//! Run report: configuration, per-turn records, and summary, written as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use coordination::{ComparisonSummary, TurnRecord};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;

/// Configuration echoed into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfigRecord {
    pub role_play_model: String,
    pub interrogator_model: String,
    pub jury_models: Vec<String>,
    pub max_turns: usize,
    pub debate_rounds: u32,
    pub parse_failure_score: f64,
    pub prompt_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_file: Option<PathBuf>,
}

impl From<&RunConfig> for RunConfigRecord {
    fn from(config: &RunConfig) -> Self {
        Self {
            role_play_model: config.role_play_model.clone(),
            interrogator_model: config.interrogator_model.clone(),
            jury_models: config.jury_models.clone(),
            max_turns: config.max_turns,
            debate_rounds: config.debate_rounds,
            parse_failure_score: config.score_policy.parse_failure_score,
            prompt_version: coordination::prompts::PROMPT_VERSION.to_string(),
            questions_file: config.questions_file.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: RunConfigRecord,
    pub summary: ComparisonSummary,
    pub turns: Vec<TurnRecord>,
}

impl RunReport {
    pub fn new(config: RunConfigRecord, turns: Vec<TurnRecord>) -> Self {
        Self {
            config,
            summary: ComparisonSummary::from_turns(&turns),
            turns,
        }
    }
}

/// Write the report as pretty JSON.
///
/// Writes to a sibling temp file and renames it into place, so the
/// destination only ever holds a complete report.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Output path has no file name: {}", path.display()))?;
    let temp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Err(e) = std::fs::write(&temp_path, content) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to write {}", temp_path.display()));
    }
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to move report into {}", path.display()));
    }
    Ok(())
}

/// "results.json" -> "results-20260108-010530.json"
pub fn timestamped_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let timestamp = now.format("%Y%m%d-%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let parent = path.parent().unwrap_or(Path::new(""));
    parent.join(format!("{}-{}.{}", stem, timestamp, ext))
}

/// Read scripted questions: one per line, blank lines and `#` comments skipped.
pub fn load_questions(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions from {}", path.display()))?;
    Ok(parse_questions(&text))
}

pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
