use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use coordination::ScorePolicy;
use tracing::info;
use tracing_subscriber::EnvFilter;

use turing_jury::config::{
    parse_jury, RunConfig, ServiceConfig, BASE_URL_ENV, DEFAULT_JURY, DEFAULT_MODEL,
};
use turing_jury::report::{load_questions, timestamped_path, write_report};
use turing_jury::runner::run_comparison;

#[derive(Parser)]
#[command(name = "turing-jury")]
#[command(about = "Compare independent and debate jury scoring on a role-played Turing test")]
struct Cli {
    /// Where to write the JSON report
    #[arg(long, alias = "output_file_path")]
    output_file_path: PathBuf,

    /// Model playing the tech-support agent
    #[arg(long, default_value = DEFAULT_MODEL)]
    role_play_llm_model: String,

    /// Model asking the questions
    #[arg(long, default_value = DEFAULT_MODEL)]
    interrogator_llm_model: String,

    /// Jury models (comma-separated)
    #[arg(long, default_value = DEFAULT_JURY)]
    jury_llm_models: String,

    #[arg(long, default_value_t = 3)]
    max_turns: usize,

    /// Debate rounds per turn
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    debate_rounds: u32,

    /// One question per line; replaces the interrogator model
    #[arg(long)]
    questions_file: Option<PathBuf>,

    /// Score recorded when a juror's reply has no parseable score
    #[arg(long, default_value_t = 0.0)]
    parse_failure_score: f64,

    /// Append -YYYYmmdd-HHMMSS to the output file name
    #[arg(long)]
    timestamp: bool,

    /// OpenAI-compatible API base URL
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = RunConfig {
        role_play_model: cli.role_play_llm_model,
        interrogator_model: cli.interrogator_llm_model,
        jury_models: parse_jury(&cli.jury_llm_models),
        max_turns: cli.max_turns,
        debate_rounds: cli.debate_rounds,
        score_policy: ScorePolicy::with_failure_score(cli.parse_failure_score),
        questions_file: cli.questions_file,
    };

    let questions = config
        .questions_file
        .as_deref()
        .map(load_questions)
        .transpose()?;

    let mut service = ServiceConfig::default();
    if let Some(base_url) = cli.base_url {
        service.base_url = base_url;
    }
    info!(base_url = %service.base_url, timeout = ?service.timeout, "completion endpoint");
    let client = service.build_client()?;

    let report = run_comparison(Arc::new(client), &config, questions).await?;

    let output_path = if cli.timestamp {
        timestamped_path(&cli.output_file_path, chrono::Local::now())
    } else {
        cli.output_file_path
    };
    write_report(&report, &output_path)?;

    info!(
        path = %output_path.display(),
        turns = report.summary.turns,
        independent_parse_failures = report.summary.independent_parse_failures,
        debate_parse_failures = report.summary.debate_parse_failures,
        "{}",
        report.summary.summary_line()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_accepts_underscore_spelling() {
        for flag in ["--output-file-path", "--output_file_path"] {
            let cli = Cli::try_parse_from(["turing-jury", flag, "out/results.json"]).unwrap();
            assert_eq!(cli.output_file_path, PathBuf::from("out/results.json"));
        }
    }

    #[test]
    fn test_defaults_and_round_validation() {
        let cli = Cli::try_parse_from(["turing-jury", "--output-file-path", "r.json"]).unwrap();
        assert_eq!(cli.max_turns, 3);
        assert_eq!(cli.debate_rounds, 2);
        assert_eq!(parse_jury(&cli.jury_llm_models).len(), 3);

        let zero = Cli::try_parse_from([
            "turing-jury",
            "--output-file-path",
            "r.json",
            "--debate-rounds",
            "0",
        ]);
        assert!(zero.is_err());
    }
}
