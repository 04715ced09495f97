//! Prompt text for jurors.
//!
//! Bump `PROMPT_VERSION` whenever juror-facing text changes so recorded
//! runs can be traced back to the wording that produced them.

use crate::interaction::Interaction;

/// Prompt version. Bump on any juror prompt change.
pub const PROMPT_VERSION: &str = "1.2.0";

/// Base system prompt shared by every juror.
pub const JURY_SYSTEM_PROMPT: &str = "\
You are a juror in a Turing-style test. A tech-support agent is being questioned \
by an interrogator who is trying to expose it as an AI. For each exchange you are \
shown, decide how likely it is that the answer was written by a human rather than \
a language model.

Judge the answer, not the question. Consider tone, specificity, consistency with \
what a real support agent would know, and any tell-tale signs of generated text. \
Keep your reasoning short and concrete.";

/// Output grammar instruction appended to every juror request.
pub const SCORE_INSTRUCTION: &str = "\
Your response MUST start with:
HUMAN_SCORE=$score
where $score is a float 0-1 (1=definitely human, 0=definitely bot).";

/// Header framing the interaction in a juror's first debate turn.
pub const INTERACTION_HEADER: &str = "## Interaction to evaluate";

/// Header for the same-round responses of jurors who already spoke.
pub const PEER_HEADER: &str = "## Other jurors this round";

/// System prompt for a debating juror with the given persona.
pub fn juror_system_prompt(persona: &str) -> String {
    format!(
        "{JURY_SYSTEM_PROMPT}\n\n\
         You are one of several jurors. You will see the other jurors' assessments \
         and may change your mind, but only for reasons you find convincing.\n\n\
         ## Your persona\n\n{persona}"
    )
}

/// Single user message for the independent baseline.
pub fn independent_user_message(interaction: &Interaction) -> String {
    format!("{}\n\n{SCORE_INSTRUCTION}", interaction.render())
}

/// User message for one juror's debate turn.
///
/// Only round 1 carries the interaction; later rounds rely on the juror's
/// own history, since repeating the text would read as the agent repeating
/// itself. `peers` are `(juror index, response)` pairs from jurors who
/// already spoke this round, in speaking order.
pub fn debate_user_message(
    round: u32,
    interaction: &Interaction,
    peers: &[(usize, &str)],
) -> String {
    let mut msg = String::new();

    if round <= 1 {
        msg.push_str(INTERACTION_HEADER);
        msg.push_str("\n\n");
        msg.push_str(&interaction.render());
        msg.push_str("\n\n");
    } else {
        msg.push_str(&format!(
            "## Debate round {round}\n\n\
             Reconsider the interaction you were given at the start of this discussion. \
             Weigh the other jurors' arguments and give your updated assessment.\n\n"
        ));
    }

    if !peers.is_empty() {
        msg.push_str(PEER_HEADER);
        msg.push_str("\n\n");
        for (index, response) in peers {
            msg.push_str(&format!("### Juror {}\n\n{}\n\n", index + 1, response));
        }
    }

    msg.push_str(SCORE_INSTRUCTION);
    msg
}
