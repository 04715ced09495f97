//! Evaluator personas.
//!
//! Jurors in a debate must not share a viewpoint: a panel of identical
//! personas scores worse than a single juror. The registry is a fixed,
//! ordered catalog handed out cyclically, so juror slot `i` always gets
//! persona `i mod P`.

use thiserror::Error;

/// Default persona catalog, in assignment order.
pub const DEFAULT_PERSONAS: &[&str] = &[
    "You are a computational linguist. You focus on phrasing, rhythm and word \
choice: filler words, typos, hedging and uneven sentence length read as human, \
while uniform structure, list-heavy formatting and stock phrases read as machine \
generated.",
    "You are a veteran tech-support team lead who has handled thousands of live \
tickets. You judge whether the answer sounds like a real agent on shift: \
familiarity with internal tools, realistic constraints, mild impatience, and \
knowing when to say \"let me check\".",
    "You are a skeptical security analyst who hunts for prompt-following \
artifacts. You look for over-compliance, refusal boilerplate, suspicious \
consistency, and answers that dodge personal or sensory questions a human would \
answer without thinking.",
    "You are a cognitive psychologist. You weigh emotional texture, memory \
plausibility and self-reference: humans contradict themselves a little, recall \
concrete details, and react to the tone of the question rather than only its \
content.",
    "You are an ordinary customer who has chatted with many support desks. You \
go with your gut about whether you were talking to a person, and you are not \
impressed by polish alone.",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonaError {
    #[error("persona registry needs at least one persona")]
    Empty,
}

/// Ordered persona catalog with cyclic slot assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaRegistry {
    personas: Vec<String>,
}

impl PersonaRegistry {
    pub fn new(personas: Vec<String>) -> Result<Self, PersonaError> {
        if personas.is_empty() {
            return Err(PersonaError::Empty);
        }
        Ok(Self { personas })
    }

    /// Persona for juror slot `slot`.
    pub fn persona_for(&self, slot: usize) -> &str {
        &self.personas[slot % self.personas.len()]
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Always false; construction rejects an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn personas(&self) -> &[String] {
        &self.personas
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self {
            personas: DEFAULT_PERSONAS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_personas_are_distinct() {
        let registry = PersonaRegistry::default();
        assert_eq!(registry.len(), DEFAULT_PERSONAS.len());
        for (i, a) in registry.personas().iter().enumerate() {
            for b in &registry.personas()[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_persona_for_cycles() {
        let registry = PersonaRegistry::default();
        let p = registry.len();
        for slot in 0..(3 * p + 2) {
            assert_eq!(registry.persona_for(slot), DEFAULT_PERSONAS[slot % p]);
        }
    }

    #[test]
    fn test_persona_for_is_deterministic() {
        let registry =
            PersonaRegistry::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]).unwrap();
        let first: Vec<&str> = (0..7).map(|i| registry.persona_for(i)).collect();
        let second: Vec<&str> = (0..7).map(|i| registry.persona_for(i)).collect();
        assert_eq!(first, vec!["a", "b", "c", "a", "b", "c", "a"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(PersonaRegistry::new(vec![]), Err(PersonaError::Empty));
    }
}
