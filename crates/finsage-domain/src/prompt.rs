//! Prompt assembly for the finance assistant.

use crate::persona::Persona;

/// Assemble the full instruction prompt for a user question.
///
/// Pure and deterministic: a role statement, the persona's tone and depth
/// clauses, the question verbatim, and a trailing `Output:` marker the model
/// completes after. Empty questions are rejected by the caller, not here.
pub fn build_prompt(question: &str, persona: Persona) -> String {
    format!(
        "You are a helpful personal finance assistant. {} {}\n\nUser question: {}\n\nOutput:",
        persona.tone(),
        persona.depth(),
        question
    )
}
