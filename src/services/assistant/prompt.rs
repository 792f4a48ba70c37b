//! Prompt construction for the two supported actions.
//!
//! The templates are part of the request contract: for a given
//! `(action, tone, email_text)` the prompt is fully deterministic and
//! contains the caller's text verbatim.

use super::models::{ActionType, Tone};

/// Instruction phrase for a reply in the given tone. The default when
/// no tone is supplied is "concise and to the point".
fn tone_phrase(tone: Option<Tone>) -> &'static str {
    match tone {
        Some(Tone::Friendly) => "friendly and warm",
        Some(Tone::Professional) => "professional and formal",
        Some(Tone::Concise) | None => "concise and to the point",
    }
}

/// Build the prompt sent to the inference provider.
///
/// Tone is only consulted for replies; summaries always use the same
/// instruction.
pub fn build_prompt(action: ActionType, tone: Option<Tone>, email_text: &str) -> String {
    match action {
        ActionType::Reply => format!(
            "Generate a {} reply to the following email. Keep it polite and appropriate:\n\n{}\n\nReply:",
            tone_phrase(tone),
            email_text
        ),
        ActionType::Summarize => format!(
            "Summarize the following email in 2-3 sentences:\n\n{}\n\nSummary:",
            email_text
        ),
    }
}
