//! Flattening a conversation into a single prompt string.
//!
//! The completion endpoint is called with one user content rather than a
//! structured multi-turn payload, so prior turns are rendered as
//! speaker-prefixed lines ahead of the new prompt.

use shared::agent_api::{Role, Turn};

/// Render `history` followed by `prompt` as `Speaker: text` lines.
///
/// Every history line ends with a newline; the prompt line does not.
pub fn flatten(history: &[Turn], prompt: &str) -> String {
    let mut out = String::new();
    for turn in history {
        out.push_str(turn.role.speaker());
        out.push_str(": ");
        out.push_str(&turn.text);
        out.push('\n');
    }
    out.push_str(Role::User.speaker());
    out.push_str(": ");
    out.push_str(prompt);
    out
}
