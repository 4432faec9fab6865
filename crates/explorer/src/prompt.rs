//! Instruction text for a question under a topic.

use explorer_core::{GENERIC_PERSONA, Topic};

/// Build the instruction sent to the model for `question` under `topic`.
///
/// Known topic labels (case-insensitive) select their persona sentence;
/// any other label keeps its text in the header but falls back to
/// [`GENERIC_PERSONA`]. Never fails; rejecting empty questions is the
/// caller's job.
///
/// # Examples
///
/// ```
/// use explorer::build_prompt;
///
/// let prompt = build_prompt("Finance", "What is inflation?");
/// assert!(prompt.contains("financial advisor"));
/// assert!(prompt.contains("**Question:** What is inflation?"));
/// ```
pub fn build_prompt(topic: &str, question: &str) -> String {
    let (label, instruction) = match Topic::from_label(topic) {
        Some(known) => (known.label(), known.persona()),
        None if topic.trim().is_empty() => (Topic::General.label(), GENERIC_PERSONA),
        None => (topic.trim(), GENERIC_PERSONA),
    };

    format!(
        "**Topic:** {label}\n\
         **Instruction:** {instruction}\n\
         \n\
         Please answer the following question based on the provided topic and instruction.\n\
         \n\
         **Question:** {question}\n"
    )
}
