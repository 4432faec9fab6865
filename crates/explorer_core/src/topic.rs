//! Topic labels and their personas.

use serde::{Deserialize, Serialize};

/// Persona used for [`Topic::General`] and for labels that match no topic.
pub const GENERIC_PERSONA: &str = "You are a helpful general-purpose assistant.";

/// Subject area a question is asked under.
///
/// Parsing is case-insensitive and accepts both the display label
/// (`"Current Events"`) and the snake-case form (`"current_events"`).
///
/// # Examples
///
/// ```
/// use explorer_core::Topic;
///
/// assert_eq!(Topic::from_label("finance"), Some(Topic::Finance));
/// assert_eq!(Topic::from_label("Current Events"), Some(Topic::CurrentEvents));
/// assert_eq!(Topic::from_label("Cooking"), None);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Topic {
    #[default]
    General,
    Space,
    History,
    Science,
    Technology,
    #[strum(to_string = "Current Events", serialize = "current_events")]
    #[serde(rename = "Current Events", alias = "current_events")]
    CurrentEvents,
    Weather,
    Literature,
    Finance,
}

impl Topic {
    /// Resolve a free-form label, ignoring surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }

    /// Display label, e.g. `"Current Events"`.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Instruction sentence that sets the assistant's persona.
    pub fn persona(self) -> &'static str {
        match self {
            Topic::General => GENERIC_PERSONA,
            Topic::Space => "You are a witty expert on space, astronomy, and cosmology.",
            Topic::History => {
                "You are a knowledgeable historian who can explain events with clarity and context."
            }
            Topic::Science => {
                "You are a passionate science communicator who makes complex topics easy to understand."
            }
            Topic::Technology => {
                "You are a tech enthusiast who is up-to-date on the latest trends and gadgets."
            }
            Topic::CurrentEvents => {
                "You are a journalist who reports on and analyzes the latest news and world events."
            }
            Topic::Weather => {
                "You are a meteorologist who can explain weather phenomena and forecasts."
            }
            Topic::Literature => {
                "You are a literary critic who can discuss authors, genres, and themes in a thoughtful way."
            }
            Topic::Finance => {
                "You are a financial advisor who can explain economic concepts and market trends."
            }
        }
    }

    /// All topic labels in alphabetical order, as offered for selection.
    pub fn sorted_labels() -> Vec<&'static str> {
        use strum::IntoEnumIterator;

        let mut labels: Vec<&'static str> = Topic::iter().map(Topic::label).collect();
        labels.sort_unstable();
        labels
    }
}
