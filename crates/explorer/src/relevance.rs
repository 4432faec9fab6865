//! Keyword screening for topic-restricted sessions.

use explorer_core::Topic;
use explorer_error::{SessionError, SessionErrorKind};

/// Terms that mark a question as being about space.
pub const SPACE_KEYWORDS: &[&str] = &[
    "space", "astronomy", "cosmos", "universe", "galaxy", "galaxies", "star", "stars",
    "planet", "planets", "solar system", "moon", "mars", "venus", "jupiter", "saturn",
    "neptune", "uranus", "mercury", "pluto", "asteroid", "comet", "meteor", "nebula",
    "black hole", "wormhole", "dark matter", "dark energy", "cosmic", "stellar",
    "interstellar", "extraterrestrial", "alien", "ufo", "nasa", "esa", "spacex",
    "rocket", "satellite", "space station", "iss", "hubble", "james webb",
    "telescope", "constellation", "zodiac", "astronaut", "cosmonaut", "orbit",
    "gravity", "einstein", "relativity", "big bang", "expansion", "redshift",
    "light year", "parsec", "quasar", "pulsar", "supernova", "nova",
];

/// Whether the question mentions any space keyword.
///
/// Matching is a case-insensitive substring test, so `"Stars"` and
/// `"starlight"` both match.
pub fn is_space_related(question: &str) -> bool {
    let lowered = question.to_lowercase();
    SPACE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Reject questions that clearly do not belong to a screened topic.
///
/// Only [`Topic::Space`] has a keyword list; every other topic passes.
pub fn check_relevance(topic: &str, question: &str) -> Result<(), SessionError> {
    match Topic::from_label(topic) {
        Some(Topic::Space) if !is_space_related(question) => Err(SessionError::new(
            SessionErrorKind::OffTopic(Topic::Space.label().to_string()),
        )),
        _ => Ok(()),
    }
}
