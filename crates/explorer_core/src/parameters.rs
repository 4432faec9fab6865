//! Sampling controls sent with every generation request.

use explorer_error::{GenerationError, GenerationErrorKind};
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `temperature`.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Temperature, nucleus threshold and top-k for one request.
///
/// Defaults match the slider positions of the chat UI: 0.7, 0.95 and 40.
///
/// # Examples
///
/// ```
/// use explorer_core::GenerationParameters;
///
/// let params = GenerationParameters::builder()
///     .temperature(0.2)
///     .top_k(10u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*params.top_p(), 0.95);
/// assert!(params.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default)]
#[serde(default)]
pub struct GenerationParameters {
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling threshold
    #[serde(alias = "nucleus_threshold")]
    top_p: f32,
    /// Number of highest-probability tokens considered
    top_k: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

impl GenerationParameters {
    /// Creates parameters from raw values without validating them.
    pub fn new(temperature: f32, top_p: f32, top_k: u32) -> Self {
        Self {
            temperature,
            top_p,
            top_k,
        }
    }

    /// Returns a builder seeded with the defaults.
    pub fn builder() -> GenerationParametersBuilder {
        GenerationParametersBuilder::default()
    }

    /// Check every control is inside its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::InvalidParameters`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(GenerationError::new(GenerationErrorKind::InvalidParameters(
                format!(
                    "temperature must be within [0, {}], got {}",
                    MAX_TEMPERATURE, self.temperature
                ),
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(GenerationError::new(GenerationErrorKind::InvalidParameters(
                format!("top_p must be within [0, 1], got {}", self.top_p),
            )));
        }
        if self.top_k < 1 {
            return Err(GenerationError::new(GenerationErrorKind::InvalidParameters(
                "top_k must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}
