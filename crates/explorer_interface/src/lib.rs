//! Trait seams for the Knowledge Explorer library.
//!
//! - [`GenerativeDriver`] - remote text generation, blocking or streaming
//! - [`FileStore`] - remote attachment upload and state lookup
//! - [`DisplaySurface`] - incremental rendering of an answer

mod driver;
mod files;
mod surface;

pub use driver::{GenerativeDriver, TextStream};
pub use files::FileStore;
pub use surface::{DisplaySurface, NullSurface};
