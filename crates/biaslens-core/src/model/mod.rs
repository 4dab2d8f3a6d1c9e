mod pattern;
mod types;

pub use pattern::{BiasCategory, BiasType, DetectedPattern, Severity};
pub use types::*;
