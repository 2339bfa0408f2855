//! Application state shared by all handlers.

use crate::config::Settings;
use crate::grading::ClassifyOptions;

/// Application state passed to all handlers.
///
/// The engine is stateless; only the classification switches live here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    pub classify: ClassifyOptions,
}

impl AppState {
    pub fn new(classify: ClassifyOptions) -> Self {
        Self { classify }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(ClassifyOptions {
            legacy_inference: settings.legacy_inference,
        })
    }
}
