//! wavemark-core configuration

use std::path::PathBuf;

/// Watermarking configuration
///
/// The tag path is supplied explicitly at construction time. The core never
/// consults the environment or any process-wide default; resolving the path
/// (flag, environment variable, compiled default) is the caller's job.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the voice tag asset mixed into watermarked output
    pub tag_path: PathBuf,
}

impl Config {
    /// Create a configuration with an explicit tag path
    pub fn new(tag_path: impl Into<PathBuf>) -> Self {
        Self {
            tag_path: tag_path.into(),
        }
    }
}
