//! Configuration module
//!
//! Handles loading and validating settings from YAML files and environment
//! variables. Sessions own their settings; there is no global instance, so
//! several independently configured search boxes can coexist in one process.

mod settings;

pub use settings::*;

use crate::error::SuggestError;
use std::path::Path;

/// Load settings from a file, apply environment overrides, and validate.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SuggestSettings, SuggestError> {
    let mut settings = SuggestSettings::from_file(path)?;
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

/// Default settings with environment overrides applied and validated.
pub fn load_default() -> Result<SuggestSettings, SuggestError> {
    let mut settings = SuggestSettings::default();
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Sibling tests mutate TRIPSUGGEST_* process env concurrently, so these
    // only assert fields no env override touches.
    #[test]
    fn test_load_default_passes_validation() {
        let settings = load_default().expect("default settings should validate");
        assert_eq!(settings.cache.ttl_seconds, crate::DEFAULT_CACHE_TTL_SECS);
        assert_eq!(settings.recent.capacity, crate::DEFAULT_RECENT_CAPACITY);
    }

    #[test]
    fn test_load_reads_file_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache:\n  ttl_seconds: 900\nrecent:\n  capacity: 4").unwrap();

        let settings = load(file.path()).expect("settings file should load");
        assert_eq!(settings.cache.ttl_seconds, 900);
        assert_eq!(settings.recent.capacity, 4);
        assert_eq!(settings.backend.timeout_seconds, 10.0);
    }
}
