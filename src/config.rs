//! Runtime settings.
//!
//! Settings come from built-in defaults, then `SWEEPER_*` environment
//! variables, then whatever the front end overrides. Nothing is read from or
//! written to disk.

use serde::Serialize;

/// Number of rows shown in the preview, matching a dataframe `head()`.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Rows scanned when inferring CSV column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

pub const ENV_PREVIEW_ROWS: &str = "SWEEPER_PREVIEW_ROWS";
pub const ENV_INFER_SCHEMA_LENGTH: &str = "SWEEPER_INFER_SCHEMA_LENGTH";
pub const ENV_LOG_TO_FILE: &str = "SWEEPER_LOG_TO_FILE";
pub const ENV_LOG_LEVEL: &str = "SWEEPER_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Rows returned by [`crate::pipeline::TabularPipeline::preview`].
    pub preview_rows: usize,
    /// Rows the CSV reader looks at before fixing each column's type.
    pub infer_schema_length: usize,
    /// Also write logs to a daily rolling file in the platform data directory.
    pub log_to_file: bool,
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            log_to_file: false,
            log_level: "info".to_owned(),
        }
    }
}

impl Settings {
    /// Defaults overridden by any `SWEEPER_*` variables in the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup. Values that fail to parse are
    /// ignored with a warning and the previous value is kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rows) = parse_var(&lookup, ENV_PREVIEW_ROWS) {
            self.preview_rows = rows;
        }
        if let Some(len) = parse_var::<usize, _>(&lookup, ENV_INFER_SCHEMA_LENGTH)
            && len > 0
        {
            self.infer_schema_length = len;
        }
        if let Some(raw) = lookup(ENV_LOG_TO_FILE) {
            self.log_to_file = matches!(
                raw.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL)
            && !level.trim().is_empty()
        {
            self.log_level = level.trim().to_owned();
        }
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.preview_rows, 5);
        assert_eq!(settings.infer_schema_length, 10_000);
        assert!(!settings.log_to_file);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default().with_overrides(lookup_from(&[
            (ENV_PREVIEW_ROWS, "12"),
            (ENV_INFER_SCHEMA_LENGTH, "500"),
            (ENV_LOG_TO_FILE, "TRUE"),
            (ENV_LOG_LEVEL, "debug"),
        ]));
        assert_eq!(settings.preview_rows, 12);
        assert_eq!(settings.infer_schema_length, 500);
        assert!(settings.log_to_file);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let settings = Settings::default().with_overrides(lookup_from(&[
            (ENV_PREVIEW_ROWS, "lots"),
            (ENV_INFER_SCHEMA_LENGTH, "0"),
            (ENV_LOG_LEVEL, "  "),
        ]));
        assert_eq!(settings, Settings::default());
    }
}
