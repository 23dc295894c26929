use crate::error::BbsError;
use crate::extraction::Flavor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How strictly a page must match before it is taken as the schedule start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorPolicy {
    /// Page text contains both "bar" and "mark" anywhere.
    #[default]
    Loose,
    /// Page text contains all five key column names.
    Strict,
}

/// Tunables for one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub locator: LocatorPolicy,
    /// Rows are kept only when their non-empty fraction is strictly greater
    /// than `1 - sparsity_threshold`.
    pub sparsity_threshold: f64,
    /// Detection strategies, tried in order until one yields fragments.
    pub strategies: Vec<Flavor>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            locator: LocatorPolicy::Loose,
            sparsity_threshold: 0.5,
            strategies: vec![Flavor::Lattice, Flavor::Stream],
        }
    }
}

/// Load options from a JSON file. Missing fields keep their defaults.
pub fn load_options(path: &Path) -> Result<ExtractOptions, BbsError> {
    let content = std::fs::read_to_string(path).map_err(|e| BbsError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let options: ExtractOptions =
        serde_json::from_str(&content).map_err(|e| BbsError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options).map_err(|e| BbsError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(options)
}

/// Validate that options are usable.
pub fn validate_options(options: &ExtractOptions) -> Result<(), BbsError> {
    if !(0.0..=1.0).contains(&options.sparsity_threshold) {
        return Err(BbsError::InvalidOptions(format!(
            "sparsity_threshold must be within 0..=1, got {}",
            options.sparsity_threshold
        )));
    }
    if options.strategies.is_empty() {
        return Err(BbsError::InvalidOptions(
            "at least one detection strategy is required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: ExtractOptions = serde_json::from_str(r#"{ "locator": "strict" }"#).unwrap();
        assert_eq!(options.locator, LocatorPolicy::Strict);
        assert_eq!(options.sparsity_threshold, 0.5);
        assert_eq!(options.strategies, vec![Flavor::Lattice, Flavor::Stream]);
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sparsity_threshold": 0.25, "strategies": ["stream"] }}"#).unwrap();
        let options = load_options(file.path()).unwrap();
        assert_eq!(options.sparsity_threshold, 0.25);
        assert_eq!(options.strategies, vec![Flavor::Stream]);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sparsity_threshold": 1.5 }}"#).unwrap();
        assert!(matches!(
            load_options(file.path()),
            Err(BbsError::ConfigLoad { .. })
        ));
    }

    #[test]
    fn test_empty_strategies_rejected() {
        let options = ExtractOptions {
            strategies: vec![],
            ..Default::default()
        };
        assert!(validate_options(&options).is_err());
    }
}
