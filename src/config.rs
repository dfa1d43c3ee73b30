use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level codemap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodemapConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Per-rule settings, keyed by rule name. The value is handed to the
    /// rule's `configure` as-is.
    #[serde(default)]
    pub rules: HashMap<String, serde_json::Value>,
}

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Depth used for call-graph expansion when the caller gives none.
    #[serde(default = "default_depth")]
    pub default_depth: i32,
}

fn default_depth() -> i32 {
    5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
        }
    }
}

impl CodemapConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = CodemapConfig::load(Path::new("/no/such/codemap.toml"));
        assert_eq!(config.analysis.default_depth, 5);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn parses_analysis_and_rule_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codemap.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
[analysis]
default_depth = 3

[rules.god-class]
maxMethods = 10
"#
        )
        .unwrap();

        let config = CodemapConfig::load(&path);
        assert_eq!(config.analysis.default_depth, 3);
        assert_eq!(config.rules["god-class"]["maxMethods"], 10);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codemap.toml");
        std::fs::write(&path, "[[[not toml").unwrap();
        assert_eq!(CodemapConfig::load(&path).analysis.default_depth, 5);
    }
}
