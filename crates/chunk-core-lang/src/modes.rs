use crate::{ConfigError, FenceConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A table of named fence configurations.
///
/// The YAML form is a mapping of mode name to [`FenceConfig`]:
///
/// ```yaml
/// sweave:
///   begin: '^\s*<<.*>>=.*$'
///   end: '^\s*@(?:\s.*)?$'
/// r_markdown:
///   begin: '^```\{r\b.*\}\s*$'
///   end: '^```\s*$'
///   text_is_terminator: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FenceModes {
    modes: BTreeMap<String, FenceConfig>,
}

impl FenceModes {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in presets, keyed by their [`FenceConfig::for_mode`] names.
    pub fn builtin() -> Self {
        let mut modes = Self::new();
        modes.insert("sweave", FenceConfig::sweave());
        modes.insert("r_markdown", FenceConfig::r_markdown());
        modes.insert("r_html", FenceConfig::r_html());
        modes.insert("markdown_fenced", FenceConfig::markdown_fenced());
        modes
    }

    /// Parse and validate a YAML mode table.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let modes: Self = serde_yaml::from_str(yaml)?;
        for (name, config) in &modes.modes {
            config.validate().map_err(|e| ConfigError::InvalidMode {
                mode: name.clone(),
                source: Box::new(e),
            })?;
        }
        Ok(modes)
    }

    /// Add or replace a mode.
    pub fn insert(&mut self, name: impl Into<String>, config: FenceConfig) {
        self.modes.insert(name.into(), config);
    }

    /// Look up a mode by name.
    pub fn get(&self, name: &str) -> Option<&FenceConfig> {
        self.modes.get(name)
    }

    /// Mode names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    /// Number of modes in the table.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
noweb:
  begin: '^<<.*>>=$'
  end: '^@$'
quarto:
  begin: '^```\{python\}$'
  end: '^```$'
  text_is_terminator: true
"#;
        let modes = FenceModes::from_yaml_str(yaml).unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes.names().collect::<Vec<_>>(), vec!["noweb", "quarto"]);

        let quarto = modes.get("quarto").unwrap();
        assert_eq!(quarto.begin, r"^```\{python\}$");
        assert!(quarto.text_is_terminator);
        assert!(!modes.get("noweb").unwrap().text_is_terminator);
    }

    #[test]
    fn test_from_yaml_str_reports_invalid_mode() {
        let yaml = "broken:\n  begin: ''\n  end: '^@$'\n";
        let err = FenceModes::from_yaml_str(yaml).unwrap_err();
        match err {
            ConfigError::InvalidMode { mode, source } => {
                assert_eq!(mode, "broken");
                assert!(matches!(*source, ConfigError::EmptyPattern("begin")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_yaml_str_rejects_malformed_yaml() {
        assert!(matches!(
            FenceModes::from_yaml_str("sweave: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_builtin_table() {
        let modes = FenceModes::builtin();
        assert_eq!(modes.len(), 4);
        assert_eq!(modes.get("r_html"), Some(&FenceConfig::r_html()));
        assert!(modes.get("missing").is_none());
    }
}
