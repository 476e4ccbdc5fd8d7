use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading fence configuration.
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("empty {0} pattern")]
    /// A begin or end pattern was blank.
    EmptyPattern(&'static str),

    #[error("mode '{mode}': {source}")]
    /// A named mode in a table failed validation.
    InvalidMode {
        /// The mode name.
        mode: String,
        /// The validation failure.
        #[source]
        source: Box<ConfigError>,
    },
}
