//! Compiled fence patterns.
//!
//! A [`FencePatterns`] value is the immutable pair of line predicates a highlighter is built
//! with. It is compiled once from a [`FenceConfig`] and never changes for the lifetime of the
//! highlighter.

use chunk_core_lang::{ConfigError, FenceConfig};
use regex::Regex;
use thiserror::Error;

/// Which of the two fence patterns an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceRole {
    /// The block-opening pattern.
    Begin,
    /// The block-closing pattern.
    End,
}

impl std::fmt::Display for FenceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin => f.write_str("begin"),
            Self::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Error)]
/// Errors produced while compiling fence patterns.
pub enum FenceError {
    #[error("invalid fence configuration: {0}")]
    /// The configuration failed validation.
    Config(#[from] ConfigError),

    #[error("regex compile error for {role} pattern '{pattern}': {source}")]
    /// A pattern failed to compile.
    Regex {
        /// Which pattern failed.
        role: FenceRole,
        /// The pattern string.
        pattern: String,
        /// The regex compiler error.
        #[source]
        source: regex::Error,
    },
}

/// Begin/end line predicates plus the terminator mode.
#[derive(Debug, Clone)]
pub struct FencePatterns {
    begin: Regex,
    end: Regex,
    text_is_terminator: bool,
}

impl FencePatterns {
    /// Build from already-compiled regexes.
    pub fn new(begin: Regex, end: Regex, text_is_terminator: bool) -> Self {
        Self {
            begin,
            end,
            text_is_terminator,
        }
    }

    /// Validate and compile a [`FenceConfig`].
    pub fn compile(config: &FenceConfig) -> Result<Self, FenceError> {
        config.validate()?;
        Ok(Self::new(
            compile_pattern(FenceRole::Begin, &config.begin)?,
            compile_pattern(FenceRole::End, &config.end)?,
            config.text_is_terminator,
        ))
    }

    /// Returns `true` if `line` opens a block.
    pub fn matches_begin(&self, line: &str) -> bool {
        self.begin.is_match(line)
    }

    /// Returns `true` if `line` matches the closing pattern.
    pub fn matches_end(&self, line: &str) -> bool {
        self.end.is_match(line)
    }

    /// Whether an end line only closes a block that is currently open.
    pub fn text_is_terminator(&self) -> bool {
        self.text_is_terminator
    }
}

fn compile_pattern(role: FenceRole, pattern: &str) -> Result<Regex, FenceError> {
    Regex::new(pattern).map_err(|source| FenceError::Regex {
        role,
        pattern: pattern.to_string(),
        source,
    })
}
