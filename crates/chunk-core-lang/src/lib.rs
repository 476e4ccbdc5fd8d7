#![warn(missing_docs)]
//! `chunk-core-lang` - data-driven fence configuration for `chunk-core`.
//!
//! This crate stays lightweight and does **not** depend on a regex engine. It describes the
//! begin/end line patterns of a literate document mode as plain strings; `chunk-core` compiles
//! them into matchers.
//!
//! ```rust
//! use chunk_core_lang::{FenceConfig, FenceModes};
//!
//! let modes = FenceModes::builtin();
//! let rmd = modes.get("r_markdown").unwrap();
//! assert!(rmd.text_is_terminator);
//! assert_eq!(FenceConfig::for_mode("sweave"), Some(FenceConfig::sweave()));
//! ```

mod error;
mod modes;

pub use error::ConfigError;
pub use modes::FenceModes;

use serde::{Deserialize, Serialize};

/// Begin/end patterns for one kind of embedded block.
///
/// `begin` detects a block opener. The meaning of `end` depends on `text_is_terminator`:
/// - `false`: any line matching `end` marks the resumption of plain text, wherever it appears.
/// - `true`: a line matching `end` only closes a block that is currently open, and is consumed
///   as the last line of that block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceConfig {
    /// Regex matching a block-opening line.
    pub begin: String,
    /// Regex matching a block-closing line.
    pub end: String,
    /// Whether `end` only applies inside an open block.
    #[serde(default)]
    pub text_is_terminator: bool,
}

impl FenceConfig {
    /// Create a config from raw pattern strings.
    pub fn new(begin: impl Into<String>, end: impl Into<String>, text_is_terminator: bool) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
            text_is_terminator,
        }
    }

    /// Sweave (`.Rnw`): `<<label>>=` opens an R chunk, `@` returns to LaTeX.
    pub fn sweave() -> Self {
        Self::new(r"^\s*<<.*>>=.*$", r"^\s*@(?:\s.*)?$", false)
    }

    /// R Markdown: ```` ```{r ...} ```` opens a chunk, a bare fence closes it.
    ///
    /// A bare fence outside of an R chunk belongs to an ordinary markdown code block, so the
    /// closer is only honoured inside an open chunk.
    pub fn r_markdown() -> Self {
        Self::new(
            r"^(?:[ ]{4})?`{3,}\s*\{[Rr]\b.*\}\s*$",
            r"^(?:[ ]{4})?`{3,}\s*$",
            true,
        )
    }

    /// R HTML (`.Rhtml`): `<!--begin.rcode` ... `end.rcode-->`.
    pub fn r_html() -> Self {
        Self::new(
            r"^\s*<!--\s*begin\.rcode\s*(?:.*)",
            r"^\s*end\.rcode\s*-->",
            true,
        )
    }

    /// Plain markdown fenced code blocks with an info string (any language).
    pub fn markdown_fenced() -> Self {
        Self::new(r"^\s*(?:`{3,}|~{3,})\s*\S.*$", r"^\s*(?:`{3,}|~{3,})\s*$", true)
    }

    /// Look up a built-in preset by mode name.
    pub fn for_mode(name: &str) -> Option<Self> {
        match name {
            "sweave" => Some(Self::sweave()),
            "r_markdown" => Some(Self::r_markdown()),
            "r_html" => Some(Self::r_html()),
            "markdown_fenced" => Some(Self::markdown_fenced()),
            _ => None,
        }
    }

    /// Reject configs that cannot describe a block boundary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.begin.trim().is_empty() {
            return Err(ConfigError::EmptyPattern("begin"));
        }
        if self.end.trim().is_empty() {
            return Err(ConfigError::EmptyPattern("end"));
        }
        Ok(())
    }
}
