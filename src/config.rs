use crate::error::{Result, ScriptWalkError};
use serde::Deserialize;
use std::path::Path;

/// Minimum length, in characters, of a string literal flagged as a shellcode candidate
pub const DEFAULT_SHELLCODE_MIN_LENGTH: usize = 32;

/// Maximum node nesting lowered from the parse tree before descent stops
pub const MAX_LOWERING_DEPTH: usize = 500;

/// Tunables for a single script analysis
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// String literals at least this long are reported as shellcode candidates
    pub shellcode_min_length: usize,
    /// Nodes nested deeper than this are replaced by opaque placeholders
    pub max_depth: usize,
    /// Treat any syntax error reported by the parser as a parse failure
    /// instead of walking the partial tree
    pub reject_syntax_errors: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            shellcode_min_length: DEFAULT_SHELLCODE_MIN_LENGTH,
            max_depth: MAX_LOWERING_DEPTH,
            reject_syntax_errors: false, // tolerant, hostile scripts are often broken on purpose
        }
    }
}

impl AnalysisOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ScriptWalkError::configuration(format!("invalid options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shellcode_min_length == 0 {
            return Err(ScriptWalkError::configuration(
                "shellcode_min_length must be greater than 0",
            ));
        }
        if self.max_depth == 0 {
            return Err(ScriptWalkError::configuration("max_depth must be greater than 0"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_shellcode_min_length(mut self, length: usize) -> Self {
        self.shellcode_min_length = length;
        self
    }

    #[must_use]
    pub fn with_reject_syntax_errors(mut self, reject: bool) -> Self {
        self.reject_syntax_errors = reject;
        self
    }
}
