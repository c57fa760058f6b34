use thiserror::Error;

/// Errors raised by the walker and its collaborators.
///
/// None of these escape [`crate::ScriptAnalyzer::analyze`]: a failed parse
/// degrades to an empty result and a failed registry insert is only logged.
#[derive(Debug, Error)]
pub enum ScriptWalkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load JavaScript grammar: {message}")]
    Grammar { message: String },

    #[error("script parsing failed: {reason}")]
    Parse { reason: String },

    #[error("parser crashed while parsing script")]
    ParserCrash,

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("shellcode registry rejected candidate: {message}")]
    Registry { message: String },
}

pub type Result<T> = std::result::Result<T, ScriptWalkError>;

impl ScriptWalkError {
    pub fn grammar<S: Into<String>>(message: S) -> Self {
        Self::Grammar { message: message.into() }
    }

    pub fn parse<S: Into<String>>(reason: S) -> Self {
        Self::Parse { reason: reason.into() }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::Registry { message: message.into() }
    }

    /// Returns true if the error came from the script itself rather than from
    /// the environment the walker runs in
    pub fn is_hostile_input(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::ParserCrash)
    }
}
