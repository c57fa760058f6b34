//! Shellcode candidate heuristic and registry
//!
//! The heuristic is deliberately coarse: any string literal of at least
//! `min_length` characters is a candidate. Qualifying strings are transcoded
//! to one byte per character when they fit in Latin-1 so later binary
//! signature matching sees raw bytes (`"\x90\x90"` becomes `90 90`).

use crate::dedup::OrderedSet;
use crate::error::Result;
use crate::types::ShellcodeCandidate;
use parking_lot::Mutex;

/// True if `value` is long enough to be reported
pub fn is_candidate(value: &str, min_length: usize) -> bool {
    // cheap upper bound before counting characters
    if value.len() < min_length {
        return false;
    }
    value.chars().count() >= min_length
}

/// Latin-1 bytes when every character is at most U+00FF, the text otherwise
pub fn transcode(value: &str) -> ShellcodeCandidate {
    let bytes: Option<Vec<u8>> = value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match bytes {
        Some(bytes) => ShellcodeCandidate::Bytes(bytes),
        None => ShellcodeCandidate::Text(value.to_string()),
    }
}

/// Apply the heuristic and transcode in one go
pub fn extract(value: &str, min_length: usize) -> Option<ShellcodeCandidate> {
    is_candidate(value, min_length).then(|| transcode(value))
}

/// Cross-script store of shellcode candidates.
///
/// Implementations must be safe to call from several analyses at once and
/// must treat duplicate inserts as no-ops.
pub trait ShellcodeRegistry: Send + Sync {
    /// Record a candidate, returning true if it was not known yet
    fn add(&self, candidate: &ShellcodeCandidate) -> Result<bool>;
}

/// In-process registry shared between concurrent analyses
#[derive(Debug, Default)]
pub struct SharedShellcodeRegistry {
    candidates: Mutex<OrderedSet<ShellcodeCandidate>>,
}

impl SharedShellcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.lock().is_empty()
    }

    pub fn contains(&self, candidate: &ShellcodeCandidate) -> bool {
        self.candidates.lock().contains(candidate)
    }

    /// Copy of the registry contents in first-seen order
    pub fn snapshot(&self) -> Vec<ShellcodeCandidate> {
        self.candidates.lock().iter().cloned().collect()
    }
}

impl ShellcodeRegistry for SharedShellcodeRegistry {
    fn add(&self, candidate: &ShellcodeCandidate) -> Result<bool> {
        Ok(self.candidates.lock().insert(candidate.clone()))
    }
}
