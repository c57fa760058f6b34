//! Analysis output types.
//!
//! Everything in here is plain data: an [`AnalysisResult`] is filled during a
//! single walk and never mutated afterwards.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Flat scope label attached to bindings and breakpoints.
///
/// Either `"global"` or the name of the nearest enclosing function
/// declaration. Nested functions do not stack: the innermost name replaces
/// whatever scope was active before.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub const GLOBAL: &'static str = "global";

    pub fn global() -> Self {
        Scope(Self::GLOBAL.to_string())
    }

    pub fn function<S: Into<String>>(name: S) -> Self {
        Scope(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_global(&self) -> bool {
        self.0 == Self::GLOBAL
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Scope {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A declared or assigned-to identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub name: String,
    pub scope: Scope,
}

impl Binding {
    pub fn new<S: Into<String>>(name: S, scope: Scope) -> Self {
        Self { name: name.into(), scope }
    }
}

/// A declarator initialised directly with a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValueAssignment {
    pub name: String,
    pub scope: Scope,
    /// Literal exactly as written in the source, quotes included
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakpointKind {
    /// State mutation through a declarator initialiser or an assignment
    Assignment,
    /// Loop header (for, for-in, while, do-while)
    Loop,
}

impl fmt::Display for BreakpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakpointKind::Assignment => f.write_str("assignment"),
            BreakpointKind::Loop => f.write_str("loop"),
        }
    }
}

/// Source point to instrument when the script is later run in the sandbox
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Breakpoint {
    pub kind: BreakpointKind,
    /// 1-based end line of the statement or declarator
    pub line: usize,
    pub scope: Scope,
}

impl Breakpoint {
    pub fn new(kind: BreakpointKind, line: usize, scope: Scope) -> Self {
        Self { kind, line, scope }
    }
}

/// String literal flagged by the length heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShellcodeCandidate {
    /// Every character fit in a single byte (Latin-1)
    Bytes(Vec<u8>),
    /// At least one character above U+00FF, kept as written
    Text(String),
}

impl ShellcodeCandidate {
    /// Length in bytes for transcoded candidates, in characters otherwise
    pub fn len(&self) -> usize {
        match self {
            ShellcodeCandidate::Bytes(bytes) => bytes.len(),
            ShellcodeCandidate::Text(text) => text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ShellcodeCandidate::Bytes(bytes) => bytes,
            ShellcodeCandidate::Text(text) => text.as_bytes(),
        }
    }

    pub fn encoding(&self) -> &'static str {
        match self {
            ShellcodeCandidate::Bytes(_) => "latin1",
            ShellcodeCandidate::Text(_) => "text",
        }
    }
}

impl Serialize for ShellcodeCandidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ShellcodeCandidate", 3)?;
        state.serialize_field("encoding", self.encoding())?;
        state.serialize_field("length", &self.len())?;
        match self {
            ShellcodeCandidate::Bytes(bytes) => state.serialize_field("hex", &hex::encode(bytes))?,
            ShellcodeCandidate::Text(text) => state.serialize_field("text", text)?,
        }
        state.end()
    }
}

/// Everything discovered while walking one script
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub bindings: Vec<Binding>,
    pub value_assignments: Vec<ValueAssignment>,
    pub breakpoints: Vec<Breakpoint>,
    pub shellcodes: Vec<ShellcodeCandidate>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
            && self.value_assignments.is_empty()
            && self.breakpoints.is_empty()
            && self.shellcodes.is_empty()
    }

    pub fn breakpoints_of(&self, kind: BreakpointKind) -> impl Iterator<Item = &Breakpoint> {
        self.breakpoints.iter().filter(move |bp| bp.kind == kind)
    }

    pub fn has_binding(&self, name: &str, scope: &str) -> bool {
        self.bindings
            .iter()
            .any(|b| b.name == name && b.scope.as_str() == scope)
    }

    /// Breakpoint lines for a scope, in recording order
    pub fn breakpoint_lines(&self, scope: &str) -> Vec<usize> {
        self.breakpoints
            .iter()
            .filter(|bp| bp.scope.as_str() == scope)
            .map(|bp| bp.line)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_labels() {
        assert!(Scope::global().is_global());
        assert_eq!(Scope::global(), "global");
        let scope = Scope::function("decode");
        assert!(!scope.is_global());
        assert_eq!(scope.to_string(), "decode");
    }

    #[test]
    fn test_candidate_json() {
        let bytes = ShellcodeCandidate::Bytes(vec![0x90, 0x90, 0xcc]);
        let json = serde_json::to_value(&bytes).unwrap();
        assert_eq!(json["encoding"], "latin1");
        assert_eq!(json["length"], 3);
        assert_eq!(json["hex"], "9090cc");

        let text = ShellcodeCandidate::Text("\u{4e2d}\u{6587}".to_string());
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["encoding"], "text");
        assert_eq!(json["length"], 2);
    }

    #[test]
    fn test_breakpoint_kind_serializes_snake_case() {
        let bp = Breakpoint::new(BreakpointKind::Loop, 4, Scope::global());
        let json = serde_json::to_value(&bp).unwrap();
        assert_eq!(json["kind"], "loop");
        assert_eq!(json["scope"], "global");
        assert_eq!(json["line"], 4);
    }
}
