//! scriptwalk - static pre-pass over hostile JavaScript.
//!
//! Walks the syntax tree of a script once and records:
//! - variable bindings, scoped to `"global"` or their enclosing function
//! - breakpoints (assignments and loop headers) for later dynamic tracing
//! - long string literals that may be encoded exploit payloads
//!
//! Broken or adversarial scripts never make analysis fail; they produce an
//! empty or partial result instead.
//!
//! # Example
//!
//! ```no_run
//! use scriptwalk::{analyze_script, AnalysisOptions};
//!
//! let result = analyze_script("var x = 5;", &AnalysisOptions::default()).unwrap();
//!
//! for bp in &result.breakpoints {
//!     println!("{} breakpoint at line {} ({})", bp.kind, bp.line, bp.scope);
//! }
//! ```

mod dedup;

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod output;
pub mod shellcode;
pub mod types;
pub mod walker;

pub use analyzer::{analyze_script, ExecutionContext, ScriptAnalyzer};
pub use config::AnalysisOptions;
pub use error::{Result, ScriptWalkError};
pub use shellcode::{SharedShellcodeRegistry, ShellcodeRegistry};
pub use types::{
    AnalysisResult, Binding, Breakpoint, BreakpointKind, Scope, ShellcodeCandidate,
    ValueAssignment,
};
