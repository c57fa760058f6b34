//! Output formatting.
//!
//! - Human-readable terminal output with colors
//! - JSON output for machine consumption

use crate::types::{AnalysisResult, BreakpointKind, ShellcodeCandidate};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "1";

/// Longest candidate prefix shown in terminal output
const PREVIEW_LEN: usize = 48;

/// Result of walking one file
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub path: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// All files of one run plus the shared registry contents
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub schema_version: &'static str,
    pub scripts: Vec<ScriptReport>,
    /// Candidates correlated across every analyzed script
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registry: Vec<ShellcodeCandidate>,
}

impl RunReport {
    pub fn new(scripts: Vec<ScriptReport>, registry: Vec<ShellcodeCandidate>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scripts,
            registry,
        }
    }
}

pub fn format_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_terminal(report: &RunReport) -> String {
    let mut output = String::new();

    for script in &report.scripts {
        output.push_str(&format_script(script));
    }

    if report.scripts.len() > 1 && !report.registry.is_empty() {
        output.push_str(&format!(
            "{} {} distinct shellcode candidate(s) across {} scripts\n",
            "Σ".bright_white(),
            report.registry.len().to_string().bright_red().bold(),
            report.scripts.len()
        ));
    }

    output
}

fn format_script(script: &ScriptReport) -> String {
    let result = &script.result;
    let mut output = format!("├─ {}\n", script.path.bright_white());

    if result.is_empty() {
        output.push_str(&format!("│     {}\n", "nothing found".dimmed()));
        output.push_str("│\n");
        return output;
    }

    if !result.bindings.is_empty() {
        output.push_str("│     ≡ bindings\n");
        for binding in &result.bindings {
            output.push_str(&format!("│       {} {}\n", binding.name, format!("({})", binding.scope).dimmed()));
        }
    }

    if !result.value_assignments.is_empty() {
        output.push_str("│     ≡ literal assignments\n");
        for value in &result.value_assignments {
            output.push_str(&format!(
                "│       {} = {} {}\n",
                value.name,
                truncate(&value.raw, PREVIEW_LEN),
                format!("({})", value.scope).dimmed()
            ));
        }
    }

    if !result.breakpoints.is_empty() {
        output.push_str("│     ≡ breakpoints\n");
        for bp in &result.breakpoints {
            let kind = match bp.kind {
                BreakpointKind::Assignment => bp.kind.to_string().bright_cyan(),
                BreakpointKind::Loop => bp.kind.to_string().bright_yellow(),
            };
            output.push_str(&format!(
                "│       line {:<5} {} {}\n",
                bp.line,
                kind,
                format!("({})", bp.scope).dimmed()
            ));
        }
    }

    if !result.shellcodes.is_empty() {
        output.push_str("│     ≡ shellcode candidates\n");
        for candidate in &result.shellcodes {
            output.push_str(&format!(
                "│       {} {}\n",
                format_candidate(candidate).bright_red(),
                format!("[{} {}]", candidate.encoding(), candidate.len()).dimmed()
            ));
        }
    }

    output.push_str("│\n");
    output
}

/// Short hex (for bytes) or text preview of a candidate
pub fn format_candidate(candidate: &ShellcodeCandidate) -> String {
    match candidate {
        ShellcodeCandidate::Bytes(bytes) => {
            let shown = &bytes[..bytes.len().min(PREVIEW_LEN / 2)];
            let mut preview = hex::encode(shown);
            if shown.len() < bytes.len() {
                preview.push('…');
            }
            preview
        }
        ShellcodeCandidate::Text(text) => truncate(text, PREVIEW_LEN),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut shown: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        shown.push('…');
    }
    shown
}
