//! Per-walk accumulator for bindings, breakpoints and candidates

use crate::ast::Location;
use crate::dedup::OrderedSet;
use crate::types::{
    AnalysisResult, Binding, Breakpoint, BreakpointKind, Scope, ShellcodeCandidate,
    ValueAssignment,
};

/// Owned exclusively by one walk and consumed by [`ResultBuilder::finish`]
#[derive(Debug, Default)]
pub(crate) struct ResultBuilder {
    bindings: OrderedSet<Binding>,
    value_assignments: OrderedSet<ValueAssignment>,
    breakpoints: OrderedSet<Breakpoint>,
    shellcodes: OrderedSet<ShellcodeCandidate>,
}

impl ResultBuilder {
    pub fn add_binding(&mut self, name: &str, scope: &Scope) -> bool {
        self.bindings.insert(Binding::new(name, scope.clone()))
    }

    pub fn add_value_assignment(&mut self, name: &str, scope: &Scope, raw: &str) -> bool {
        self.value_assignments.insert(ValueAssignment {
            name: name.to_string(),
            scope: scope.clone(),
            raw: raw.to_string(),
        })
    }

    /// Record a breakpoint at the end line of `loc`; nodes without a
    /// location cannot be instrumented and are skipped
    pub fn set_breakpoint(
        &mut self,
        kind: BreakpointKind,
        loc: Option<&Location>,
        scope: &Scope,
    ) -> bool {
        match loc {
            Some(loc) => self
                .breakpoints
                .insert(Breakpoint::new(kind, loc.end_line(), scope.clone())),
            None => false,
        }
    }

    pub fn add_shellcode(&mut self, candidate: ShellcodeCandidate) -> bool {
        self.shellcodes.insert(candidate)
    }

    pub fn finish(self) -> AnalysisResult {
        AnalysisResult {
            bindings: self.bindings.into_iter().collect(),
            value_assignments: self.value_assignments.into_iter().collect(),
            breakpoints: self.breakpoints.into_iter().collect(),
            shellcodes: self.shellcodes.into_iter().collect(),
        }
    }
}
