//! Literal inspection: call arguments, return values, initialisers

use super::Walker;
use crate::ast::{CallExpression, Literal, Node, ReturnStatement};
use crate::shellcode;
use crate::types::ShellcodeCandidate;
use tracing::{debug, warn};

impl<'a> Walker<'a> {
    pub(super) fn handle_call(&mut self, call: &CallExpression) {
        for arg in &call.arguments {
            if let Node::Literal(lit) = arg {
                self.on_literal(lit);
            }
        }
    }

    pub(super) fn on_return_statement(&mut self, stmt: &ReturnStatement) {
        if let Some(Node::Literal(lit)) = stmt.argument.as_deref() {
            self.on_literal(lit);
        }
    }

    pub(super) fn on_literal(&mut self, lit: &Literal) {
        let Some(text) = lit.as_text() else {
            return;
        };
        if let Some(candidate) = shellcode::extract(text, self.shellcode_min_length) {
            self.add_shellcode(candidate);
        }
    }

    fn add_shellcode(&mut self, candidate: ShellcodeCandidate) {
        if let Some(registry) = self.registry {
            if let Err(e) = registry.add(&candidate) {
                warn!("shellcode registry rejected candidate: {}", e);
            }
        }

        if self.builder.add_shellcode(candidate) {
            debug!("recorded shellcode candidate");
        }
    }
}
