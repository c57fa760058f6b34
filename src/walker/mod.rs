//! Statement walker
//!
//! Visits a statement list in source order and hands each node to the
//! handler registered for its kind. Kinds without a handler are skipped, and
//! a handler that finds an expected child missing returns without effect, so
//! one malformed node never ends the walk.
//!
//! Scope is a single label passed down by reference: `"global"` at the top,
//! the function's own name inside a function body. Only function bodies and
//! block-shaped `if`/`else` branches are walked recursively. Loop bodies,
//! bare blocks and unbraced branches are never entered, so statements inside
//! them produce no bindings or breakpoints.

mod bindings;
mod collector;
mod literals;

pub use bindings::AssignmentOperator;

use crate::ast::{FunctionDeclaration, IfStatement, LoopKind, LoopStatement, Node, Program};
use crate::config::AnalysisOptions;
use crate::shellcode::ShellcodeRegistry;
use crate::types::{AnalysisResult, BreakpointKind, Scope};
use collector::ResultBuilder;
use tracing::trace;

/// Walk a lowered program from the top with scope `"global"`
pub fn walk_program(
    program: &Program,
    options: &AnalysisOptions,
    registry: Option<&dyn ShellcodeRegistry>,
) -> AnalysisResult {
    let mut walker = Walker::new(options, registry);
    walker.walk(&program.body, &Scope::global());
    walker.finish()
}

pub struct Walker<'a> {
    builder: ResultBuilder,
    shellcode_min_length: usize,
    registry: Option<&'a dyn ShellcodeRegistry>,
}

impl<'a> Walker<'a> {
    pub fn new(options: &AnalysisOptions, registry: Option<&'a dyn ShellcodeRegistry>) -> Self {
        Self {
            builder: ResultBuilder::default(),
            shellcode_min_length: options.shellcode_min_length,
            registry,
        }
    }

    pub fn walk(&mut self, body: &[Node], scope: &Scope) {
        for node in body {
            self.visit(node, scope);
        }
    }

    pub fn finish(self) -> AnalysisResult {
        self.builder.finish()
    }

    fn visit(&mut self, node: &Node, scope: &Scope) {
        match node {
            Node::VariableDeclaration(decl) => self.on_variable_declaration(decl, scope),
            Node::FunctionDeclaration(func) => self.on_function_declaration(func),
            Node::ExpressionStatement(stmt) => self.on_expression_statement(stmt, scope),
            Node::If(stmt) => self.on_if_statement(stmt, scope),
            Node::Loop(stmt) if stmt.kind != LoopKind::ForOf => self.on_loop_statement(stmt, scope),
            Node::Return(stmt) => self.on_return_statement(stmt),
            Node::Literal(lit) => self.on_literal(lit),
            _ => trace!(kind = node.kind_name(), "no handler"),
        }
    }

    fn on_function_declaration(&mut self, func: &FunctionDeclaration) {
        let (Some(id), Some(body)) = (&func.id, &func.body) else {
            return;
        };

        // replaces the enclosing scope, nested functions do not stack
        self.walk(&body.body, &Scope::function(id.name.as_str()));
    }

    fn on_if_statement(&mut self, stmt: &IfStatement, scope: &Scope) {
        // alternate first, matching the order bindings have always been reported in
        for branch in [&stmt.alternate, &stmt.consequent] {
            if let Some(block) = branch.as_deref().and_then(Node::as_block) {
                self.walk(&block.body, scope);
            }
        }
    }

    fn on_loop_statement(&mut self, stmt: &LoopStatement, scope: &Scope) {
        self.builder
            .set_breakpoint(BreakpointKind::Loop, stmt.loc.as_ref(), scope);
    }
}
