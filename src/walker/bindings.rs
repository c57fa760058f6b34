//! Declaration and assignment handlers

use super::Walker;
use crate::ast::{AssignmentExpression, ExpressionStatement, Node, VariableDeclaration};
use crate::types::{BreakpointKind, Scope};
use tracing::trace;

/// Assignment operators that mark a state mutation.
///
/// Logical assignments (`&&=`, `||=`, `??=`) and `**=` are not in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Sar,
    Shr,
    BitOr,
    BitXor,
    BitAnd,
}

impl AssignmentOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" => Self::Assign,
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "%=" => Self::Mod,
            "<<=" => Self::Shl,
            ">>=" => Self::Sar,
            ">>>=" => Self::Shr,
            "|=" => Self::BitOr,
            "^=" => Self::BitXor,
            "&=" => Self::BitAnd,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
            Self::Shl => "<<=",
            Self::Sar => ">>=",
            Self::Shr => ">>>=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::BitAnd => "&=",
        }
    }
}

impl<'a> Walker<'a> {
    pub(super) fn on_variable_declaration(&mut self, declaration: &VariableDeclaration, scope: &Scope) {
        for decl in &declaration.declarations {
            // destructuring patterns carry no single name
            let Some(ident) = decl.id.as_deref().and_then(Node::as_identifier) else {
                continue;
            };

            self.builder.add_binding(&ident.name, scope);

            let Some(init) = decl.init.as_deref() else {
                continue;
            };

            self.builder
                .set_breakpoint(BreakpointKind::Assignment, decl.loc.as_ref(), scope);

            if let Node::Literal(lit) = init {
                if let Some(raw) = &lit.raw {
                    self.builder.add_value_assignment(&ident.name, scope, raw);
                }
                self.on_literal(lit);
            }
        }
    }

    pub(super) fn on_expression_statement(&mut self, stmt: &ExpressionStatement, scope: &Scope) {
        match stmt.expression.as_deref() {
            Some(Node::Assignment(assign)) => self.handle_assignment(stmt, assign, scope),
            Some(Node::Call(call)) => self.handle_call(call),
            _ => {}
        }
    }

    fn handle_assignment(
        &mut self,
        stmt: &ExpressionStatement,
        assign: &AssignmentExpression,
        scope: &Scope,
    ) {
        let Some(operator) = assign.operator.as_deref() else {
            return;
        };
        if AssignmentOperator::from_token(operator).is_none() {
            trace!(operator, "ignoring non-mutating assignment operator");
            return;
        }
        let (Some(left), Some(right)) = (assign.left.as_deref(), assign.right.as_deref()) else {
            return;
        };

        if let Some(ident) = left.as_identifier() {
            self.builder.add_binding(&ident.name, scope);
        }

        self.visit(left, scope);
        self.visit(right, scope);

        // member targets (`a.b = ...`) still mark a mutation point
        self.builder
            .set_breakpoint(BreakpointKind::Assignment, stmt.loc.as_ref(), scope);
    }
}
