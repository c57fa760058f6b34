//! Lowering from the tree-sitter-javascript parse tree to [`Node`]s
//!
//! Only shapes the walker inspects are lowered in detail. Comments are
//! dropped, parentheses are looked through, and grammar kinds without a
//! dedicated variant (including `ERROR` nodes from broken input) become
//! [`Node::Other`]. Descent stops at `max_depth` so deeply nested hostile
//! input cannot exhaust the stack; the program is then marked truncated.

use super::literal::{decode_string, parse_number};
use super::{
    AssignmentExpression, BlockStatement, CallExpression, DeclarationKind, ExpressionStatement,
    FunctionDeclaration, Identifier, IfStatement, Literal, LiteralValue, Location, LoopKind,
    LoopStatement, Node, OtherNode, Position, Program, ReturnStatement, VariableDeclaration,
    VariableDeclarator,
};
use std::cell::Cell;
use tree_sitter::{Node as TsNode, Tree};

/// Kind reported for subtrees cut off by the depth limit
pub const DEPTH_LIMIT_KIND: &str = "depth_limit";

pub fn lower_tree(tree: &Tree, source: &str, max_depth: usize) -> Program {
    let root = tree.root_node();
    let lowerer = Lowerer {
        source: source.as_bytes(),
        max_depth,
        truncated: Cell::new(false),
    };

    let body = lowerer.statements(&root, 0);
    Program {
        body,
        has_errors: root.has_error(),
        truncated: lowerer.truncated.get(),
    }
}

struct Lowerer<'s> {
    source: &'s [u8],
    max_depth: usize,
    truncated: Cell<bool>,
}

impl<'s> Lowerer<'s> {
    fn node(&self, node: &TsNode, depth: usize) -> Node {
        if depth > self.max_depth {
            self.truncated.set(true);
            return Node::Other(OtherNode {
                kind: DEPTH_LIMIT_KIND.to_string(),
                loc: Some(location(node)),
            });
        }

        match node.kind() {
            "variable_declaration" | "lexical_declaration" => {
                self.variable_declaration(node, depth)
            }
            "function_declaration" | "generator_function_declaration" => {
                self.function_declaration(node, depth)
            }
            "expression_statement" => Node::ExpressionStatement(ExpressionStatement {
                expression: self.first_child(node, depth),
                loc: Some(location(node)),
            }),
            "if_statement" => self.if_statement(node, depth),
            "for_statement" => self.loop_statement(node, LoopKind::For),
            "for_in_statement" => {
                let kind = match self.field_text(node, "operator") {
                    Some("of") => LoopKind::ForOf,
                    _ => LoopKind::ForIn,
                };
                self.loop_statement(node, kind)
            }
            "while_statement" => self.loop_statement(node, LoopKind::While),
            "do_statement" => self.loop_statement(node, LoopKind::DoWhile),
            "return_statement" => Node::Return(ReturnStatement {
                argument: self.first_child(node, depth),
                loc: Some(location(node)),
            }),
            "statement_block" => Node::Block(self.block(node, depth)),
            "assignment_expression" | "augmented_assignment_expression" => {
                self.assignment(node, depth)
            }
            "call_expression" => self.call(node, depth),
            "parenthesized_expression" => match named_children(node).into_iter().next() {
                Some(inner) => self.node(&inner, depth + 1),
                None => self.other(node),
            },
            "identifier" | "undefined" => match self.identifier(node) {
                Some(ident) => Node::Identifier(ident),
                None => self.other(node),
            },
            "string" | "number" | "true" | "false" | "null" | "regex" => match self.literal(node) {
                Some(lit) => Node::Literal(lit),
                None => self.other(node),
            },
            _ => self.other(node),
        }
    }

    fn statements(&self, parent: &TsNode, depth: usize) -> Vec<Node> {
        named_children(parent)
            .iter()
            .map(|child| self.node(child, depth + 1))
            .collect()
    }

    fn block(&self, node: &TsNode, depth: usize) -> BlockStatement {
        BlockStatement {
            body: self.statements(node, depth),
            loc: Some(location(node)),
        }
    }

    fn field(&self, node: &TsNode, name: &str, depth: usize) -> Option<Box<Node>> {
        node.child_by_field_name(name)
            .map(|child| Box::new(self.node(&child, depth + 1)))
    }

    fn first_child(&self, node: &TsNode, depth: usize) -> Option<Box<Node>> {
        named_children(node)
            .into_iter()
            .next()
            .map(|child| Box::new(self.node(&child, depth + 1)))
    }

    fn field_text(&self, node: &TsNode, name: &str) -> Option<&'s str> {
        node.child_by_field_name(name)
            .and_then(|child| child.utf8_text(self.source).ok())
    }

    fn variable_declaration(&self, node: &TsNode, depth: usize) -> Node {
        let kind = match self.field_text(node, "kind") {
            Some("let") => DeclarationKind::Let,
            Some("const") => DeclarationKind::Const,
            _ => DeclarationKind::Var,
        };

        let declarations = named_children(node)
            .iter()
            .filter(|child| child.kind() == "variable_declarator")
            .map(|decl| VariableDeclarator {
                id: self.field(decl, "name", depth + 1),
                init: self.field(decl, "value", depth + 1),
                loc: Some(location(decl)),
            })
            .collect();

        Node::VariableDeclaration(VariableDeclaration {
            kind,
            declarations,
            loc: Some(location(node)),
        })
    }

    fn function_declaration(&self, node: &TsNode, depth: usize) -> Node {
        let id = node
            .child_by_field_name("name")
            .and_then(|name| self.identifier(&name));

        let params = node
            .child_by_field_name("parameters")
            .map(|params| self.statements(&params, depth))
            .unwrap_or_default();

        let body = node
            .child_by_field_name("body")
            .filter(|body| body.kind() == "statement_block")
            .map(|body| self.block(&body, depth + 1));

        Node::FunctionDeclaration(FunctionDeclaration {
            id,
            params,
            body,
            loc: Some(location(node)),
        })
    }

    fn if_statement(&self, node: &TsNode, depth: usize) -> Node {
        // `alternative` is an else_clause wrapping the actual statement
        let alternate = node
            .child_by_field_name("alternative")
            .and_then(|clause| {
                if clause.kind() == "else_clause" {
                    named_children(&clause).into_iter().next()
                } else {
                    Some(clause)
                }
            })
            .map(|stmt| Box::new(self.node(&stmt, depth + 2)));

        Node::If(IfStatement {
            test: self.field(node, "condition", depth),
            consequent: self.field(node, "consequence", depth),
            alternate,
            loc: Some(location(node)),
        })
    }

    fn loop_statement(&self, node: &TsNode, kind: LoopKind) -> Node {
        // only the header is instrumented; the body stays opaque
        Node::Loop(LoopStatement {
            kind,
            body: node
                .child_by_field_name("body")
                .map(|body| Box::new(self.other(&body))),
            loc: Some(location(node)),
        })
    }

    fn assignment(&self, node: &TsNode, depth: usize) -> Node {
        let operator = if node.kind() == "assignment_expression" {
            Some("=".to_string())
        } else {
            self.field_text(node, "operator").map(str::to_string)
        };

        Node::Assignment(AssignmentExpression {
            operator,
            left: self.field(node, "left", depth),
            right: self.field(node, "right", depth),
            loc: Some(location(node)),
        })
    }

    fn call(&self, node: &TsNode, depth: usize) -> Node {
        // tagged templates carry a template_string instead of an argument list
        let arguments = node
            .child_by_field_name("arguments")
            .filter(|args| args.kind() == "arguments")
            .map(|args| self.statements(&args, depth + 1))
            .unwrap_or_default();

        Node::Call(CallExpression {
            callee: self.field(node, "function", depth),
            arguments,
            loc: Some(location(node)),
        })
    }

    fn identifier(&self, node: &TsNode) -> Option<Identifier> {
        let name = node.utf8_text(self.source).ok()?;
        Some(Identifier {
            name: name.to_string(),
            loc: Some(location(node)),
        })
    }

    fn literal(&self, node: &TsNode) -> Option<Literal> {
        let raw = node.utf8_text(self.source).ok()?;
        let value = match node.kind() {
            "string" => LiteralValue::String(decode_string(node, self.source)?),
            "number" => LiteralValue::Number(parse_number(raw)),
            "true" => LiteralValue::Boolean(true),
            "false" => LiteralValue::Boolean(false),
            "null" => LiteralValue::Null,
            "regex" => LiteralValue::RegExp {
                pattern: self.field_text(node, "pattern").unwrap_or_default().to_string(),
                flags: self.field_text(node, "flags").unwrap_or_default().to_string(),
            },
            _ => return None,
        };

        Some(Literal {
            value,
            raw: Some(raw.to_string()),
            loc: Some(location(node)),
        })
    }

    fn other(&self, node: &TsNode) -> Node {
        Node::Other(OtherNode {
            kind: node.kind().to_string(),
            loc: Some(location(node)),
        })
    }
}

/// Named children minus extras (comments)
fn named_children<'t>(node: &TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn location(node: &TsNode) -> Location {
    let start = node.start_position();
    let end = node.end_position();
    Location::new(
        Position {
            line: start.row + 1,
            column: start.column,
        },
        Position {
            line: end.row + 1,
            column: end.column,
        },
    )
}
