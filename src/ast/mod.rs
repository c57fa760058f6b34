//! Typed node model for the walker
//!
//! The parse tree produced by tree-sitter is lowered into these types once,
//! up front. Only the node kinds the walker cares about get their own
//! variant; everything else becomes [`Node::Other`] and keeps its grammar
//! kind name for diagnostics. Children are optional at the type level so a
//! broken script yields missing fields rather than a failed walk.

mod literal;
pub mod lower;

pub use lower::lower_tree;

/// 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Single-line location, handy for hand-built trees
    pub fn line(line: usize) -> Self {
        Self {
            start: Position { line, column: 0 },
            end: Position { line, column: 0 },
        }
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    VariableDeclaration,
    FunctionDeclaration,
    ExpressionStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    ReturnStatement,
    BlockStatement,
    AssignmentExpression,
    CallExpression,
    Identifier,
    Literal,
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::ForInStatement => "ForInStatement",
            NodeKind::ForOfStatement => "ForOfStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
            NodeKind::Other => "Other",
        }
    }
}

/// Lowered script: top-level statements plus parser status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Node>,
    /// The parser recovered from at least one syntax error
    pub has_errors: bool,
    /// Some subtree was past the depth limit and replaced by a placeholder
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    ExpressionStatement(ExpressionStatement),
    If(IfStatement),
    Loop(LoopStatement),
    Return(ReturnStatement),
    Block(BlockStatement),
    Assignment(AssignmentExpression),
    Call(CallExpression),
    Identifier(Identifier),
    Literal(Literal),
    Other(OtherNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::VariableDeclaration(_) => NodeKind::VariableDeclaration,
            Node::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Node::ExpressionStatement(_) => NodeKind::ExpressionStatement,
            Node::If(_) => NodeKind::IfStatement,
            Node::Loop(stmt) => stmt.kind.node_kind(),
            Node::Return(_) => NodeKind::ReturnStatement,
            Node::Block(_) => NodeKind::BlockStatement,
            Node::Assignment(_) => NodeKind::AssignmentExpression,
            Node::Call(_) => NodeKind::CallExpression,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Literal(_) => NodeKind::Literal,
            Node::Other(_) => NodeKind::Other,
        }
    }

    /// Name used in trace output; unknown nodes report their grammar kind
    pub fn kind_name(&self) -> &str {
        match self {
            Node::Other(other) => &other.kind,
            _ => self.kind().as_str(),
        }
    }

    pub fn loc(&self) -> Option<&Location> {
        match self {
            Node::VariableDeclaration(n) => n.loc.as_ref(),
            Node::FunctionDeclaration(n) => n.loc.as_ref(),
            Node::ExpressionStatement(n) => n.loc.as_ref(),
            Node::If(n) => n.loc.as_ref(),
            Node::Loop(n) => n.loc.as_ref(),
            Node::Return(n) => n.loc.as_ref(),
            Node::Block(n) => n.loc.as_ref(),
            Node::Assignment(n) => n.loc.as_ref(),
            Node::Call(n) => n.loc.as_ref(),
            Node::Identifier(n) => n.loc.as_ref(),
            Node::Literal(n) => n.loc.as_ref(),
            Node::Other(n) => n.loc.as_ref(),
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Node::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockStatement> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Not used by the walker; kept for other consumers of the node model
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Binding target: an identifier, or a destructuring pattern as `Other`
    pub id: Option<Box<Node>>,
    pub init: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub id: Option<Identifier>,
    /// Lowered for completeness; the walker does not bind parameters
    pub params: Vec<Node>,
    pub body: Option<BlockStatement>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// Lowered for completeness; conditions are never walked
    pub test: Option<Box<Node>>,
    pub consequent: Option<Box<Node>>,
    /// Statement after `else`, already unwrapped from the else clause
    pub alternate: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    ForIn,
    ForOf,
    While,
    DoWhile,
}

impl LoopKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            LoopKind::For => NodeKind::ForStatement,
            LoopKind::ForIn => NodeKind::ForInStatement,
            LoopKind::ForOf => NodeKind::ForOfStatement,
            LoopKind::While => NodeKind::WhileStatement,
            LoopKind::DoWhile => NodeKind::DoWhileStatement,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatement {
    pub kind: LoopKind,
    /// Opaque [`Node::Other`] carrying the body's grammar kind; loop bodies
    /// are not lowered
    pub body: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub argument: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub body: Vec<Node>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// Operator token as written (`=`, `+=`, `&&=`, ...)
    pub operator: Option<String>,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// Lowered for completeness; only arguments are inspected
    pub callee: Option<Box<Node>>,
    pub arguments: Vec<Node>,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub loc: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    /// Source text of the literal, quotes and escapes untouched
    pub raw: Option<String>,
    pub loc: Option<Location>,
}

impl Literal {
    /// Decoded value when the literal is a string
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Any node kind the walker has no handler for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherNode {
    pub kind: String,
    pub loc: Option<Location>,
}
