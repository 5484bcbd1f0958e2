//! Typed syntax tree for the C-like source language.
//!
//! Every node kind the grammar produces has exactly one variant (or one
//! typed field) here, so the lowering engine can match exhaustively. The
//! tree carries raw token text only; nothing is validated semantically.

use serde::{Deserialize, Serialize};

/// The `Start` rule: the root of a parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    pub fn new(body: Vec<Node>) -> Self {
        Self { body }
    }
}

/// A renderable syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Statement sequence.
    Statements(Vec<Node>),
    /// Single statement wrapper.
    Statement(Box<Node>),
    Declaration(Declaration),
    Assignment(Assignment),
    Expression(Expression),
    /// Operator tokens, rendered verbatim (`+`, `= =`, ...).
    Operator(Vec<String>),
    /// Literal tokens, rendered verbatim.
    PrimaryLiteral(Vec<String>),
    /// Control construct sequence.
    ControlConstructs(Vec<Node>),
    /// Single control construct wrapper.
    ControlConstruct(Box<Node>),
    Conditional(Conditional),
    /// A braced block of statements.
    CodeBlock(Vec<Node>),
    /// Loop wrapper.
    Cycle(Box<Node>),
    WhileCycle(WhileCycle),
    Method(Method),
    ReturnExpr(Expression),
    FuncCall(FuncCall),
    /// Purely syntactic terminal (`;`, `{`, `,`). Renders as nothing.
    Token(String),
}

/// `TYPE VAR_NAME`. The type is kept in the tree but never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub ty: String,
    pub name: String,
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    /// First binding (`int x = ...`).
    Declaration(Declaration),
    /// Rebinding (`x += ...`).
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: AssignTarget,
    /// Assignment operator token (`=`, `+=`, ...).
    pub op: String,
    pub value: Expression,
}

/// Flat sequence of sub-expressions, operators and literals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub parts: Vec<Node>,
}

/// Body of a conditional branch or loop: a braced block or one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Block(Vec<Node>),
    Statement(Box<Node>),
}

/// What follows an `if`/`elif` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Continuation {
    Elif(Box<Conditional>),
    Else(Option<Body>),
}

/// An `if` (or, inside [`Continuation::Elif`], an `elif`) branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub condition: Expression,
    pub body: Option<Body>,
    pub continuation: Option<Continuation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileCycle {
    pub condition: Expression,
    pub body: Option<Body>,
}

/// Function definition. `args` holds the raw `Args` children, separators
/// included; `body` holds the children of the function's code block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub return_type: String,
    pub name: String,
    pub args: Vec<Node>,
    pub body: Vec<Node>,
}

/// Call site. `args` holds the raw `ArgsCall` children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCall {
    pub name: String,
    pub args: Vec<Node>,
}

// Helper constructors for building trees programmatically

impl Node {
    pub fn statement(inner: Node) -> Self {
        Node::Statement(Box::new(inner))
    }

    pub fn statements(nodes: Vec<Node>) -> Self {
        Node::Statements(nodes)
    }

    pub fn block(nodes: Vec<Node>) -> Self {
        Node::CodeBlock(nodes)
    }

    pub fn declaration(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Node::Declaration(Declaration::new(ty, name))
    }

    /// `TYPE name op value`
    pub fn declare_assign(
        ty: impl Into<String>,
        name: impl Into<String>,
        op: impl Into<String>,
        value: Expression,
    ) -> Self {
        Node::Assignment(Assignment {
            target: AssignTarget::Declaration(Declaration::new(ty, name)),
            op: op.into(),
            value,
        })
    }

    /// `name op value`
    pub fn assign(name: impl Into<String>, op: impl Into<String>, value: Expression) -> Self {
        Node::Assignment(Assignment {
            target: AssignTarget::Name(name.into()),
            op: op.into(),
            value,
        })
    }

    pub fn expr(parts: Vec<Node>) -> Self {
        Node::Expression(Expression::new(parts))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Node::PrimaryLiteral(vec![text.into()])
    }

    pub fn op(text: impl Into<String>) -> Self {
        Node::Operator(vec![text.into()])
    }

    pub fn token(text: impl Into<String>) -> Self {
        Node::Token(text.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::FuncCall(FuncCall {
            name: name.into(),
            args,
        })
    }

    pub fn return_expr(value: Expression) -> Self {
        Node::ReturnExpr(value)
    }

    pub fn if_stmt(conditional: Conditional) -> Self {
        Node::ControlConstruct(Box::new(Node::Conditional(conditional)))
    }

    pub fn while_loop(condition: Expression, body: Body) -> Self {
        Node::Cycle(Box::new(Node::WhileCycle(WhileCycle {
            condition,
            body: Some(body),
        })))
    }

    pub fn method(
        return_type: impl Into<String>,
        name: impl Into<String>,
        args: Vec<Node>,
        body: Vec<Node>,
    ) -> Self {
        Node::Method(Method {
            return_type: return_type.into(),
            name: name.into(),
            args,
            body,
        })
    }
}

impl Declaration {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

impl Expression {
    pub fn new(parts: Vec<Node>) -> Self {
        Self { parts }
    }

    /// Expression made of a single literal token.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(vec![Node::literal(text)])
    }

    /// `left op right`, with both operands taken as literal tokens.
    pub fn binary(
        left: impl Into<String>,
        op: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::new(vec![Node::literal(left), Node::op(op), Node::literal(right)])
    }
}

impl Body {
    pub fn block(nodes: Vec<Node>) -> Self {
        Body::Block(nodes)
    }

    pub fn statement(node: Node) -> Self {
        Body::Statement(Box::new(node))
    }
}

impl Conditional {
    pub fn new(condition: Expression, body: Body) -> Self {
        Self {
            condition,
            body: Some(body),
            continuation: None,
        }
    }

    /// Chain an `elif` onto the end of this conditional's continuation chain.
    pub fn elif(mut self, branch: Conditional) -> Self {
        self.set_tail(Continuation::Elif(Box::new(branch)));
        self
    }

    /// Chain an `else` onto the end of this conditional's continuation chain.
    pub fn otherwise(mut self, body: Body) -> Self {
        self.set_tail(Continuation::Else(Some(body)));
        self
    }

    fn set_tail(&mut self, continuation: Continuation) {
        match &mut self.continuation {
            Some(Continuation::Elif(next)) => next.set_tail(continuation),
            _ => self.continuation = Some(continuation),
        }
    }
}
