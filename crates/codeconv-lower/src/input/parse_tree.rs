//! Reader for generic labeled parse trees.
//!
//! The grammar-driven parser that produces these trees lives outside this
//! crate. It hands over one JSON object per node:
//!
//! ```json
//! { "kind": "declaration", "children": [
//!     { "kind": "TYPE", "text": "int" },
//!     { "kind": "VAR_NAME", "text": "x" } ] }
//! ```
//!
//! Rule nodes carry `children`, terminals carry `text`. Rule names match with
//! either case on the first letter (`primaryLiteral` or `PrimaryLiteral`).
//! Anything the lowering rules depend on is checked here, so a tree that
//! makes it through [`build_program`] always lowers.

use crate::traits::{ReadError, Reader};
use crate::tree::*;
use serde::{Deserialize, Serialize};

/// Static instance of the parse-tree reader for registry use.
pub static PARSE_TREE_READER: ParseTreeReader = ParseTreeReader;

const TYPE: &str = "TYPE";
const VAR_NAME: &str = "VAR_NAME";
const ASSIGNMENT_OPERATOR: &str = "ASSIGNMENT_OPERATOR";

/// One node of the external parser's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseTree {
    /// Rule name (`statement`) or terminal name (`VAR_NAME`, `';'`).
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn rule(kind: impl Into<String>, children: Vec<ParseTree>) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            children,
        }
    }

    /// Source text covered by this node: its own text for a terminal, the
    /// concatenated terminal text for a rule.
    pub fn text(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone().unwrap_or_default();
        }
        self.children.iter().map(ParseTree::text).collect()
    }

    fn rule_kind(&self) -> Option<Rule> {
        Rule::from_kind(&self.kind)
    }

    fn child(&self, rule: Rule) -> Option<&ParseTree> {
        self.children
            .iter()
            .find(|child| child.rule_kind() == Some(rule))
    }

    fn required(&self, rule: Rule) -> Result<&ParseTree, ReadError> {
        self.child(rule).ok_or_else(|| ReadError::MissingChild {
            node: self.kind.clone(),
            child: rule.name().into(),
        })
    }

    fn terminal(&self, kind: &str) -> Result<String, ReadError> {
        self.children
            .iter()
            .find(|child| child.kind == kind)
            .map(ParseTree::text)
            .ok_or_else(|| ReadError::MissingChild {
                node: self.kind.clone(),
                child: kind.into(),
            })
    }
}

/// Grammar rules the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Start,
    Statements,
    Statement,
    Declaration,
    Assignment,
    Expression,
    Operator,
    PrimaryLiteral,
    ControlConstructs,
    ControlConstruct,
    Conditional,
    ConditionalElif,
    ConditionalElse,
    CodeBlock,
    Cycle,
    WhileCycle,
    Method,
    Args,
    ReturnExpr,
    FuncCall,
    ArgsCall,
}

impl Rule {
    const ALL: [Rule; 21] = [
        Rule::Start,
        Rule::Statements,
        Rule::Statement,
        Rule::Declaration,
        Rule::Assignment,
        Rule::Expression,
        Rule::Operator,
        Rule::PrimaryLiteral,
        Rule::ControlConstructs,
        Rule::ControlConstruct,
        Rule::Conditional,
        Rule::ConditionalElif,
        Rule::ConditionalElse,
        Rule::CodeBlock,
        Rule::Cycle,
        Rule::WhileCycle,
        Rule::Method,
        Rule::Args,
        Rule::ReturnExpr,
        Rule::FuncCall,
        Rule::ArgsCall,
    ];

    fn name(self) -> &'static str {
        match self {
            Rule::Start => "Start",
            Rule::Statements => "Statements",
            Rule::Statement => "Statement",
            Rule::Declaration => "Declaration",
            Rule::Assignment => "Assignment",
            Rule::Expression => "Expression",
            Rule::Operator => "Operator",
            Rule::PrimaryLiteral => "PrimaryLiteral",
            Rule::ControlConstructs => "ControlConstructs",
            Rule::ControlConstruct => "ControlConstruct",
            Rule::Conditional => "Conditional",
            Rule::ConditionalElif => "ConditionalElif",
            Rule::ConditionalElse => "ConditionalElse",
            Rule::CodeBlock => "CodeBlock",
            Rule::Cycle => "Cycle",
            Rule::WhileCycle => "WhileCycle",
            Rule::Method => "Method",
            Rule::Args => "Args",
            Rule::ReturnExpr => "ReturnExpr",
            Rule::FuncCall => "FuncCall",
            Rule::ArgsCall => "ArgsCall",
        }
    }

    fn from_kind(kind: &str) -> Option<Self> {
        let mut chars = kind.chars();
        let first = chars.next()?;
        if !first.is_ascii_alphabetic() {
            return None;
        }
        let rest = chars.as_str();
        Self::ALL.into_iter().find(|rule| {
            let name = rule.name();
            name[1..] == *rest && name[..1].eq_ignore_ascii_case(&first.to_string())
        })
    }
}

/// Parse-tree reader implementing [`Reader`].
pub struct ParseTreeReader;

impl Reader for ParseTreeReader {
    fn format(&self) -> &'static str {
        "parse-tree"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, source: &str) -> Result<Program, ReadError> {
        read_parse_tree(source)
    }
}

/// Deserialize a JSON parse tree and build the typed program from it.
pub fn read_parse_tree(source: &str) -> Result<Program, ReadError> {
    let tree: ParseTree =
        serde_json::from_str(source).map_err(|err| ReadError::Parse(err.to_string()))?;
    build_program(&tree)
}

/// Build a typed program from a `Start` parse tree.
pub fn build_program(tree: &ParseTree) -> Result<Program, ReadError> {
    match tree.rule_kind() {
        Some(Rule::Start) => Ok(Program::new(build_nodes(&tree.children)?)),
        _ => Err(ReadError::UnexpectedNode {
            expected: Rule::Start.name().into(),
            got: tree.kind.clone(),
        }),
    }
}

fn build_nodes(children: &[ParseTree]) -> Result<Vec<Node>, ReadError> {
    children.iter().map(build_node).collect()
}

fn build_node(tree: &ParseTree) -> Result<Node, ReadError> {
    let Some(rule) = tree.rule_kind() else {
        if tree.children.is_empty() {
            return Ok(Node::Token(tree.text()));
        }
        return Err(ReadError::Unsupported(format!("unknown rule `{}`", tree.kind)));
    };

    match rule {
        Rule::Statements => Ok(Node::Statements(build_nodes(&tree.children)?)),
        Rule::ControlConstructs => Ok(Node::ControlConstructs(build_nodes(&tree.children)?)),
        Rule::CodeBlock => Ok(Node::CodeBlock(build_nodes(&tree.children)?)),

        Rule::Statement => Ok(Node::Statement(Box::new(first_child(tree)?))),
        Rule::ControlConstruct => Ok(Node::ControlConstruct(Box::new(first_child(tree)?))),
        Rule::Cycle => Ok(Node::Cycle(Box::new(first_child(tree)?))),

        Rule::Declaration => build_declaration(tree).map(Node::Declaration),
        Rule::Assignment => build_assignment(tree).map(Node::Assignment),
        Rule::Expression => build_expression(tree).map(Node::Expression),
        Rule::Operator => Ok(Node::Operator(tokens(tree))),
        Rule::PrimaryLiteral => Ok(Node::PrimaryLiteral(tokens(tree))),
        Rule::Conditional => build_conditional(tree).map(Node::Conditional),

        Rule::WhileCycle => Ok(Node::WhileCycle(WhileCycle {
            condition: build_expression(tree.required(Rule::Expression)?)?,
            body: build_body(tree)?,
        })),

        Rule::Method => Ok(Node::Method(Method {
            return_type: tree.terminal(TYPE)?,
            name: tree.terminal(VAR_NAME)?,
            args: build_nodes(&tree.required(Rule::Args)?.children)?,
            body: build_nodes(&tree.required(Rule::CodeBlock)?.children)?,
        })),

        Rule::ReturnExpr => Ok(Node::ReturnExpr(build_expression(
            tree.required(Rule::Expression)?,
        )?)),

        Rule::FuncCall => Ok(Node::FuncCall(FuncCall {
            name: tree.terminal(VAR_NAME)?,
            args: build_nodes(&tree.required(Rule::ArgsCall)?.children)?,
        })),

        // Only meaningful under their parent rule
        Rule::Start
        | Rule::ConditionalElif
        | Rule::ConditionalElse
        | Rule::Args
        | Rule::ArgsCall => Err(ReadError::UnexpectedNode {
            expected: "statement or expression".into(),
            got: tree.kind.clone(),
        }),
    }
}

/// Wrapper rules render their first child.
fn first_child(tree: &ParseTree) -> Result<Node, ReadError> {
    let child = tree
        .children
        .first()
        .ok_or_else(|| ReadError::MissingChild {
            node: tree.kind.clone(),
            child: "any".into(),
        })?;
    build_node(child)
}

fn tokens(tree: &ParseTree) -> Vec<String> {
    if tree.children.is_empty() {
        return tree.text.iter().cloned().collect();
    }
    tree.children.iter().map(ParseTree::text).collect()
}

fn build_declaration(tree: &ParseTree) -> Result<Declaration, ReadError> {
    Ok(Declaration {
        ty: tree.terminal(TYPE)?,
        name: tree.terminal(VAR_NAME)?,
    })
}

fn build_assignment(tree: &ParseTree) -> Result<Assignment, ReadError> {
    let target = match tree.child(Rule::Declaration) {
        Some(decl) => AssignTarget::Declaration(build_declaration(decl)?),
        None => AssignTarget::Name(tree.terminal(VAR_NAME)?),
    };
    Ok(Assignment {
        target,
        op: tree.terminal(ASSIGNMENT_OPERATOR)?,
        value: build_expression(tree.required(Rule::Expression)?)?,
    })
}

fn build_expression(tree: &ParseTree) -> Result<Expression, ReadError> {
    Ok(Expression::new(build_nodes(&tree.children)?))
}

/// `if`/`elif` branch: condition, body and at most one continuation.
fn build_conditional(tree: &ParseTree) -> Result<Conditional, ReadError> {
    let continuation = match (
        tree.child(Rule::ConditionalElif),
        tree.child(Rule::ConditionalElse),
    ) {
        (elif, Some(otherwise)) => {
            if elif.is_some() {
                tracing::debug!(node = %tree.kind, "conditional has both elif and else, keeping else");
            }
            Some(Continuation::Else(build_body(otherwise)?))
        }
        (Some(elif), None) => Some(Continuation::Elif(Box::new(build_conditional(elif)?))),
        (None, None) => None,
    };

    Ok(Conditional {
        condition: build_expression(tree.required(Rule::Expression)?)?,
        body: build_body(tree)?,
        continuation,
    })
}

/// A single statement body takes precedence over a block when both appear.
fn build_body(tree: &ParseTree) -> Result<Option<Body>, ReadError> {
    if let Some(statement) = tree.child(Rule::Statement) {
        return Ok(Some(Body::Statement(Box::new(build_node(statement)?))));
    }
    match tree.child(Rule::CodeBlock) {
        Some(block) => Ok(Some(Body::Block(build_nodes(&block.children)?))),
        None => Ok(None),
    }
}
