//! Python writer for the typed syntax tree.
//!
//! Lowers brace-delimited constructs into indentation-structured Python.
//! Nesting depth is threaded through every rule as a parameter, so one
//! writer can be shared freely and every rule is testable in isolation.
//!
//! Indentation is applied at statement position only: a declaration inside a
//! parameter list or a call inside an expression never picks up leading
//! whitespace.

use crate::traits::Writer;
use crate::tree::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Static instance of the Python writer with default options, for registry use.
pub static PYTHON_WRITER: PythonWriter = PythonWriter::new(PythonOptions::DEFAULT);

/// Line separator placed between emitted lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`
    #[default]
    CrLf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crlf" => Ok(LineEnding::CrLf),
            "lf" => Ok(LineEnding::Lf),
            other => Err(format!("unknown line ending: {other} (expected crlf or lf)")),
        }
    }
}

/// Which call arguments survive lowering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallArgs {
    /// Only primary literals; anything else is dropped from the argument list.
    #[default]
    Literals,
    /// Primary literals, nested expressions and nested calls.
    Expressions,
}

impl FromStr for CallArgs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literals" => Ok(CallArgs::Literals),
            "expressions" => Ok(CallArgs::Expressions),
            other => Err(format!(
                "unknown call argument mode: {other} (expected literals or expressions)"
            )),
        }
    }
}

/// Options for Python lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    pub line_ending: LineEnding,
    /// Emit `pass` for a body that renders to nothing.
    pub pass_empty_bodies: bool,
    pub call_args: CallArgs,
}

impl PythonOptions {
    pub const DEFAULT: Self = Self {
        indent_width: 4,
        line_ending: LineEnding::CrLf,
        pass_empty_bodies: true,
        call_args: CallArgs::Literals,
    };
}

impl Default for PythonOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lowers a typed [`Program`] to Python source.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonWriter {
    options: PythonOptions,
}

impl Writer for PythonWriter {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn write(&self, program: &Program) -> String {
        self.lower(program)
    }
}

impl PythonWriter {
    pub const fn new(options: PythonOptions) -> Self {
        Self { options }
    }

    /// Lower a program with default options.
    pub fn emit(program: &Program) -> String {
        Self::default().lower(program)
    }

    pub fn options(&self) -> &PythonOptions {
        &self.options
    }

    /// Lower a program, starting at depth 0.
    pub fn lower(&self, program: &Program) -> String {
        tracing::trace!(statements = program.body.len(), "lowering program");
        self.lines(&program.body, 0)
    }

    /// Render one node in statement position at `depth`.
    pub fn lower_node(&self, node: &Node, depth: usize) -> String {
        match node {
            Node::Statements(nodes) | Node::ControlConstructs(nodes) | Node::CodeBlock(nodes) => {
                self.lines(nodes, depth)
            }

            Node::Statement(inner) | Node::ControlConstruct(inner) | Node::Cycle(inner) => {
                self.lower_node(inner, depth)
            }

            // Type annotation has no Python counterpart
            Node::Declaration(decl) => format!("{}{}", self.indent(depth), decl.name),

            Node::Assignment(assign) => self.assignment(assign, depth),

            Node::Conditional(cond) => self.conditional("if", cond, depth),

            Node::WhileCycle(cycle) => self.while_cycle(cycle, depth),

            Node::Method(method) => self.method(method, depth),

            Node::ReturnExpr(value) => {
                let value = self.expression(value);
                if value.is_empty() {
                    format!("{}return", self.indent(depth))
                } else {
                    format!("{}return {}", self.indent(depth), value)
                }
            }

            Node::Expression(_) | Node::Operator(_) | Node::PrimaryLiteral(_) | Node::FuncCall(_) => {
                let text = self.inline(node);
                if text.is_empty() {
                    text
                } else {
                    format!("{}{}", self.indent(depth), text)
                }
            }

            Node::Token(_) => String::new(),
        }
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent_width)
    }

    fn eol(&self) -> &'static str {
        self.options.line_ending.as_str()
    }

    /// Render each node, drop the empty ones, join the rest with line breaks.
    fn lines(&self, nodes: &[Node], depth: usize) -> String {
        let rendered: Vec<String> = nodes
            .iter()
            .map(|node| self.lower_node(node, depth))
            .filter(|text| !text.is_empty())
            .collect();
        rendered.join(self.eol())
    }

    /// Render a node inside an expression: no indentation, single line.
    fn inline(&self, node: &Node) -> String {
        match node {
            Node::Expression(expr) => self.expression(expr),
            Node::Operator(tokens) | Node::PrimaryLiteral(tokens) => join_tokens(tokens),
            Node::FuncCall(call) => self.call(call),
            Node::Declaration(decl) => decl.name.clone(),
            Node::Token(_) => String::new(),
            other => self.lower_node(other, 0),
        }
    }

    fn expression(&self, expr: &Expression) -> String {
        let parts: Vec<String> = expr
            .parts
            .iter()
            .map(|part| self.inline(part))
            .filter(|text| !text.is_empty())
            .collect();
        parts.join(" ")
    }

    fn assignment(&self, assign: &Assignment, depth: usize) -> String {
        let target = match &assign.target {
            AssignTarget::Declaration(decl) => &decl.name,
            AssignTarget::Name(name) => name,
        };
        format!(
            "{}{} {} {}",
            self.indent(depth),
            target,
            assign.op,
            self.expression(&assign.value)
        )
    }

    /// `if`/`elif` header, body one level deeper, continuation at this depth.
    fn conditional(&self, keyword: &str, cond: &Conditional, depth: usize) -> String {
        let mut lines = vec![format!(
            "{}{} {}:",
            self.indent(depth),
            keyword,
            self.expression(&cond.condition)
        )];
        lines.extend(self.body(cond.body.as_ref(), depth));

        match &cond.continuation {
            Some(Continuation::Elif(branch)) => lines.push(self.conditional("elif", branch, depth)),
            Some(Continuation::Else(body)) => {
                lines.push(format!("{}else:", self.indent(depth)));
                lines.extend(self.body(body.as_ref(), depth));
            }
            None => {}
        }

        lines.join(self.eol())
    }

    fn while_cycle(&self, cycle: &WhileCycle, depth: usize) -> String {
        let mut lines = vec![format!(
            "{}while {}:",
            self.indent(depth),
            self.expression(&cycle.condition)
        )];
        lines.extend(self.body(cycle.body.as_ref(), depth));
        lines.join(self.eol())
    }

    fn method(&self, method: &Method, depth: usize) -> String {
        // Only declarations are parameters; parens and commas are separators
        let params: Vec<&str> = method
            .args
            .iter()
            .filter_map(|arg| match arg {
                Node::Declaration(decl) => Some(decl.name.as_str()),
                _ => None,
            })
            .collect();

        let mut lines = vec![format!(
            "{}def {}({}):",
            self.indent(depth),
            method.name,
            params.join(", ")
        )];
        lines.extend(self.body_text(self.lines(&method.body, depth + 1), depth + 1));
        lines.join(self.eol())
    }

    fn call(&self, call: &FuncCall) -> String {
        let args: Vec<String> = call
            .args
            .iter()
            .filter_map(|arg| self.call_arg(&call.name, arg))
            .filter(|text| !text.is_empty())
            .collect();
        format!("{}({})", call.name, args.join(", "))
    }

    fn call_arg(&self, callee: &str, arg: &Node) -> Option<String> {
        match (arg, self.options.call_args) {
            (Node::PrimaryLiteral(tokens), _) => Some(join_tokens(tokens)),
            (Node::Token(_), _) => None,
            (Node::Expression(_) | Node::FuncCall(_), CallArgs::Expressions) => {
                Some(self.inline(arg))
            }
            (other, _) => {
                tracing::debug!(callee, argument = ?other, "dropping non-literal call argument");
                None
            }
        }
    }

    /// Render a branch or loop body one level below `depth`.
    fn body(&self, body: Option<&Body>, depth: usize) -> Option<String> {
        let inner = depth + 1;
        let text = match body {
            Some(Body::Block(nodes)) => self.lines(nodes, inner),
            Some(Body::Statement(node)) => self.lower_node(node, inner),
            None => String::new(),
        };
        self.body_text(text, inner)
    }

    fn body_text(&self, text: String, depth: usize) -> Option<String> {
        if !text.is_empty() {
            Some(text)
        } else if self.options.pass_empty_bodies {
            Some(format!("{}pass", self.indent(depth)))
        } else {
            None
        }
    }
}

fn join_tokens(tokens: &[String]) -> String {
    let tokens: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| !token.is_empty())
        .collect();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lf() -> PythonWriter {
        PythonWriter::new(PythonOptions {
            line_ending: LineEnding::Lf,
            ..Default::default()
        })
    }

    fn program(body: Vec<Node>) -> Program {
        Program::new(body)
    }

    fn assign_literal(name: &str, value: &str) -> Node {
        Node::statement(Node::assign(name, "=", Expression::literal(value)))
    }

    #[test]
    fn test_declaration_drops_type() {
        let output = PythonWriter::emit(&program(vec![Node::statement(Node::declaration(
            "int", "x",
        ))]));
        assert_eq!(output, "x");
    }

    #[test]
    fn test_compound_assignment() {
        let output = PythonWriter::emit(&program(vec![Node::statement(Node::assign(
            "x",
            "+=",
            Expression::literal("1"),
        ))]));
        assert_eq!(output, "x += 1");
    }

    #[test]
    fn test_declaring_assignment() {
        let output = PythonWriter::emit(&program(vec![Node::statement(Node::declare_assign(
            "float",
            "ratio",
            "=",
            Expression::binary("a", "/", "b"),
        ))]));
        assert_eq!(output, "ratio = a / b");
    }

    #[test]
    fn test_statements_skip_syntactic_children() {
        let output = PythonWriter::emit(&program(vec![Node::statements(vec![
            Node::token(";"),
            assign_literal("a", "1"),
            Node::token(";"),
            assign_literal("b", "2"),
            Node::token(";"),
        ])]));
        assert_eq!(output, "a = 1\r\nb = 2");
    }

    #[test]
    fn test_multi_symbol_operator() {
        let expr = Expression::new(vec![
            Node::literal("a"),
            Node::Operator(vec!["=".into(), "=".into()]),
            Node::literal("b"),
        ]);
        let output = lf().lower(&program(vec![Node::statement(Node::expr(expr.parts))]));
        assert_eq!(output, "a = = b");
    }

    #[test]
    fn test_conditional_chain_same_depth() {
        let cond = Conditional::new(
            Expression::literal("a"),
            Body::block(vec![assign_literal("s", "1")]),
        )
        .elif(Conditional::new(
            Expression::literal("b"),
            Body::block(vec![assign_literal("s", "2")]),
        ))
        .otherwise(Body::block(vec![assign_literal("s", "3")]));

        let output = PythonWriter::emit(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(
            output,
            "if a:\r\n    s = 1\r\nelif b:\r\n    s = 2\r\nelse:\r\n    s = 3"
        );
    }

    #[test]
    fn test_conditional_single_statement_body() {
        let cond = Conditional::new(
            Expression::binary("x", ">", "0"),
            Body::statement(assign_literal("y", "x")),
        );
        let output = lf().lower(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(output, "if x > 0:\n    y = x");
    }

    #[test]
    fn test_while_loop() {
        let body = Body::block(vec![Node::statement(Node::assign(
            "i",
            "+=",
            Expression::literal("1"),
        ))]);
        let output = lf().lower(&program(vec![Node::while_loop(
            Expression::binary("i", "<", "10"),
            body,
        )]));
        assert_eq!(output, "while i < 10:\n    i += 1");
    }

    #[test]
    fn test_method_definition() {
        let method = Node::method(
            "int",
            "f",
            vec![
                Node::token("("),
                Node::declaration("T1", "a"),
                Node::token(","),
                Node::declaration("T2", "b"),
                Node::token(")"),
            ],
            vec![Node::statement(Node::return_expr(Expression::literal("a")))],
        );
        let output = lf().lower(&program(vec![method]));
        assert_eq!(output, "def f(a, b):\n    return a");
    }

    #[test]
    fn test_nested_method_params_not_indented() {
        let inner = Node::method(
            "void",
            "g",
            vec![Node::declaration("int", "n")],
            vec![Node::statement(Node::return_expr(Expression::literal("n")))],
        );
        let outer = Node::method("void", "f", vec![], vec![inner]);
        let output = lf().lower(&program(vec![outer]));
        assert_eq!(output, "def f():\n    def g(n):\n        return n");
    }

    #[test]
    fn test_call_drops_non_literal_arguments() {
        // f(1, x+1, "s"): the expression argument is dropped by design
        let call = Node::call(
            "f",
            vec![
                Node::literal("1"),
                Node::token(","),
                Node::expr(vec![Node::literal("x"), Node::op("+"), Node::literal("1")]),
                Node::token(","),
                Node::literal("\"s\""),
            ],
        );
        let output = PythonWriter::emit(&program(vec![Node::statement(call)]));
        assert_eq!(output, "f(1, \"s\")");
    }

    #[test]
    fn test_call_keeps_expressions_when_enabled() {
        let writer = PythonWriter::new(PythonOptions {
            call_args: CallArgs::Expressions,
            ..Default::default()
        });
        let call = Node::call(
            "f",
            vec![
                Node::literal("1"),
                Node::token(","),
                Node::expr(vec![Node::literal("x"), Node::op("+"), Node::literal("1")]),
                Node::token(","),
                Node::call("g", vec![Node::literal("2")]),
            ],
        );
        let output = writer.lower(&program(vec![Node::statement(call)]));
        assert_eq!(output, "f(1, x + 1, g(2))");
    }

    #[test]
    fn test_call_statement_is_indented() {
        let cond = Conditional::new(
            Expression::literal("ready"),
            Body::block(vec![Node::statement(Node::call(
                "print",
                vec![Node::literal("\"go\"")],
            ))]),
        );
        let output = lf().lower(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(output, "if ready:\n    print(\"go\")");
    }

    #[test]
    fn test_empty_body_emits_pass() {
        let cond = Conditional::new(Expression::literal("a"), Body::block(vec![Node::token("}")]));
        let output = lf().lower(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(output, "if a:\n    pass");
    }

    #[test]
    fn test_empty_body_without_pass_leaves_no_blank_line() {
        let writer = PythonWriter::new(PythonOptions {
            line_ending: LineEnding::Lf,
            pass_empty_bodies: false,
            ..Default::default()
        });
        let cond = Conditional::new(Expression::literal("a"), Body::block(vec![]))
            .otherwise(Body::block(vec![assign_literal("x", "1")]));
        let output = writer.lower(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(output, "if a:\nelse:\n    x = 1");
    }

    #[test]
    fn test_return_without_value() {
        let output = lf().lower(&program(vec![Node::statement(Node::return_expr(
            Expression::default(),
        ))]));
        assert_eq!(output, "return");
    }

    #[test]
    fn test_custom_indent_width() {
        let writer = PythonWriter::new(PythonOptions {
            indent_width: 2,
            line_ending: LineEnding::Lf,
            ..Default::default()
        });
        let inner = Node::while_loop(
            Expression::literal("b"),
            Body::block(vec![assign_literal("x", "1")]),
        );
        let cond = Conditional::new(Expression::literal("a"), Body::block(vec![inner]));
        let output = writer.lower(&program(vec![Node::if_stmt(cond)]));
        assert_eq!(output, "if a:\n  while b:\n    x = 1");
    }

    #[test]
    fn test_lower_node_at_depth() {
        let output = lf().lower_node(&assign_literal("x", "1"), 3);
        assert_eq!(output, "            x = 1");
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("LF".parse::<LineEnding>(), Ok(LineEnding::Lf));
        assert_eq!("crlf".parse::<LineEnding>(), Ok(LineEnding::CrLf));
        assert!("cr".parse::<LineEnding>().is_err());
        assert_eq!("expressions".parse::<CallArgs>(), Ok(CallArgs::Expressions));
        assert!("all".parse::<CallArgs>().is_err());
    }

    #[test]
    fn test_writer_trait() {
        assert_eq!(PYTHON_WRITER.language(), "python");
        assert_eq!(PYTHON_WRITER.extension(), "py");
        let output = PYTHON_WRITER.write(&program(vec![assign_literal("x", "1")]));
        assert_eq!(output, "x = 1");
    }
}
