//! AST printer.

use eyre::{Result, bail};
use sapling_ast::{BinaryOp, Node};

use crate::source_map::{Mapping, SourceMap};

/// Options controlling generation.
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// File name recorded in the source map.
    pub filename: String,
    /// Whether to build a source map alongside the code.
    pub source_map: bool,
    /// Indentation unit for nested bodies.
    pub indent: String,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            filename: "unknown".to_string(),
            source_map: true,
            indent: "  ".to_string(),
        }
    }
}

/// Output of [`generate`]. The map is absent when source maps are disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// Emit source text (and optionally a source map) for a program.
///
/// Fails on malformed trees: a non-program root, a statement node in
/// expression position, or an expression node in statement position. Passes
/// that rewrite nodes across those boundaries surface here.
pub fn generate(root: &Node, opts: &GenOptions) -> Result<Generated> {
    let Node::Program { body, .. } = root else {
        bail!("expected a Program root, found {}", root.kind().as_str());
    };
    let mut printer = Printer {
        buffer: String::new(),
        line: 1,
        indent_level: 0,
        indent: &opts.indent,
        map: opts.source_map.then(|| SourceMap::new(&opts.filename)),
    };
    for stmt in body {
        printer.statement(stmt)?;
    }
    Ok(Generated {
        code: printer.buffer,
        map: printer.map,
    })
}

struct Printer<'a> {
    buffer: String,
    line: u32,
    indent_level: usize,
    indent: &'a str,
    map: Option<SourceMap>,
}

impl Printer<'_> {
    fn statement(&mut self, stmt: &Node) -> Result<()> {
        self.write_indent();
        if let (Some(map), Some(original_line)) = (self.map.as_mut(), stmt.original_line()) {
            map.mappings.push(Mapping {
                generated_line: self.line,
                generated_column: (self.indent_level * self.indent.len()) as u32,
                original_line,
            });
        }
        match stmt {
            Node::ImportDecl { names, source, .. } => {
                self.push("import { ");
                self.push(&names.join(", "));
                self.push(" } from \"");
                self.push(source);
                self.push("\";");
            }
            Node::VarDecl { kind, name, init, .. } => {
                self.push(kind.as_str());
                self.push(" ");
                self.push(name);
                if let Some(init) = init {
                    self.push(" = ");
                    self.expr(init, 0)?;
                }
                self.push(";");
            }
            Node::FnDecl { name, params, body, .. } => {
                self.push("function ");
                self.push(name);
                self.push("(");
                self.push(&params.join(", "));
                self.push(") {");
                self.newline();
                self.indent_level += 1;
                for inner in body {
                    self.statement(inner)?;
                }
                self.indent_level -= 1;
                self.write_indent();
                self.push("}");
            }
            Node::Return { arg, .. } => {
                self.push("return");
                if let Some(arg) = arg {
                    self.push(" ");
                    self.expr(arg, 0)?;
                }
                self.push(";");
            }
            Node::ExprStmt { expr, .. } => {
                self.expr(expr, 0)?;
                self.push(";");
            }
            other => bail!(
                "{} node in statement position cannot be printed",
                other.kind().as_str()
            ),
        }
        self.newline();
        Ok(())
    }

    fn expr(&mut self, expr: &Node, parent_prec: u8) -> Result<()> {
        match expr {
            Node::Ident { name } => self.push(name),
            Node::Number { value } => {
                let text = format_number(*value);
                self.push(&text);
            }
            Node::Str { value } => {
                self.push("\"");
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                self.push(&escaped);
                self.push("\"");
            }
            Node::Bool { value } => self.push(if *value { "true" } else { "false" }),
            Node::Binary { op, left, right } => {
                let prec = precedence(*op);
                let needs_parens = prec < parent_prec;
                if needs_parens {
                    self.push("(");
                }
                self.expr(left, prec)?;
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                // Right operand of equal precedence still needs grouping to
                // preserve left-associative shape.
                self.expr(right, prec + 1)?;
                if needs_parens {
                    self.push(")");
                }
            }
            Node::Call { callee, args } => {
                self.expr(callee, u8::MAX)?;
                self.push("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(arg, 0)?;
                }
                self.push(")");
            }
            Node::Assign { target, value } => {
                self.expr(target, 0)?;
                self.push(" = ");
                self.expr(value, 0)?;
            }
            other => bail!(
                "{} node in expression position cannot be printed",
                other.kind().as_str()
            ),
        }
        Ok(())
    }

    fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn newline(&mut self) {
        self.buffer.push('\n');
        self.line += 1;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent);
        }
    }
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Gt => 1,
        BinaryOp::Add | BinaryOp::Sub => 2,
        BinaryOp::Mul | BinaryOp::Div => 3,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
