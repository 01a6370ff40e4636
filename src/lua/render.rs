//! Text backend for the Lua IR.
//!
//! This is the only place that produces Lua source. Parentheses are
//! inserted from operator precedence, so generators never reason about
//! already serialized text.

use super::ast::{BinOp, Block, Expr, Stmt, TableField, UnOp};

/// Renders IR to Lua source.
#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    indent_width: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_INDENT_WIDTH)
    }
}

impl Renderer {
    #[must_use]
    pub const fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Render an expression at the outermost indentation level.
    #[must_use]
    pub fn expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, expr, 0);
        out
    }

    /// Render a statement list, one statement per line, no trailing newline.
    #[must_use]
    pub fn block(&self, block: &Block) -> String {
        let mut out = String::new();
        self.write_stmts(&mut out, block, 0);
        out
    }

    fn indent(&self, out: &mut String, depth: usize) {
        out.extend(std::iter::repeat(' ').take(depth * self.indent_width));
    }

    fn write_stmts(&self, out: &mut String, block: &Block, depth: usize) {
        for (i, stmt) in block.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_stmt(out, stmt, depth);
        }
    }

    /// Write a nested block followed by the indented closing keyword line.
    fn write_body(&self, out: &mut String, block: &Block, depth: usize) {
        if !block.is_empty() {
            out.push('\n');
            self.write_stmts(out, block, depth + 1);
        }
        out.push('\n');
        self.indent(out, depth);
    }

    fn write_stmt(&self, out: &mut String, stmt: &Stmt, depth: usize) {
        self.indent(out, depth);
        match stmt {
            Stmt::Local(name, value) => {
                out.push_str("local ");
                out.push_str(name);
                if let Some(value) = value {
                    out.push_str(" = ");
                    self.write_expr(out, value, depth);
                }
            }
            Stmt::Assign(target, value) => {
                self.write_expr(out, target, depth);
                out.push_str(" = ");
                self.write_expr(out, value, depth);
            }
            Stmt::Call(expr) => self.write_expr(out, expr, depth),
            Stmt::If { arms, otherwise } => {
                for (i, (condition, body)) in arms.iter().enumerate() {
                    out.push_str(if i == 0 { "if " } else { "elseif " });
                    self.write_expr(out, condition, depth);
                    out.push_str(" then");
                    self.write_body(out, body, depth);
                }
                if let Some(body) = otherwise {
                    out.push_str("else");
                    self.write_body(out, body, depth);
                }
                out.push_str("end");
            }
            Stmt::ForIn { vars, iter, body } => {
                out.push_str("for ");
                out.push_str(&vars.join(", "));
                out.push_str(" in ");
                self.write_expr(out, iter, depth);
                out.push_str(" do");
                self.write_body(out, body, depth);
                out.push_str("end");
            }
            Stmt::Return(value) => {
                out.push_str("return");
                if let Some(value) = value {
                    out.push(' ');
                    self.write_expr(out, value, depth);
                }
            }
            Stmt::Break => out.push_str("break"),
            Stmt::Function { name, params, body } => {
                out.push_str("function ");
                out.push_str(name);
                out.push('(');
                out.push_str(&params.join(", "));
                out.push(')');
                self.write_body(out, body, depth);
                out.push_str("end");
            }
        }
    }

    fn write_expr(&self, out: &mut String, expr: &Expr, depth: usize) {
        match expr {
            Expr::Nil => out.push_str("nil"),
            Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Expr::Number(n) => out.push_str(&format_number(*n)),
            Expr::Str(s) => out.push_str(&quote(s)),
            Expr::Path(p) => out.push_str(p),
            Expr::Unary(op, operand) => {
                out.push_str(match op {
                    UnOp::Not => "not ",
                    UnOp::Neg => "-",
                    UnOp::Len => "#",
                });
                let wrap = match operand.as_ref() {
                    Expr::Binary(..) => true,
                    // `--x` would start a comment
                    Expr::Unary(UnOp::Neg, _) => *op == UnOp::Neg,
                    Expr::Number(n) => *op == UnOp::Neg && n.is_sign_negative(),
                    _ => false,
                };
                self.write_wrapped(out, operand, depth, wrap);
            }
            Expr::Binary(op, lhs, rhs) => {
                self.write_operand(out, lhs, *op, false, depth);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                self.write_operand(out, rhs, *op, true, depth);
            }
            Expr::Call(callee, args) => {
                self.write_callee(out, callee, depth);
                self.write_args(out, args, depth);
            }
            Expr::Method(receiver, name, args) => {
                self.write_callee(out, receiver, depth);
                out.push(':');
                out.push_str(name);
                self.write_args(out, args, depth);
            }
            Expr::Table(fields) => self.write_table(out, fields, depth),
            Expr::Function(params, body) => {
                out.push_str("function(");
                out.push_str(&params.join(", "));
                out.push(')');
                self.write_body(out, body, depth);
                out.push_str("end");
            }
            Expr::Iife(body) => {
                out.push_str("(function()");
                self.write_body(out, body, depth);
                out.push_str("end)()");
            }
        }
    }

    fn write_wrapped(&self, out: &mut String, expr: &Expr, depth: usize, wrap: bool) {
        if wrap {
            out.push('(');
        }
        self.write_expr(out, expr, depth);
        if wrap {
            out.push(')');
        }
    }

    fn write_operand(&self, out: &mut String, operand: &Expr, parent: BinOp, is_rhs: bool, depth: usize) {
        let wrap = match operand {
            Expr::Binary(op, ..) => {
                let (child, outer) = (op.precedence(), parent.precedence());
                child < outer || (child == outer && is_rhs != parent.is_right_assoc())
            }
            _ => false,
        };
        self.write_wrapped(out, operand, depth, wrap);
    }

    fn write_callee(&self, out: &mut String, callee: &Expr, depth: usize) {
        let wrap = !matches!(callee, Expr::Path(_) | Expr::Call(..) | Expr::Method(..));
        self.write_wrapped(out, callee, depth, wrap);
    }

    fn write_args(&self, out: &mut String, args: &[Expr], depth: usize) {
        out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(out, arg, depth);
        }
        out.push(')');
    }

    fn write_table(&self, out: &mut String, fields: &[TableField], depth: usize) {
        if fields.is_empty() {
            out.push_str("{}");
            return;
        }
        let multiline = fields.iter().any(|f| match f {
            TableField::Named(_, e) | TableField::Positional(e) => e.is_multiline(),
        });
        out.push('{');
        for (i, field) in fields.iter().enumerate() {
            if multiline {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                self.indent(out, depth + 1);
            } else if i > 0 {
                out.push_str(", ");
            }
            let inner = if multiline { depth + 1 } else { depth };
            match field {
                TableField::Named(name, value) => {
                    out.push_str(name);
                    out.push_str(" = ");
                    self.write_expr(out, value, inner);
                }
                TableField::Positional(value) => self.write_expr(out, value, inner),
            }
        }
        if multiline {
            out.push('\n');
            self.indent(out, depth);
        }
        out.push('}');
    }
}

/// Integral values render without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "0".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "math.huge" } else { "-math.huge" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}
