//! Lua expression trees and statement lists.
//!
//! Only the subset of Lua the generators need is modelled. Dotted access
//! paths (`G.GAME.dollars`) are kept as a single [`Expr::Path`] since the
//! generators never need to take them apart.

/// Binary operators, lowest precedence first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Lua precedence level (higher binds tighter).
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Concat => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div => 6,
        }
    }

    /// Only `..` (of the operators modelled here) is right associative.
    #[must_use]
    pub const fn is_right_assoc(self) -> bool {
        matches!(self, Self::Concat)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::NotEq => "~=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Concat => "..",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
    Len,
}

/// A table constructor field.
#[derive(Clone, Debug, PartialEq)]
pub enum TableField {
    /// `name = value`
    Named(String, Expr),
    /// `value`
    Positional(Expr),
}

/// A Lua expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),

    /// Identifier or dotted path, rendered verbatim.
    Path(String),

    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),

    /// `callee(args)`
    Call(Box<Expr>, Vec<Expr>),

    /// `receiver:method(args)`
    Method(Box<Expr>, String, Vec<Expr>),

    Table(Vec<TableField>),

    /// `function(params) body end`
    Function(Vec<String>, Block),

    /// `(function() body end)()`
    Iife(Block),
}

impl Expr {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    pub fn num(value: f64) -> Self {
        Self::Number(value)
    }

    /// Call a function named by a path.
    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(Box::new(Self::Path(callee.into())), args)
    }

    /// Method call on this expression.
    #[must_use]
    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Method(Box::new(self), name.into(), args)
    }

    /// Table constructor with named fields, in order.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Expr)>,
        K: Into<String>,
    {
        Self::Table(
            fields
                .into_iter()
                .map(|(name, value)| TableField::Named(name.into(), value))
                .collect(),
        )
    }

    /// Anonymous function without parameters.
    pub fn function(body: Block) -> Self {
        Self::Function(Vec::new(), body)
    }

    fn binary(self, op: BinOp, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(self), Box::new(rhs))
    }

    #[must_use]
    pub fn or(self, rhs: Expr) -> Self {
        self.binary(BinOp::Or, rhs)
    }

    #[must_use]
    pub fn and(self, rhs: Expr) -> Self {
        self.binary(BinOp::And, rhs)
    }

    #[must_use]
    pub fn equals(self, rhs: Expr) -> Self {
        self.binary(BinOp::Eq, rhs)
    }

    #[must_use]
    pub fn lt(self, rhs: Expr) -> Self {
        self.binary(BinOp::Lt, rhs)
    }

    #[must_use]
    pub fn le(self, rhs: Expr) -> Self {
        self.binary(BinOp::Le, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: Expr) -> Self {
        self.binary(BinOp::Gt, rhs)
    }

    #[must_use]
    pub fn ge(self, rhs: Expr) -> Self {
        self.binary(BinOp::Ge, rhs)
    }

    #[must_use]
    pub fn plus(self, rhs: Expr) -> Self {
        self.binary(BinOp::Add, rhs)
    }

    #[must_use]
    pub fn minus(self, rhs: Expr) -> Self {
        self.binary(BinOp::Sub, rhs)
    }

    #[must_use]
    pub fn times(self, rhs: Expr) -> Self {
        self.binary(BinOp::Mul, rhs)
    }

    #[must_use]
    pub fn over(self, rhs: Expr) -> Self {
        self.binary(BinOp::Div, rhs)
    }

    #[must_use]
    pub fn not(self) -> Self {
        Self::Unary(UnOp::Not, Box::new(self))
    }

    #[must_use]
    pub fn neg(self) -> Self {
        Self::Unary(UnOp::Neg, Box::new(self))
    }

    #[must_use]
    pub fn len(self) -> Self {
        Self::Unary(UnOp::Len, Box::new(self))
    }

    /// Right-nested `a .. b .. c`, which renders without parentheses.
    pub fn concat(parts: Vec<Expr>) -> Self {
        let mut parts = parts.into_iter().rev();
        let Some(last) = parts.next() else {
            return Self::str("");
        };
        parts.fold(last, |acc, part| part.binary(BinOp::Concat, acc))
    }

    /// Fold expressions with `or`; `false` when empty.
    pub fn any_of(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs
            .into_iter()
            .reduce(|acc, e| acc.or(e))
            .unwrap_or(Self::Bool(false))
    }

    /// Fold expressions with `and`; `true` when empty.
    pub fn all_of(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs
            .into_iter()
            .reduce(|acc, e| acc.and(e))
            .unwrap_or(Self::Bool(true))
    }

    /// Does rendering this expression span several lines?
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        match self {
            Self::Function(..) | Self::Iife(_) => true,
            Self::Table(fields) => fields.iter().any(|f| match f {
                TableField::Named(_, e) | TableField::Positional(e) => e.is_multiline(),
            }),
            Self::Call(callee, args) => callee.is_multiline() || args.iter().any(Expr::is_multiline),
            Self::Method(recv, _, args) => recv.is_multiline() || args.iter().any(Expr::is_multiline),
            Self::Unary(_, e) => e.is_multiline(),
            Self::Binary(_, l, r) => l.is_multiline() || r.is_multiline(),
            _ => false,
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A Lua statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `local name = value`
    Local(String, Option<Expr>),

    /// `target = value`
    Assign(Expr, Expr),

    /// Expression statement (a call).
    Call(Expr),

    /// `if c then ... elseif c then ... else ... end`
    If {
        arms: Vec<(Expr, Block)>,
        otherwise: Option<Block>,
    },

    /// `for vars in iter do ... end`
    ForIn {
        vars: Vec<String>,
        iter: Expr,
        body: Block,
    },

    Return(Option<Expr>),

    Break,

    /// `function name(params) ... end`; `name` may use method syntax.
    Function {
        name: String,
        params: Vec<String>,
        body: Block,
    },
}

impl Stmt {
    pub fn local(name: impl Into<String>, value: Expr) -> Self {
        Self::Local(name.into(), Some(value))
    }

    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Self::Assign(Expr::path(target), value)
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(Expr::call(callee, args))
    }

    pub fn if_then(condition: Expr, body: Block) -> Self {
        Self::If {
            arms: vec![(condition, body)],
            otherwise: None,
        }
    }

    pub fn ret(value: Expr) -> Self {
        Self::Return(Some(value))
    }

    /// `for index, value in ipairs(source) do ... end`
    pub fn for_ipairs(index: &str, value: &str, source: Expr, body: Block) -> Self {
        Self::ForIn {
            vars: vec![index.to_string(), value.to_string()],
            iter: Expr::call("ipairs", vec![source]),
            body,
        }
    }

    /// `for key, value in pairs(source) do ... end`
    pub fn for_pairs(key: &str, value: &str, source: Expr, body: Block) -> Self {
        Self::ForIn {
            vars: vec![key.to_string(), value.to_string()],
            iter: Expr::call("pairs", vec![source]),
            body,
        }
    }
}

/// An ordered statement list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block(pub Vec<Stmt>);

impl Block {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement (builder pattern).
    #[must_use]
    pub fn with(mut self, stmt: Stmt) -> Self {
        self.0.push(stmt);
        self
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.0.push(stmt);
    }

    pub fn append(&mut self, other: Block) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stmt> {
        self.0.iter()
    }
}

impl FromIterator<Stmt> for Block {
    fn from_iter<T: IntoIterator<Item = Stmt>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self(stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_nests_right() {
        let e = Expr::concat(vec![Expr::str("a"), Expr::path("b"), Expr::str("c")]);
        match e {
            Expr::Binary(BinOp::Concat, lhs, rhs) => {
                assert_eq!(*lhs, Expr::str("a"));
                assert!(matches!(*rhs, Expr::Binary(BinOp::Concat, _, _)));
            }
            other => panic!("expected concat, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_folds() {
        assert_eq!(Expr::any_of(Vec::new()), Expr::Bool(false));
        assert_eq!(Expr::all_of(Vec::new()), Expr::Bool(true));
        assert_eq!(Expr::any_of(vec![Expr::path("x")]), Expr::path("x"));
    }

    #[test]
    fn test_multiline_detection() {
        assert!(!Expr::path("x").plus(Expr::num(1.0)).is_multiline());
        assert!(Expr::function(Block::new()).is_multiline());
        assert!(Expr::record([("func", Expr::function(Block::new()))]).is_multiline());
        assert!(!Expr::record([("message", Expr::str("hi"))]).is_multiline());
    }

    #[test]
    fn test_block_builder() {
        let block = Block::new()
            .with(Stmt::local("x", Expr::num(1.0)))
            .with(Stmt::Break);
        assert_eq!(block.len(), 2);
        assert!(!block.is_empty());
    }
}
