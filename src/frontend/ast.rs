//! Source model handed to the front end by the host parser.
//!
//! Only the shapes the compile-time surface needs are modeled: expressions that can carry intrinsic calls or
//! attachment chains, type expressions that can carry `thisarg<T>`, and function declarations whose first parameter
//! may be a receiver.
//!
//! ## Notes
//! - Spans are byte ranges into the original source. Lowering keys replacements by span, so two distinct expression
//!   nodes must never share a span. [`AstBuilder`] allocates fresh spans for synthesized nodes.

/// Source location (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Char(char),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    And,
    Or,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    /// `object.member`
    Member {
        object: Box<Spanned<Expr>>,
        member: Ident,
    },
    /// `callee<type_args>(args)`
    Call {
        callee: Box<Spanned<Expr>>,
        type_args: Vec<Spanned<TypeExpr>>,
        args: Vec<Spanned<Expr>>,
    },
    /// `(params) => body`
    Arrow {
        params: Vec<Ident>,
        body: Box<Spanned<Expr>>,
    },
    /// `[a, b, c]`
    Array(Vec<Spanned<Expr>>),
    Binary {
        op: BinaryOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    /// `typeof(T)`
    TypeOf(Spanned<TypeExpr>),
}

impl Expr {
    /// Short description of the expression's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Expr::Ident(_) => "identifier",
            Expr::Literal(_) => "literal",
            Expr::Member { .. } => "member access",
            Expr::Call { .. } => "call expression",
            Expr::Arrow { .. } => "arrow function",
            Expr::Array(_) => "array literal",
            Expr::Binary { .. } => "binary expression",
            Expr::TypeOf(_) => "typeof expression",
        }
    }

    /// Segments of a bare identifier or member-access path (`a`, `a.b.c`), or `None` for any other shape.
    pub fn member_path(&self) -> Option<Vec<&str>> {
        match self {
            Expr::Ident(name) => Some(vec![name.as_str()]),
            Expr::Member { object, member } => {
                let mut path = object.node.member_path()?;
                path.push(member.as_str());
                Some(path)
            }
            _ => None,
        }
    }

    /// The name of the callee when this is a call of a bare identifier.
    pub fn called_name(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => match &callee.node {
                Expr::Ident(name) => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Type expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Name`, `System.Name`, `Name<Args>`
    Named {
        name: Ident,
        args: Vec<Spanned<TypeExpr>>,
    },
    /// `T[]`
    Array(Box<Spanned<TypeExpr>>),
}

impl TypeExpr {
    pub fn named(name: impl Into<Ident>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Spanned<TypeExpr>,
    /// Declared at module level (not a member of a type).
    pub module_level: bool,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { name: Ident, value: Spanned<Expr> },
    Expr(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
}

/// One compilation unit as seen by the compile-time surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    /// Statements executed by the declaration-gathering pass (attachment chains, descriptor bindings).
    pub declarations: Vec<Spanned<Stmt>>,
    pub functions: Vec<Spanned<FunctionDecl>>,
}

/// Build AST nodes with fresh, unique spans.
///
/// Hosts use this for synthesized nodes; tests use it to write fixtures without a parser.
///
/// ## Examples
/// ```rust
/// use sable::frontend::ast::AstBuilder;
///
/// let mut b = AstBuilder::new();
/// let user = b.ident("user");
/// let email = b.member(user, "email");
/// assert_eq!(email.node.member_path(), Some(vec!["user", "email"]));
/// ```
#[derive(Debug, Default)]
pub struct AstBuilder {
    next: usize,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn span(&mut self) -> Span {
        let start = self.next;
        self.next += 1;
        Span::new(start, start + 1)
    }

    pub fn spanned<T>(&mut self, node: T) -> Spanned<T> {
        let span = self.span();
        Spanned::new(node, span)
    }

    pub fn ident(&mut self, name: &str) -> Spanned<Expr> {
        self.spanned(Expr::Ident(name.to_string()))
    }

    pub fn literal(&mut self, lit: Literal) -> Spanned<Expr> {
        self.spanned(Expr::Literal(lit))
    }

    pub fn int(&mut self, value: i64) -> Spanned<Expr> {
        self.literal(Literal::Int(value))
    }

    pub fn string(&mut self, value: &str) -> Spanned<Expr> {
        self.literal(Literal::String(value.to_string()))
    }

    pub fn member(&mut self, object: Spanned<Expr>, member: &str) -> Spanned<Expr> {
        self.spanned(Expr::Member {
            object: Box::new(object),
            member: member.to_string(),
        })
    }

    pub fn call(
        &mut self,
        callee: Spanned<Expr>,
        type_args: Vec<Spanned<TypeExpr>>,
        args: Vec<Spanned<Expr>>,
    ) -> Spanned<Expr> {
        self.spanned(Expr::Call {
            callee: Box::new(callee),
            type_args,
            args,
        })
    }

    /// `name<type_args>(args)`
    pub fn call_named(
        &mut self,
        name: &str,
        type_args: Vec<Spanned<TypeExpr>>,
        args: Vec<Spanned<Expr>>,
    ) -> Spanned<Expr> {
        let callee = self.ident(name);
        self.call(callee, type_args, args)
    }

    /// `object.name(args)`
    pub fn method_call(&mut self, object: Spanned<Expr>, name: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
        let callee = self.member(object, name);
        self.call(callee, Vec::new(), args)
    }

    /// `param => param.member`
    pub fn selector(&mut self, param: &str, member: &str) -> Spanned<Expr> {
        let object = self.ident(param);
        let body = self.member(object, member);
        self.arrow(&[param], body)
    }

    pub fn arrow(&mut self, params: &[&str], body: Spanned<Expr>) -> Spanned<Expr> {
        self.spanned(Expr::Arrow {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        })
    }

    pub fn array(&mut self, items: Vec<Spanned<Expr>>) -> Spanned<Expr> {
        self.spanned(Expr::Array(items))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
        self.spanned(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn type_of(&mut self, ty: Spanned<TypeExpr>) -> Spanned<Expr> {
        self.spanned(Expr::TypeOf(ty))
    }

    pub fn ty(&mut self, name: &str) -> Spanned<TypeExpr> {
        self.spanned(TypeExpr::named(name))
    }

    pub fn generic_ty(&mut self, name: &str, args: Vec<Spanned<TypeExpr>>) -> Spanned<TypeExpr> {
        self.spanned(TypeExpr::Named {
            name: name.to_string(),
            args,
        })
    }

    pub fn array_ty(&mut self, element: Spanned<TypeExpr>) -> Spanned<TypeExpr> {
        self.spanned(TypeExpr::Array(Box::new(element)))
    }

    pub fn expr_stmt(&mut self, expr: Spanned<Expr>) -> Spanned<Stmt> {
        self.spanned(Stmt::Expr(expr))
    }

    pub fn let_stmt(&mut self, name: &str, value: Spanned<Expr>) -> Spanned<Stmt> {
        self.spanned(Stmt::Let {
            name: name.to_string(),
            value,
        })
    }

    pub fn return_stmt(&mut self, value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
        self.spanned(Stmt::Return(value))
    }

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<(&str, Spanned<TypeExpr>)>,
        return_type: Spanned<TypeExpr>,
        body: Vec<Spanned<Stmt>>,
    ) -> Spanned<FunctionDecl> {
        self.spanned(FunctionDecl {
            name: name.to_string(),
            params: params
                .into_iter()
                .map(|(name, ty)| Param {
                    name: name.to_string(),
                    ty,
                })
                .collect(),
            return_type,
            module_level: true,
            body,
        })
    }
}
