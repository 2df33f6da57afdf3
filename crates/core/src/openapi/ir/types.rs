//! Type expressions and the Go AST used for code generation.
//!
//! This module defines:
//! - TypeExpr: the language-neutral type computed from a schema node
//! - GoType, GoExpr, GoStmt: Go types, expressions and statements
//! - GoFunc, GoDecl, GoFile: top-level Go declarations and files

/// Primitive scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// JSON string
    String,
    /// JSON integer
    Int,
    /// JSON number
    Float,
    /// JSON boolean
    Bool,
}

/// Resolved type of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeExpr {
    /// A scalar.
    Primitive(Primitive),
    /// Reference to a generated type, by its normalized name.
    Named(String),
    /// Ordered sequence of elements.
    Sequence(Box<TypeExpr>),
    /// Untyped fallback for shapes that cannot be represented precisely.
    Dynamic,
}

impl TypeExpr {
    /// Convert to a Go type, qualifying named types with `package` when given.
    pub fn to_go(&self, package: Option<&str>) -> GoType {
        match self {
            TypeExpr::Primitive(p) => GoType::Ident(
                match p {
                    Primitive::String => "string",
                    Primitive::Int => "int",
                    Primitive::Float => "float64",
                    Primitive::Bool => "bool",
                }
                .to_string(),
            ),
            TypeExpr::Named(name) => match package {
                Some(package) => GoType::Qualified {
                    package: package.to_string(),
                    name: name.clone(),
                },
                None => GoType::Ident(name.clone()),
            },
            TypeExpr::Sequence(inner) => GoType::Slice(Box::new(inner.to_go(package))),
            TypeExpr::Dynamic => GoType::Ident("any".to_string()),
        }
    }
}

/// Go type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// Builtin or package-local type: `string`, `Client`
    Ident(String),
    /// Type from another package: `models.Item`
    Qualified {
        /// Package name
        package: String,
        /// Type name within the package
        name: String,
    },
    /// `[]T`
    Slice(Box<GoType>),
    /// `*T`
    Pointer(Box<GoType>),
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<GoType>,
        /// Value type
        value: Box<GoType>,
    },
}

impl GoType {
    /// `*self`
    pub fn pointer(self) -> GoType {
        GoType::Pointer(Box::new(self))
    }

    /// Shorthand for a builtin or local type.
    pub fn ident(name: &str) -> GoType {
        GoType::Ident(name.to_string())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
}

/// Go expression
#[derive(Debug, Clone)]
pub enum GoExpr {
    /// Identifier: foo
    Ident(String),
    /// Interpreted string literal: "foo"
    Str(String),
    /// Integer literal
    Int(i64),
    /// Function or method call: f(a, b)
    Call {
        /// Function or method being called
        callee: Box<GoExpr>,
        /// Arguments in order
        args: Vec<GoExpr>,
    },
    /// Selector: x.y
    Selector {
        /// Operand
        object: Box<GoExpr>,
        /// Selected field or method
        field: String,
    },
    /// Index: x[i]
    Index {
        /// Indexed map or slice
        object: Box<GoExpr>,
        /// Key or position
        index: Box<GoExpr>,
    },
    /// Type in expression position: make(map[string]any)
    Type(GoType),
    /// Address-of: &x
    AddrOf(Box<GoExpr>),
    /// Dereference: *x
    Deref(Box<GoExpr>),
    /// Conversion to a type: (*T)(x)
    Convert {
        /// Target type
        ty: GoType,
        /// Converted operand
        expr: Box<GoExpr>,
    },
    /// Binary expression: a != b
    Binary {
        /// Left operand
        left: Box<GoExpr>,
        /// Operator
        op: BinOp,
        /// Right operand
        right: Box<GoExpr>,
    },
    /// Composite literal: T{k: v}. Multi-line when `multiline` is set.
    Composite {
        /// Literal type
        ty: GoType,
        /// Keyed elements in order
        fields: Vec<(String, GoExpr)>,
        /// One element per line
        multiline: bool,
    },
    /// Raw code that doesn't fit the AST
    Raw(String),
}

impl GoExpr {
    /// Identifier expression.
    pub fn ident(name: &str) -> GoExpr {
        GoExpr::Ident(name.to_string())
    }

    /// `self.field`
    pub fn select(self, field: &str) -> GoExpr {
        GoExpr::Selector {
            object: Box::new(self),
            field: field.to_string(),
        }
    }

    /// `self(args...)`
    pub fn call(self, args: Vec<GoExpr>) -> GoExpr {
        GoExpr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// `self[index]`
    pub fn index(self, index: GoExpr) -> GoExpr {
        GoExpr::Index {
            object: Box::new(self),
            index: Box::new(index),
        }
    }

    /// `&self`
    pub fn addr(self) -> GoExpr {
        GoExpr::AddrOf(Box::new(self))
    }

    /// `self op right`
    pub fn binary(self, op: BinOp, right: GoExpr) -> GoExpr {
        GoExpr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}

/// Statement in a function body
#[derive(Debug, Clone)]
pub enum GoStmt {
    /// Short variable declaration: a, b := expr
    Define {
        /// Declared names
        names: Vec<String>,
        /// Initializer
        value: GoExpr,
    },
    /// Assignment: a = expr
    Assign {
        /// Assigned location
        target: GoExpr,
        /// New value
        value: GoExpr,
    },
    /// Variable declaration: var name T
    Var {
        /// Variable name
        name: String,
        /// Declared type
        ty: GoType,
    },
    /// Expression statement
    Expr(GoExpr),
    /// Return statement
    Return(Vec<GoExpr>),
    /// If statement with optional init clause
    If {
        /// Simple statement run before the condition
        init: Option<Box<GoStmt>>,
        /// Condition
        cond: GoExpr,
        /// Statements when the condition holds
        then_body: Vec<GoStmt>,
        /// Statements otherwise
        else_body: Option<Vec<GoStmt>>,
    },
    /// for key, value := range expr
    Range {
        /// Key variable
        key: String,
        /// Value variable
        value: String,
        /// Ranged-over expression
        expr: GoExpr,
        /// Loop body
        body: Vec<GoStmt>,
    },
    /// defer expr
    Defer(GoExpr),
    /// Empty line between statement groups
    Blank,
    /// Raw code (for patterns that don't fit the AST)
    Raw(String),
}

/// Function parameter or receiver
#[derive(Debug, Clone)]
pub struct GoParam {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: GoType,
}

impl GoParam {
    /// Build a parameter.
    pub fn new(name: &str, ty: GoType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Function or method definition
#[derive(Debug, Clone)]
pub struct GoFunc {
    /// Doc comment lines, without the leading `//`
    pub doc: Vec<String>,
    /// Method receiver; plain functions have none
    pub receiver: Option<GoParam>,
    /// Function name
    pub name: String,
    /// Parameters in order
    pub params: Vec<GoParam>,
    /// Result types, parenthesized when more than one
    pub results: Vec<GoType>,
    /// Statements
    pub body: Vec<GoStmt>,
}

/// Struct field
#[derive(Debug, Clone)]
pub struct GoField {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: GoType,
    /// Struct tag contents, without backquotes
    pub tag: Option<String>,
}

/// Top-level declaration
#[derive(Debug, Clone)]
pub enum GoDecl {
    /// type Name struct { ... }; field groups are separated by blank lines
    Struct {
        /// Doc comment lines, without the leading `//`
        doc: Vec<String>,
        /// Type name
        name: String,
        /// Field groups, aligned independently
        groups: Vec<Vec<GoField>>,
    },
    /// type Name T
    TypeDef {
        /// Type name
        name: String,
        /// Underlying type
        ty: GoType,
    },
    /// func ...
    Func(GoFunc),
}

/// Import spec
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoImport {
    /// Import path, unquoted
    pub path: String,
}

impl GoImport {
    /// Standard library imports have no dot in their first path element.
    pub fn is_std(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

/// Complete Go source file
#[derive(Debug, Clone)]
pub struct GoFile {
    /// Leading comment, emitted above the package clause
    pub header: Option<String>,
    /// Package clause name
    pub package: String,
    /// Imports; standard library first when emitted
    pub imports: Vec<GoImport>,
    /// Top-level declarations in order
    pub decls: Vec<GoDecl>,
}
