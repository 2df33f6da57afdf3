//! Go code emission via the Emit trait.
//!
//! Each AST type implements `Emit`. Output follows gofmt layout: tab
//! indentation, aligned struct fields and multi-line composite keys, and
//! standard library imports grouped ahead of the rest.

use super::types::{
    BinOp, GoDecl, GoExpr, GoField, GoFile, GoFunc, GoImport, GoParam, GoStmt, GoType,
};
use super::utils::escape_go_string;

/// Trait for emitting Go code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Go source representation.
    fn emit(&self) -> String;
}

fn tabs(indent: usize) -> String {
    "\t".repeat(indent)
}

// =============================================================================
// Types
// =============================================================================

impl Emit for GoType {
    fn emit(&self) -> String {
        match self {
            GoType::Ident(name) => name.clone(),
            GoType::Qualified { package, name } => format!("{package}.{name}"),
            GoType::Slice(inner) => format!("[]{}", inner.emit()),
            GoType::Pointer(inner) => format!("*{}", inner.emit()),
            GoType::Map { key, value } => format!("map[{}]{}", key.emit(), value.emit()),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::Add => "+",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::Greater => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::And => "&&",
        }
        .to_string()
    }
}

impl Emit for GoExpr {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl GoExpr {
    /// Emit an expression that starts on a line indented `indent` levels.
    pub fn emit_at(&self, indent: usize) -> String {
        match self {
            GoExpr::Ident(name) => name.clone(),
            GoExpr::Str(s) => format!("\"{}\"", escape_go_string(s)),
            GoExpr::Int(i) => i.to_string(),
            GoExpr::Call { callee, args } => {
                let compact = args.len() > 1;
                let args_str = args
                    .iter()
                    .map(|a| if compact { a.emit_arg(indent) } else { a.emit_at(indent) })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", callee.emit_at(indent), args_str)
            }
            GoExpr::Selector { object, field } => format!("{}.{}", object.emit_at(indent), field),
            GoExpr::Index { object, index } => {
                format!("{}[{}]", object.emit_at(indent), index.emit_at(indent))
            }
            GoExpr::Type(ty) => ty.emit(),
            GoExpr::AddrOf(inner) => format!("&{}", inner.emit_at(indent)),
            GoExpr::Deref(inner) => format!("*{}", inner.emit_at(indent)),
            GoExpr::Convert { ty, expr } => match ty {
                // Pointer conversions need parentheses: (*T)(x)
                GoType::Pointer(_) => format!("({})({})", ty.emit(), expr.emit_at(indent)),
                _ => format!("{}({})", ty.emit(), expr.emit_at(indent)),
            },
            GoExpr::Binary { left, op, right } => format!(
                "{} {} {}",
                left.emit_at(indent),
                op.emit(),
                right.emit_at(indent)
            ),
            GoExpr::Composite {
                ty,
                fields,
                multiline,
            } => emit_composite(ty, fields, *multiline, indent),
            GoExpr::Raw(code) => code.clone(),
        }
    }
}

impl GoExpr {
    /// In argument lists of more than one argument gofmt drops the blanks
    /// around additive operators.
    fn emit_arg(&self, indent: usize) -> String {
        match self {
            GoExpr::Binary {
                left,
                op: BinOp::Add,
                right,
            } => format!("{}+{}", left.emit_arg(indent), right.emit_arg(indent)),
            _ => self.emit_at(indent),
        }
    }
}

fn emit_composite(ty: &GoType, fields: &[(String, GoExpr)], multiline: bool, indent: usize) -> String {
    let ty_str = ty.emit();
    if fields.is_empty() {
        return format!("{ty_str}{{}}");
    }

    if !multiline {
        let fields_str = fields
            .iter()
            .map(|(key, value)| {
                if key.is_empty() {
                    value.emit_at(indent)
                } else {
                    format!("{}: {}", key, value.emit_at(indent))
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        return format!("{ty_str}{{{fields_str}}}");
    }

    let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let inner = tabs(indent + 1);
    let mut output = format!("{ty_str}{{\n");
    for (key, value) in fields {
        let value_str = value.emit_at(indent + 1);
        if key.is_empty() {
            output.push_str(&format!("{inner}{value_str},\n"));
        } else {
            let key_col = format!("{key}:");
            output.push_str(&format!("{inner}{key_col:<w$} {value_str},\n", w = width + 1));
        }
    }
    output.push_str(&tabs(indent));
    output.push('}');
    output
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for GoStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl GoStmt {
    /// Statement text without indentation or trailing newline, for simple statements.
    fn emit_simple(&self, indent: usize) -> String {
        match self {
            GoStmt::Define { names, value } => {
                format!("{} := {}", names.join(", "), value.emit_at(indent))
            }
            GoStmt::Assign { target, value } => {
                format!("{} = {}", target.emit_at(indent), value.emit_at(indent))
            }
            GoStmt::Var { name, ty } => format!("var {} {}", name, ty.emit()),
            GoStmt::Expr(expr) => expr.emit_at(indent),
            GoStmt::Return(values) if values.is_empty() => "return".to_string(),
            GoStmt::Return(values) => format!(
                "return {}",
                values
                    .iter()
                    .map(|v| v.emit_at(indent))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            GoStmt::Defer(expr) => format!("defer {}", expr.emit_at(indent)),
            GoStmt::If { .. } | GoStmt::Range { .. } | GoStmt::Blank | GoStmt::Raw(_) => {
                self.emit_indented(indent).trim().to_string()
            }
        }
    }

    /// Emit with specified indentation level (one tab per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = tabs(indent);
        match self {
            GoStmt::If {
                init,
                cond,
                then_body,
                else_body,
            } => {
                let init_str = init
                    .as_ref()
                    .map(|stmt| format!("{}; ", stmt.emit_simple(indent)))
                    .unwrap_or_default();
                let mut output = format!("{prefix}if {init_str}{} {{\n", cond.emit_at(indent));
                output.push_str(&emit_block(then_body, indent + 1));
                if let Some(else_stmts) = else_body {
                    output.push_str(&format!("{prefix}}} else {{\n"));
                    output.push_str(&emit_block(else_stmts, indent + 1));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            GoStmt::Range {
                key,
                value,
                expr,
                body,
            } => {
                let mut output = format!(
                    "{prefix}for {key}, {value} := range {} {{\n",
                    expr.emit_at(indent)
                );
                output.push_str(&emit_block(body, indent + 1));
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            GoStmt::Blank => "\n".to_string(),
            GoStmt::Raw(code) => code
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        "\n".to_string()
                    } else {
                        format!("{prefix}{line}\n")
                    }
                })
                .collect(),
            _ => format!("{prefix}{}\n", self.emit_simple(indent)),
        }
    }
}

fn emit_block(stmts: &[GoStmt], indent: usize) -> String {
    stmts.iter().map(|stmt| stmt.emit_indented(indent)).collect()
}

// =============================================================================
// Declarations
// =============================================================================

impl Emit for GoParam {
    fn emit(&self) -> String {
        format!("{} {}", self.name, self.ty.emit())
    }
}

impl Emit for GoFunc {
    fn emit(&self) -> String {
        let mut output = emit_doc(&self.doc);

        let receiver = self
            .receiver
            .as_ref()
            .map(|r| format!("({}) ", r.emit()))
            .unwrap_or_default();
        let params = self
            .params
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join(", ");
        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", single.emit()),
            many => format!(
                " ({})",
                many.iter().map(Emit::emit).collect::<Vec<_>>().join(", ")
            ),
        };

        output.push_str(&format!(
            "func {receiver}{}({params}){results} {{\n",
            self.name
        ));
        output.push_str(&emit_block(&self.body, 1));
        output.push_str("}\n");
        output
    }
}

fn emit_doc(doc: &[String]) -> String {
    doc.iter().map(|line| format!("// {line}\n")).collect()
}

/// Emit a run of fields with gofmt column alignment.
fn emit_field_group(fields: &[GoField]) -> String {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let type_width = fields
        .iter()
        .filter(|f| f.tag.is_some())
        .map(|f| f.ty.emit().len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for field in fields {
        let ty = field.ty.emit();
        let line = match &field.tag {
            Some(tag) => format!(
                "{:<nw$} {:<tw$} `{}`",
                field.name,
                ty,
                tag,
                nw = name_width,
                tw = type_width
            ),
            None => format!("{:<nw$} {}", field.name, ty, nw = name_width),
        };
        output.push('\t');
        output.push_str(&line);
        output.push('\n');
    }
    output
}

impl Emit for GoDecl {
    fn emit(&self) -> String {
        match self {
            GoDecl::Struct { doc, name, groups } => {
                let mut output = emit_doc(doc);
                let groups: Vec<_> = groups.iter().filter(|g| !g.is_empty()).collect();
                if groups.is_empty() {
                    output.push_str(&format!("type {name} struct{{}}\n"));
                    return output;
                }
                output.push_str(&format!("type {name} struct {{\n"));
                let body = groups
                    .iter()
                    .map(|group| emit_field_group(group))
                    .collect::<Vec<_>>()
                    .join("\n");
                output.push_str(&body);
                output.push_str("}\n");
                output
            }
            GoDecl::TypeDef { name, ty } => format!("type {} {}\n", name, ty.emit()),
            GoDecl::Func(func) => func.emit(),
        }
    }
}

// =============================================================================
// File
// =============================================================================

impl Emit for GoImport {
    fn emit(&self) -> String {
        format!("\"{}\"", self.path)
    }
}

fn emit_imports(imports: &[GoImport]) -> String {
    let mut imports = imports.to_vec();
    imports.sort();
    imports.dedup();

    match imports.as_slice() {
        [] => String::new(),
        [single] => format!("import {}\n\n", single.emit()),
        _ => {
            let (std, other): (Vec<_>, Vec<_>) = imports.iter().partition(|i| i.is_std());
            let group = |items: &[&GoImport]| -> String {
                items.iter().map(|i| format!("\t{}\n", i.emit())).collect()
            };
            let mut output = "import (\n".to_string();
            output.push_str(&group(&std));
            if !std.is_empty() && !other.is_empty() {
                output.push('\n');
            }
            output.push_str(&group(&other));
            output.push_str(")\n\n");
            output
        }
    }
}

impl Emit for GoFile {
    fn emit(&self) -> String {
        let mut output = String::new();
        if let Some(header) = &self.header {
            output.push_str(&emit_doc(&[header.clone()]));
            output.push('\n');
        }
        output.push_str(&format!("package {}\n\n", self.package));
        output.push_str(&emit_imports(&self.imports));
        let decls = self
            .decls
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join("\n");
        output.push_str(&decls);
        output
    }
}

// =============================================================================
// Tests
// =============================================================================
