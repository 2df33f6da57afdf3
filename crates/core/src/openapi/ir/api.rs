//! API-level IR for normalized operations and type definitions.
//!
//! This module defines the intermediate representation handed to codegen:
//! - ApiIR: everything one generation run emits
//! - TypeDefIR: one named type per used schema
//! - OperationIR: one client method per in-scope (path, verb) pair

use super::types::TypeExpr;
use crate::openapi::spec::HttpMethod;

/// Complete API intermediate representation
#[derive(Debug, Clone, Default)]
pub struct ApiIR {
    /// Operations in path order, then verb order
    pub operations: Vec<OperationIR>,
    /// Type definitions sorted by name
    pub types: Vec<TypeDefIR>,
}

/// Named type definition
#[derive(Debug, Clone)]
pub struct TypeDefIR {
    /// Go type name
    pub name: String,
    /// Schema name it was derived from
    pub source: String,
    /// Shape of the emitted declaration
    pub kind: TypeDefKind,
}

impl TypeDefIR {
    /// File name of the artifact holding this type.
    pub fn file_name(&self) -> String {
        format!("{}.go", self.name.to_lowercase())
    }
}

/// Shape of a named type
#[derive(Debug, Clone)]
pub enum TypeDefKind {
    /// Struct with declared fields plus the catch-all map
    Record {
        /// Declared properties in schema order
        fields: Vec<FieldIR>,
    },
    /// `type X []T`
    Sequence(TypeExpr),
    /// `type X T`
    Alias(TypeExpr),
}

/// Declared record field
#[derive(Debug, Clone)]
pub struct FieldIR {
    /// Property name on the wire
    pub json_name: String,
    /// Go field name
    pub ident: String,
    /// Go field type before record pointers are applied
    pub ty: TypeExpr,
}

/// Normalized API operation
#[derive(Debug, Clone)]
pub struct OperationIR {
    /// Exported Go method name (e.g., "GetProjectRuns")
    pub name: String,
    /// HTTP verb
    pub method: HttpMethod,
    /// URL path template (e.g., "/v1/projects/{project_id}/runs")
    pub path: String,
    /// Parsed path template
    pub url: UrlIR,
    /// Path parameters in template order, always required strings
    pub path_params: Vec<ParamIR>,
    /// Query parameters in declaration order
    pub query_params: Vec<ParamIR>,
    /// Request body type name, when a named schema is declared
    pub request: Option<String>,
    /// Decoded response type: a named type or the dynamic fallback
    pub response: TypeExpr,
}

/// Path or query parameter
#[derive(Debug, Clone)]
pub struct ParamIR {
    /// Name on the wire
    pub name: String,
    /// Go parameter name
    pub ident: String,
    /// Whether the generated method takes it by value
    pub required: bool,
}

/// Path template split into static text and parameter slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlIR {
    /// Alternating static text and parameter slots
    pub parts: Vec<UrlPart>,
}

/// Piece of a path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPart {
    /// Literal text between placeholders
    Static(String),
    /// `{name}` placeholder
    Param(String),
}

impl UrlIR {
    /// Split `/a/{b}/c` into static and parameter parts.
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            if open > 0 {
                parts.push(UrlPart::Static(rest[..open].to_string()));
            }
            parts.push(UrlPart::Param(rest[open + 1..close].to_string()));
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            parts.push(UrlPart::Static(rest.to_string()));
        }
        Self { parts }
    }

    /// Parameter names in template order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            UrlPart::Param(name) => Some(name.as_str()),
            UrlPart::Static(_) => None,
        })
    }
}

impl OperationIR {
    /// `VERB path`, as used in diagnostics and override keys.
    pub fn label(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }

}
