//! Schema node -> type expression mapping.
//!
//! Total over every schema node: shapes that cannot be represented
//! precisely degrade to [`TypeExpr::Dynamic`].

use std::collections::BTreeSet;

use tracing::debug;

use super::types::{Primitive, TypeExpr};
use super::utils::type_ident;
use crate::openapi::spec::{Schema, SchemaType};

/// Map a schema node to a type expression.
pub fn map_type(schema: &Schema) -> TypeExpr {
    if let Some(name) = schema.named() {
        return TypeExpr::Named(type_ident(name));
    }
    map_structure(schema)
}

/// Map a schema node by its structure, ignoring its own declared identifier.
///
/// Used for the body of a named alias, which would otherwise map to itself.
pub fn map_structure(schema: &Schema) -> TypeExpr {
    if let Some(name) = schema.ref_name() {
        return TypeExpr::Named(type_ident(name));
    }

    if let Some(members) = schema.union_members() {
        return map_union(members);
    }

    match &schema.schema_type {
        Some(SchemaType::Single(ty)) => map_type_name(ty, schema),
        Some(SchemaType::Multiple(types)) => {
            let mut non_null = types.iter().filter(|t| t.as_str() != "null");
            match (non_null.next(), non_null.next()) {
                (Some(ty), None) => map_type_name(ty, schema),
                _ => TypeExpr::Dynamic,
            }
        }
        None => TypeExpr::Dynamic,
    }
}

fn map_type_name(ty: &str, schema: &Schema) -> TypeExpr {
    match ty {
        "string" => TypeExpr::Primitive(Primitive::String),
        "integer" => TypeExpr::Primitive(Primitive::Int),
        "number" => TypeExpr::Primitive(Primitive::Float),
        "boolean" => TypeExpr::Primitive(Primitive::Bool),
        "array" => {
            let item = schema
                .items
                .as_deref()
                .map_or(TypeExpr::Dynamic, map_type);
            TypeExpr::Sequence(Box::new(item))
        }
        "object" => TypeExpr::Dynamic,
        other => {
            debug!(schema_type = other, "Unrecognized schema type, using dynamic fallback");
            TypeExpr::Dynamic
        }
    }
}

/// Null members contribute nothing; one distinct remaining type wins, anything else is dynamic.
fn map_union(members: &[Schema]) -> TypeExpr {
    let distinct: BTreeSet<TypeExpr> = members
        .iter()
        .filter(|member| !member.is_null())
        .map(map_type)
        .collect();

    let mut iter = distinct.into_iter();
    match (iter.next(), iter.next()) {
        (Some(only), None) => only,
        _ => TypeExpr::Dynamic,
    }
}
