//! Normalization from OpenAPI spec to API IR.
//!
//! This module handles all the OpenAPI-specific logic:
//! - Method naming from operation ids or paths
//! - Path and query parameter binding
//! - Request and response type binding
//! - Used schemas to type definitions

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::openapi::config::{GeneratorConfig, NamingConfig};
use crate::openapi::error::GenerateError;
use crate::openapi::spec::{HttpMethod, OpenApiSpec, Operation, Schema};

use super::api::{ApiIR, FieldIR, OperationIR, ParamIR, TypeDefIR, TypeDefKind, UrlIR};
use super::mapper::{map_structure, map_type};
use super::resolve::{SchemaTable, resolve_used_schemas};
use super::types::TypeExpr;
use super::utils::{
    INDEX_METHOD_NAME, field_ident, param_ident, pascal_case, sanitize_go_identifier, snake_case,
    type_ident, unique_ident,
};

/// Name of the catch-all field on every record type.
pub const ADDITIONAL_PROPERTIES_FIELD: &str = "AdditionalProperties";

/// Identifiers used inside generated method bodies; parameters must not shadow them.
const METHOD_LOCALS: &[&str] = &[
    "c", "path", "query", "result", "err", "payload", "bytes", "fmt", "http", "io", "json", "url",
];

#[allow(clippy::expect_used)]
static PATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("valid regex"));
#[allow(clippy::expect_used)]
static REPEATED_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Compiled method naming rules.
#[derive(Debug)]
pub struct NameRules {
    path_prefix: Option<String>,
    rewrites: Vec<(Regex, String)>,
}

impl NameRules {
    /// Compile the configured rewrites.
    pub fn compile(naming: &NamingConfig) -> Result<Self, GenerateError> {
        let rewrites = naming
            .operation_id_rewrites
            .iter()
            .map(|rewrite| {
                Regex::new(&rewrite.pattern)
                    .map(|regex| (regex, rewrite.replacement.clone()))
                    .map_err(|source| GenerateError::InvalidRewrite {
                        pattern: rewrite.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            path_prefix: naming.path_prefix.clone(),
            rewrites,
        })
    }

    /// Method name for an operation: from its operationId when declared, else from its path.
    pub fn method_name(&self, path: &str, op: &Operation) -> String {
        match op.operation_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => self.name_from_operation_id(id),
            None => self.name_from_path(path),
        }
    }

    fn name_from_operation_id(&self, operation_id: &str) -> String {
        let mut name = snake_case(operation_id);
        for (regex, replacement) in &self.rewrites {
            name = regex.replace_all(&name, replacement.as_str()).into_owned();
        }
        sanitize_go_identifier(&pascal_case(&name.replace('-', "_")))
    }

    fn name_from_path(&self, path: &str) -> String {
        let stripped = PATH_PLACEHOLDER.replace_all(path, "");
        let joined = stripped.trim_matches('/').replace(['/', '-'], "_");
        let collapsed = REPEATED_UNDERSCORES.replace_all(&joined, "_");
        let mut name = collapsed.trim_matches('_').to_string();
        if name.is_empty() {
            return INDEX_METHOD_NAME.to_string();
        }
        if let Some(prefix) = &self.path_prefix {
            if name == *prefix {
                name = "index".to_string();
            } else if let Some(rest) = name.strip_prefix(&format!("{prefix}_")) {
                name = rest.to_string();
            }
        }
        sanitize_go_identifier(&pascal_case(&name))
    }
}

/// Normalize an OpenAPI spec into API IR
pub fn normalize_spec(spec: &OpenApiSpec, config: &GeneratorConfig) -> Result<ApiIR, GenerateError> {
    let rules = NameRules::compile(&config.naming)?;
    let table = SchemaTable::build(spec, config.schema_source);
    let used = resolve_used_schemas(spec, &table, config);

    let operations = extract_operations(spec, config, &rules)?;

    let mut types = Vec::with_capacity(used.len());
    for name in &used {
        if let Some(schema) = table.get(name) {
            types.push(normalize_schema_to_typedef(name, schema));
        }
    }
    check_duplicate_types(&types)?;
    // Sort by emitted name for deterministic output
    types.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ApiIR { operations, types })
}

/// Build one descriptor per in-scope operation, rejecting method name collisions.
pub fn extract_operations(
    spec: &OpenApiSpec,
    config: &GeneratorConfig,
    rules: &NameRules,
) -> Result<Vec<OperationIR>, GenerateError> {
    let mut operations: Vec<OperationIR> = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for (path, method, op) in spec.operations_matching(&config.path_filter) {
        let op_ir = normalize_operation(path, method, op, config, rules);
        let label = op_ir.label();
        if let Some(first) = seen.insert(op_ir.name.clone(), label.clone()) {
            return Err(GenerateError::DuplicateMethod {
                name: op_ir.name,
                first,
                second: label,
            });
        }
        debug!(operation = %label, method = %op_ir.name, "Normalized operation");
        operations.push(op_ir);
    }

    Ok(operations)
}

fn normalize_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    config: &GeneratorConfig,
    rules: &NameRules,
) -> OperationIR {
    let url = UrlIR::parse(path);

    let mut taken: HashSet<String> = METHOD_LOCALS.iter().map(|s| s.to_string()).collect();
    taken.insert(config.output.models_package.clone());

    let path_params = url
        .params()
        .map(|name| ParamIR {
            name: name.to_string(),
            ident: unique_ident(param_ident(name), &mut taken),
            required: true,
        })
        .collect();

    let query_params = op
        .parameters
        .iter()
        .filter(|p| p.location == "query" && !p.name.is_empty())
        .map(|p| ParamIR {
            name: p.name.clone(),
            ident: unique_ident(param_ident(&p.name), &mut taken),
            required: p.required,
        })
        .collect();

    let response = match op.response_type_name() {
        Some(name) => TypeExpr::Named(type_ident(name)),
        None => config
            .response_overrides
            .get(&GeneratorConfig::override_key(method.as_str(), path))
            .map_or(TypeExpr::Dynamic, |target| {
                TypeExpr::Named(type_ident(target))
            }),
    };

    OperationIR {
        name: rules.method_name(path, op),
        method,
        path: path.to_string(),
        url,
        path_params,
        query_params,
        request: op.request_type_name().map(type_ident),
        response,
    }
}

/// Convert a used schema to a type definition
fn normalize_schema_to_typedef(name: &str, schema: &Schema) -> TypeDefIR {
    let kind = if schema.is_array() {
        TypeDefKind::Sequence(schema.items.as_deref().map_or(TypeExpr::Dynamic, map_type))
    } else if schema.properties.is_some() || schema.is_object() {
        TypeDefKind::Record {
            fields: normalize_properties(schema),
        }
    } else {
        TypeDefKind::Alias(map_structure(schema))
    };

    TypeDefIR {
        name: type_ident(name),
        source: name.to_string(),
        kind,
    }
}

fn normalize_properties(schema: &Schema) -> Vec<FieldIR> {
    let mut taken = HashSet::from([ADDITIONAL_PROPERTIES_FIELD.to_string()]);
    schema
        .properties
        .iter()
        .flatten()
        .map(|(json_name, prop)| FieldIR {
            json_name: json_name.clone(),
            ident: unique_ident(field_ident(json_name), &mut taken),
            ty: map_type(prop),
        })
        .collect()
}

/// Reject two schemas that would share a Go type name or a file name.
fn check_duplicate_types(types: &[TypeDefIR]) -> Result<(), GenerateError> {
    let mut names: BTreeMap<String, &str> = BTreeMap::new();
    let mut files: BTreeMap<String, &str> = BTreeMap::new();
    for ty in types {
        if let Some(first) = names.insert(ty.name.clone(), &ty.source) {
            return Err(GenerateError::DuplicateType {
                name: ty.name.clone(),
                first: first.to_string(),
                second: ty.source.clone(),
            });
        }
        if let Some(first) = files.insert(ty.file_name(), &ty.source) {
            return Err(GenerateError::DuplicateType {
                name: ty.file_name(),
                first: first.to_string(),
                second: ty.source.clone(),
            });
        }
    }
    Ok(())
}
