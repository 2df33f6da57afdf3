//! Schema graph resolution.
//!
//! Builds the named-schema table for a document and computes the closed set
//! of schema names reachable from the in-scope operations.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::openapi::config::{GeneratorConfig, SchemaSource};
use crate::openapi::spec::{OpenApiSpec, Schema};

/// Named schemas of one document.
#[derive(Debug, Default)]
pub struct SchemaTable {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaTable {
    /// Collect named schemas according to `source`.
    pub fn build(spec: &OpenApiSpec, source: SchemaSource) -> Self {
        let mut table = Self::default();
        match source {
            SchemaSource::ComponentTable => {
                if let Some(components) = &spec.components {
                    for (name, schema) in &components.schemas {
                        table.schemas.insert(name.clone(), schema.clone());
                    }
                }
            }
            SchemaSource::DeclaredIds => table.collect_declared(&spec.document),
        }
        debug!(count = table.schemas.len(), ?source, "Built schema table");
        table
    }

    /// Pre-order walk of the whole document registering every `$id` node; the
    /// first occurrence wins. `$ref` nodes are registered but not descended into.
    fn collect_declared(&mut self, value: &Value) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("$id")
                    && !self.schemas.contains_key(id)
                {
                    match Schema::deserialize(value) {
                        Ok(schema) => {
                            self.schemas.insert(id.clone(), schema);
                        }
                        Err(err) => debug!(schema = %id, error = %err, "Skipping unreadable schema"),
                    }
                }
                if !map.contains_key("$ref") {
                    for child in map.values() {
                        self.collect_declared(child);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_declared(item);
                }
            }
            _ => {}
        }
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Whether `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of named schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Names already expanded during one resolution.
#[derive(Debug, Default)]
pub struct TraversalContext {
    expanded: BTreeSet<String>,
}

impl TraversalContext {
    /// Mark `name` expanded. Returns false if it already was.
    pub fn mark(&mut self, name: &str) -> bool {
        if self.expanded.contains(name) {
            return false;
        }
        self.expanded.insert(name.to_string())
    }

    /// Whether `name` has been expanded.
    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }
}

/// Names a schema depends on directly.
///
/// Walks properties, items, union members and schema-valued
/// `additionalProperties`; a named child is recorded without descending into it.
pub fn direct_dependencies(schema: &Schema) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();
    collect_dependencies(schema, &mut deps);
    deps
}

fn collect_dependencies(schema: &Schema, deps: &mut BTreeSet<String>) {
    for child in schema.children() {
        match child.named() {
            Some(name) => {
                deps.insert(name.to_string());
            }
            None => collect_dependencies(child, deps),
        }
    }
}

/// Names seeded from one top-level operation schema.
fn seed(schema: &Schema, seeds: &mut Vec<String>) {
    match schema.named() {
        Some(name) => seeds.push(name.to_string()),
        None => seeds.extend(direct_dependencies(schema)),
    }
}

/// Compute the Used-Schema Set.
///
/// Seeds from request bodies and success responses of in-scope operations
/// plus applied response overrides, then closes over direct dependencies.
/// Names missing from `table` are dropped.
pub fn resolve_used_schemas(
    spec: &OpenApiSpec,
    table: &SchemaTable,
    config: &GeneratorConfig,
) -> BTreeSet<String> {
    let mut pending = Vec::new();
    for (path, method, op) in spec.operations_matching(&config.path_filter) {
        for schema in op.request_schemas().chain(op.success_schemas()) {
            seed(schema, &mut pending);
        }
        if op.response_type_name().is_none()
            && let Some(target) = config
                .response_overrides
                .get(&GeneratorConfig::override_key(method.as_str(), path))
        {
            pending.push(target.clone());
        }
    }

    let mut ctx = TraversalContext::default();
    let mut used = BTreeSet::new();
    while let Some(name) = pending.pop() {
        if !ctx.mark(&name) {
            continue;
        }
        let Some(schema) = table.get(&name) else {
            debug!(schema = %name, "Skipping reference to unknown schema");
            continue;
        };
        pending.extend(
            direct_dependencies(schema)
                .into_iter()
                .filter(|dep| !ctx.is_expanded(dep)),
        );
        used.insert(name);
    }

    debug!(count = used.len(), "Resolved used schemas");
    used
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::config::{PathFilter, Preset};

    fn component_config() -> GeneratorConfig {
        GeneratorConfig {
            schema_source: SchemaSource::ComponentTable,
            path_filter: PathFilter::Prefixes(vec!["/".into()]),
            ..GeneratorConfig::default()
        }
    }

    fn resolve(json: &str, config: &GeneratorConfig) -> Vec<String> {
        let spec = OpenApiSpec::from_json(json).unwrap();
        let table = SchemaTable::build(&spec, config.schema_source);
        resolve_used_schemas(&spec, &table, config)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_declared_ids_first_occurrence_wins() {
        let spec = OpenApiSpec::from_json(
            r#"{
                "paths": {
                    "/v1/a": {"post": {"requestBody": {"content": {"application/json": {"schema": {
                        "$id": "Thing", "type": "object", "properties": {"first": {"type": "string"}}
                    }}}}}},
                    "/v1/b": {"post": {"requestBody": {"content": {"application/json": {"schema": {
                        "$id": "Thing", "type": "object", "properties": {"second": {"type": "string"}}
                    }}}}}}
                }
            }"#,
        )
        .unwrap();
        let table = SchemaTable::build(&spec, SchemaSource::DeclaredIds);
        let thing = table.get("Thing").unwrap();
        assert!(thing.properties.as_ref().unwrap().contains_key("first"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_declared_ids_collect_nested_and_stop_at_refs() {
        let spec = OpenApiSpec::from_json(
            r##"{
                "paths": {},
                "components": {"schemas": {
                    "Outer": {"$id": "Outer", "properties": {
                        "inner": {"$id": "Inner", "type": "object"},
                        "other": {"$ref": "#/components/schemas/Other", "$id": "Hidden",
                                  "items": {"$id": "Beneath"}}
                    }}
                }}
            }"##,
        )
        .unwrap();
        let table = SchemaTable::build(&spec, SchemaSource::DeclaredIds);
        assert!(table.contains("Outer"));
        assert!(table.contains("Inner"));
        assert!(table.contains("Hidden"));
        assert!(!table.contains("Other"));
        assert!(!table.contains("Beneath"));
    }

    #[test]
    fn test_declared_ids_anywhere_in_document() {
        let config = GeneratorConfig::default();
        let used = resolve(
            r#"{
                "paths": {"/v1/pages": {
                    "parameters": [{"name": "tag", "in": "query", "schema": {
                        "$id": "Meta", "type": "object", "properties": {"tag": {"type": "string"}}
                    }}],
                    "get": {"responses": {"200": {"content": {"application/json": {"schema": {
                        "$id": "Page", "type": "object", "properties": {
                            "meta": {"$ref": "Meta"},
                            "footer": {"$ref": "Footer"}
                        }
                    }}}}}}
                }},
                "components": {"responses": {"Shared": {"content": {"application/json": {"schema": {
                    "$id": "Footer", "type": "object", "x-extra": {"$id": "Vendor"}
                }}}}}}
            }"#,
            &config,
        );
        assert_eq!(used, vec!["Footer", "Meta", "Page"]);

        let spec = OpenApiSpec::from_json(
            r#"{"paths": {}, "x-vendor": {"nested": [{"$id": "Vendor", "type": "string"}]}}"#,
        )
        .unwrap();
        assert!(SchemaTable::build(&spec, SchemaSource::DeclaredIds).contains("Vendor"));
    }

    #[test]
    fn test_closure_follows_every_edge_kind() {
        let used = resolve(
            r##"{
                "paths": {"/items": {"get": {"responses": {"200": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Page"}
                }}}}}}},
                "components": {"schemas": {
                    "Page": {"type": "object", "properties": {
                        "items": {"type": "array", "items": {"$ref": "#/components/schemas/Item"}},
                        "cursor": {"anyOf": [{"$ref": "#/components/schemas/Cursor"}, {"type": "null"}]},
                        "meta": {"type": "object", "additionalProperties": {"$ref": "#/components/schemas/Meta"}}
                    }},
                    "Item": {"type": "object", "properties": {"name": {"type": "string"}}},
                    "Cursor": {"type": "string"},
                    "Meta": {"type": "object"},
                    "Unused": {"type": "object"}
                }}
            }"##,
            &component_config(),
        );
        assert_eq!(used, vec!["Cursor", "Item", "Meta", "Page"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let used = resolve(
            r##"{
                "paths": {"/a": {"post": {"requestBody": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/A"}
                }}}}}},
                "components": {"schemas": {
                    "A": {"type": "object", "properties": {
                        "b": {"$ref": "#/components/schemas/B"},
                        "me": {"$ref": "#/components/schemas/A"}
                    }},
                    "B": {"type": "object", "properties": {"a": {"$ref": "#/components/schemas/A"}}}
                }}
            }"##,
            &component_config(),
        );
        assert_eq!(used, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_reference_is_skipped() {
        let used = resolve(
            r##"{
                "paths": {"/a": {"get": {"responses": {"200": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/A"}
                }}}}}}},
                "components": {"schemas": {
                    "A": {"type": "object", "properties": {"gone": {"$ref": "#/components/schemas/Gone"}}}
                }}
            }"##,
            &component_config(),
        );
        assert_eq!(used, vec!["A"]);
    }

    #[test]
    fn test_inline_response_seeds_its_dependencies() {
        let used = resolve(
            r##"{
                "paths": {"/a": {"get": {"responses": {
                    "200": {"content": {"application/json": {"schema": {
                        "type": "array", "items": {"$ref": "#/components/schemas/A"}
                    }}}},
                    "422": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Err"}}}}
                }}}},
                "components": {"schemas": {"A": {"type": "string"}, "Err": {"type": "object"}}}
            }"##,
            &component_config(),
        );
        assert_eq!(used, vec!["A"]);
    }

    #[test]
    fn test_out_of_scope_paths_do_not_seed() {
        let mut config = component_config();
        config.path_filter = PathFilter::Exact(vec!["/kept/".into()]);
        let used = resolve(
            r##"{
                "paths": {
                    "/kept/": {"get": {"responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/K"}}}}}}},
                    "/dropped/": {"get": {"responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/D"}}}}}}}
                },
                "components": {"schemas": {"K": {"type": "string"}, "D": {"type": "string"}}}
            }"##,
            &config,
        );
        assert_eq!(used, vec!["K"]);
    }

    #[test]
    fn test_override_target_is_seeded() {
        let config = GeneratorConfig::preset(Preset::Narrow);
        let used = resolve(
            r##"{
                "paths": {"/add_to_run_eval_queue/": {"post": {"responses": {"200": {"description": "ok"}}}}},
                "components": {"schemas": {
                    "EvalResults": {"type": "object", "properties": {"results": {
                        "type": "array", "items": {"$ref": "#/components/schemas/ScoringResult"}
                    }}},
                    "ScoringResult": {"type": "object"}
                }}
            }"##,
            &config,
        );
        assert_eq!(used, vec!["EvalResults", "ScoringResult"]);
    }

    #[test]
    fn test_closure_is_a_fixed_point() {
        let json = r##"{
            "paths": {"/a": {"get": {"responses": {"200": {"content": {"application/json": {
                "schema": {"$ref": "#/components/schemas/A"}
            }}}}}}},
            "components": {"schemas": {
                "A": {"properties": {"b": {"$ref": "#/components/schemas/B"}}},
                "B": {"items": {"$ref": "#/components/schemas/C"}, "type": "array"},
                "C": {"oneOf": [{"$ref": "#/components/schemas/A"}, {"type": "integer"}]}
            }}
        }"##;
        let spec = OpenApiSpec::from_json(json).unwrap();
        let config = component_config();
        let table = SchemaTable::build(&spec, config.schema_source);
        let used = resolve_used_schemas(&spec, &table, &config);
        for name in &used {
            for dep in direct_dependencies(table.get(name).unwrap()) {
                assert!(used.contains(&dep), "{dep} missing from closure of {name}");
            }
        }
        assert_eq!(used.len(), 3);
    }
}
