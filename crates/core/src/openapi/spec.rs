//! OpenAPI specification structs for serde deserialization.
//!
//! This module defines the subset of OpenAPI 3.x / JSON Schema that the
//! generator understands. Everything else in the document is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::config::PathFilter;
use super::error::GenerateError;

/// Prefix of local component references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Success status codes, in preference order.
pub const SUCCESS_STATUS_CODES: [&str; 2] = ["200", "201"];

/// Content types whose schemas bind request and response types, in preference order.
pub const BODY_CONTENT_TYPES: [&str; 2] = ["application/json", "text/plain"];

/// Root OpenAPI specification.
#[derive(Debug, Default, Deserialize)]
pub struct OpenApiSpec {
    /// Path template -> path item.
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Reusable components.
    pub components: Option<Components>,
    /// The whole document as parsed, for walks over keys the typed model drops.
    #[serde(skip)]
    pub document: serde_json::Value,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    /// Named schema table.
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request with this verb carries a body when none is declared.
    pub fn sends_empty_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    /// GET operation.
    pub get: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Declared operations in fixed verb order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Patch, self.patch.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// An API operation (endpoint).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Declared operation identifier.
    pub operation_id: Option<String>,
    /// Declared parameters. `$ref` parameters deserialize with empty fields and are ignored.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body.
    pub request_body: Option<RequestBody>,
    /// Status code -> response.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A parameter (query, path, header or cookie).
#[derive(Debug, Default, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    #[serde(default)]
    pub name: String,
    /// Location: `query`, `path`, `header` or `cookie`.
    #[serde(rename = "in", default)]
    pub location: String,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Default, Deserialize)]
pub struct RequestBody {
    /// Media type -> content.
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Default, Deserialize)]
pub struct Response {
    /// Media type -> content.
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Default, Deserialize)]
pub struct MediaType {
    /// Body schema.
    pub schema: Option<Schema>,
}

/// JSON Schema node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Declared identifier (`$id`) for globally named inline schemas.
    #[serde(rename = "$id")]
    pub id: Option<String>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Properties for object types.
    pub properties: Option<BTreeMap<String, Schema>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Union type (any of these schemas).
    pub any_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    pub one_of: Option<Vec<Schema>>,

    /// Intersection type, treated like a union by the mapper.
    pub all_of: Option<Vec<Schema>>,

    /// Additional properties for object types.
    pub additional_properties: Option<AdditionalProperties>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    Bool(bool),
    /// `additionalProperties: { ... }`
    Schema(Box<Schema>),
}

impl OpenApiSpec {
    /// Parse an OpenAPI spec from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let mut spec = Self::deserialize(&document)?;
        spec.document = document;
        Ok(spec)
    }

    /// Operations whose path passes `filter`, in path order then verb order.
    pub fn operations_matching<'a>(
        &'a self,
        filter: &'a PathFilter,
    ) -> impl Iterator<Item = (&'a str, HttpMethod, &'a Operation)> + 'a {
        self.paths
            .iter()
            .filter(|(path, _)| filter.matches(path))
            .flat_map(|(path, item)| {
                item.operations()
                    .map(move |(method, op)| (path.as_str(), method, op))
            })
    }
}

impl Operation {
    /// Every schema under the request body, whatever its content type.
    pub fn request_schemas(&self) -> impl Iterator<Item = &Schema> {
        self.request_body
            .iter()
            .flat_map(|body| body.content.values())
            .filter_map(|media| media.schema.as_ref())
    }

    /// Every schema under a success response, whatever its content type.
    pub fn success_schemas(&self) -> impl Iterator<Item = &Schema> {
        SUCCESS_STATUS_CODES
            .into_iter()
            .filter_map(|status| self.responses.get(status))
            .flat_map(|response| response.content.values())
            .filter_map(|media| media.schema.as_ref())
    }

    /// Name of the request body type, if a named schema is declared.
    pub fn request_type_name(&self) -> Option<&str> {
        self.request_body
            .as_ref()
            .and_then(|body| bound_schema_name(&body.content))
    }

    /// Name of the first success response type, if a named schema is declared.
    pub fn response_type_name(&self) -> Option<&str> {
        SUCCESS_STATUS_CODES
            .into_iter()
            .filter_map(|status| self.responses.get(status))
            .find_map(|response| bound_schema_name(&response.content))
    }
}

fn bound_schema_name(content: &BTreeMap<String, MediaType>) -> Option<&str> {
    BODY_CONTENT_TYPES.into_iter().find_map(|content_type| {
        content
            .get(content_type)
            .and_then(|media| media.schema.as_ref())
            .and_then(Schema::named)
    })
}

impl Schema {
    /// Name of the referenced schema, without the components prefix.
    pub fn ref_name(&self) -> Option<&str> {
        self.ref_path
            .as_deref()
            .map(|path| path.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or(path))
    }

    /// Name this node is known by: its reference target, else its declared identifier.
    pub fn named(&self) -> Option<&str> {
        self.ref_name().or(self.id.as_deref())
    }

    /// Whether this node is exactly `{"type": "null"}`.
    pub fn is_null(&self) -> bool {
        matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == "null")
    }

    /// Whether the node declares `type: object` (directly or in a type array).
    pub fn is_object(&self) -> bool {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => t == "object",
            Some(SchemaType::Multiple(types)) => types.iter().any(|t| t == "object"),
            None => false,
        }
    }

    /// Whether the node declares `type: array`.
    pub fn is_array(&self) -> bool {
        matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == "array")
    }

    /// Members of the first union keyword present, in `anyOf`, `oneOf`, `allOf` order.
    pub fn union_members(&self) -> Option<&[Schema]> {
        self.any_of
            .as_deref()
            .or(self.one_of.as_deref())
            .or(self.all_of.as_deref())
    }

    /// Direct structural children: property values, items, every union member
    /// and a schema-valued `additionalProperties`.
    pub fn children(&self) -> Vec<&Schema> {
        let mut children = Vec::new();
        if let Some(properties) = &self.properties {
            children.extend(properties.values());
        }
        if let Some(items) = &self.items {
            children.push(items.as_ref());
        }
        for members in [&self.any_of, &self.one_of, &self.all_of]
            .into_iter()
            .flatten()
        {
            children.extend(members.iter());
        }
        if let Some(AdditionalProperties::Schema(schema)) = &self.additional_properties {
            children.push(schema.as_ref());
        }
        children
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let spec = OpenApiSpec::from_json(r#"{"paths": {}}"#).unwrap();
        assert!(spec.paths.is_empty());
        assert!(spec.components.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = OpenApiSpec::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[test]
    fn test_ref_name_strips_component_prefix() {
        let schema: Schema =
            serde_json::from_str(r##"{"$ref": "#/components/schemas/Item"}"##).unwrap();
        assert_eq!(schema.ref_name(), Some("Item"));
        assert_eq!(schema.named(), Some("Item"));

        let bare: Schema = serde_json::from_str(r#"{"$ref": "Other"}"#).unwrap();
        assert_eq!(bare.ref_name(), Some("Other"));
    }

    #[test]
    fn test_children_cover_every_structural_edge() {
        let schema: Schema = serde_json::from_str(
            r##"{
                "type": "object",
                "properties": { "a": { "type": "string" } },
                "items": { "type": "integer" },
                "anyOf": [{ "type": "null" }],
                "oneOf": [{ "type": "boolean" }],
                "additionalProperties": { "$ref": "#/components/schemas/Value" }
            }"##,
        )
        .unwrap();
        assert_eq!(schema.children().len(), 5);
    }

    #[test]
    fn test_additional_properties_bool_has_no_child() {
        let schema: Schema =
            serde_json::from_str(r#"{"type": "object", "additionalProperties": true}"#).unwrap();
        assert!(schema.children().is_empty());
        assert!(schema.is_object());
    }

    #[test]
    fn test_operations_in_verb_order() {
        let item: PathItem = serde_json::from_str(
            r#"{"delete": {}, "get": {}, "post": {}, "summary": "ignored"}"#,
        )
        .unwrap();
        let verbs: Vec<_> = item.operations().map(|(m, _)| m.as_str()).collect();
        assert_eq!(verbs, vec!["GET", "POST", "DELETE"]);
    }

    #[test]
    fn test_response_type_prefers_200_then_json() {
        let op: Operation = serde_json::from_str(
            r##"{
                "responses": {
                    "201": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Created"}}}},
                    "200": {"content": {
                        "text/plain": {"schema": {"$id": "Plain"}},
                        "application/json": {"schema": {"type": "object"}}
                    }}
                }
            }"##,
        )
        .unwrap();
        assert_eq!(op.response_type_name(), Some("Plain"));
        assert_eq!(op.success_schemas().count(), 3);
    }

    #[test]
    fn test_operations_matching_filters_paths() {
        let spec = OpenApiSpec::from_json(
            r#"{"paths": {"/v1/b": {"post": {}}, "/health": {"get": {}}, "/v1/a": {"get": {}, "delete": {}}}}"#,
        )
        .unwrap();
        let filter = PathFilter::Prefixes(vec!["/v1".into()]);
        let selected: Vec<_> = spec
            .operations_matching(&filter)
            .map(|(path, method, _)| format!("{} {path}", method.as_str()))
            .collect();
        assert_eq!(selected, vec!["GET /v1/a", "DELETE /v1/a", "POST /v1/b"]);
    }

    #[test]
    fn test_ref_parameter_is_tolerated() {
        let op: Operation = serde_json::from_str(
            r##"{"parameters": [{"$ref": "#/components/parameters/Limit"}]}"##,
        )
        .unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert!(op.parameters[0].name.is_empty());
    }
}
