//! Name normalization shared across normalization and codegen.
//!
//! Pure string-case conversions plus Go identifier sanitization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Go keywords and predeclared identifiers that would shadow or break generated code.
pub static GO_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
        "any",
        "bool",
        "error",
        "int",
        "string",
        "nil",
        "true",
        "false",
    ]
    .into_iter()
    .collect()
});

/// Method name used when a path yields no usable segments.
pub const INDEX_METHOD_NAME: &str = "Index";

fn split_segments(name: &str) -> Vec<&str> {
    name.split(['-', '_']).collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `project_id` -> `projectId`, `HTTP_status` -> `httpStatus`.
///
/// The first segment is lower-cased whole; later segments are capitalized.
pub fn camel_case(name: &str) -> String {
    let segments = split_segments(name);
    let mut result = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            result.push_str(&segment.to_lowercase());
        } else {
            result.push_str(&capitalize_first(segment));
        }
    }
    result
}

/// `add_to_run_eval_queue` -> `AddToRunEvalQueue`, `item` -> `Item`.
pub fn pascal_case(name: &str) -> String {
    let clean = name.replace('-', "_");
    if clean.contains('_') {
        clean
            .split('_')
            .filter(|part| !part.is_empty())
            .map(capitalize_first)
            .collect()
    } else {
        capitalize_first(&clean)
    }
}

#[allow(clippy::expect_used)]
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// `getV1ProjectsByProjectId` -> `get_v1_projects_by_project_id`.
pub fn snake_case(name: &str) -> String {
    let split = WORD_START.replace_all(name, "${1}_${2}");
    LOWER_UPPER.replace_all(&split, "${1}_${2}").to_lowercase()
}

/// Make `name` a valid Go identifier.
/// - Drops characters that cannot appear in an identifier
/// - Prepends `_` if it starts with a digit
/// - Appends `_` to keywords and predeclared names
pub fn sanitize_go_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result = format!("_{result}");
    }

    if GO_RESERVED_WORDS.contains(result.as_str()) {
        result.push('_');
    }

    result
}

/// Exported Go type name for a schema name.
pub fn type_ident(schema_name: &str) -> String {
    sanitize_go_identifier(&pascal_case(&separate_punctuation(schema_name)))
}

/// Exported Go struct field name for a JSON property.
pub fn field_ident(property: &str) -> String {
    let ident = sanitize_go_identifier(&pascal_case(&separate_punctuation(property)));
    if ident.starts_with('_') {
        format!("Field{ident}")
    } else {
        ident
    }
}

/// Unexported Go parameter name for an HTTP parameter.
pub fn param_ident(param: &str) -> String {
    sanitize_go_identifier(&camel_case(&separate_punctuation(param)))
}

/// Treat `.`, ` ` and `:` like word separators before case conversion.
fn separate_punctuation(name: &str) -> String {
    name.replace(['.', ' ', ':'], "_")
}

/// Return `ident`, or `ident2`, `ident3`... whichever is not yet in `taken`, and record it.
pub fn unique_ident(ident: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(ident.clone()) {
        return ident;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{ident}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Escape a string for use inside a Go interpreted string literal.
pub fn escape_go_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("project_id"), "projectId");
        assert_eq!(camel_case("dataset-name"), "datasetName");
        assert_eq!(camel_case("trace_id_v2"), "traceIdV2");
        assert_eq!(camel_case("itemId"), "itemid");
        assert_eq!(camel_case("HTTP_status"), "httpStatus");
        assert_eq!(camel_case("Limit"), "limit");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("add_to_run_eval_queue"), "AddToRunEvalQueue");
        assert_eq!(pascal_case("projects-resolve"), "ProjectsResolve");
        assert_eq!(pascal_case("E2EFetchTraceRequest"), "E2EFetchTraceRequest");
        assert_eq!(pascal_case("item"), "Item");
        assert_eq!(pascal_case("__double__under"), "DoubleUnder");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("getV1ProjectsByProjectId"), "get_v1_projects_by_project_id");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("fetchPromptScorers"), "fetch_prompt_scorers");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("v1Traces"), "v1_traces");
        assert_eq!(snake_case("ABcDe"), "a_bc_de");
    }

    #[test]
    fn test_sanitize_go_identifier() {
        assert_eq!(sanitize_go_identifier("foo"), "foo");
        assert_eq!(sanitize_go_identifier("foo-bar"), "foobar");
        assert_eq!(sanitize_go_identifier("123foo"), "_123foo");
        assert_eq!(sanitize_go_identifier("type"), "type_");
        assert_eq!(sanitize_go_identifier("range"), "range_");
        assert_eq!(sanitize_go_identifier("$$"), "_empty");
    }

    #[test]
    fn test_type_and_field_idents() {
        assert_eq!(type_ident("Body_upload_file"), "BodyUploadFile");
        assert_eq!(type_ident("scorer.config"), "ScorerConfig");
        assert_eq!(field_ident("is_trace"), "IsTrace");
        assert_eq!(field_ident("123abc"), "Field_123abc");
        assert_eq!(field_ident("prop:with:colons"), "PropWithColons");
    }

    #[test]
    fn test_param_ident() {
        assert_eq!(param_ident("project_id"), "projectId");
        assert_eq!(param_ident("type"), "type_");
        assert_eq!(param_ident("commit_id"), "commitId");
    }

    #[test]
    fn test_unique_ident() {
        let mut taken = HashSet::new();
        assert_eq!(unique_ident("name".into(), &mut taken), "name");
        assert_eq!(unique_ident("name".into(), &mut taken), "name2");
        assert_eq!(unique_ident("name".into(), &mut taken), "name3");
    }

    #[test]
    fn test_escape_go_string() {
        assert_eq!(escape_go_string("hello"), "hello");
        assert_eq!(escape_go_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_go_string("a\\b"), "a\\\\b");
    }
}
