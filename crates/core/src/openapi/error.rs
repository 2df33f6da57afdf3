//! Errors that abort a generation run.

use thiserror::Error;

/// Failure of a whole generation run. No partial output is produced.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The input is not a JSON document of the expected shape.
    #[error("Failed to parse OpenAPI spec: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured operation-name rewrite does not compile.
    #[error("Invalid operation name rewrite pattern '{pattern}': {source}")]
    InvalidRewrite {
        /// The offending pattern.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// An output location escapes the output root.
    #[error("Invalid output path {field} = '{path}': {reason}")]
    InvalidOutputPath {
        /// Configuration key holding the path.
        field: &'static str,
        /// The offending value.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Two emitted operations normalize to the same client method name.
    #[error("Duplicate method name '{name}' derived for '{first}' and '{second}'")]
    DuplicateMethod {
        /// The colliding method name.
        name: String,
        /// First operation, as `VERB path`.
        first: String,
        /// Second operation, as `VERB path`.
        second: String,
    },

    /// Two used schemas normalize to the same type name or file name.
    #[error("Duplicate type name '{name}' derived for schemas '{first}' and '{second}'")]
    DuplicateType {
        /// The colliding type (or file) name.
        name: String,
        /// First schema name.
        first: String,
        /// Second schema name.
        second: String,
    },
}
