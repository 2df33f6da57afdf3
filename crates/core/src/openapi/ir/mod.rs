//! Intermediate Representation for OpenAPI to Go code generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: type definitions and operations with every OpenAPI
//!    corner case resolved (naming, reachability, type mapping)
//! 2. Go AST IR: types, expressions, statements, functions, files
//! 3. Emission: AST to Go source strings via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `utils`: name normalization (case conversion, Go identifier sanitization)
//! - `mapper`: schema node -> `TypeExpr`
//! - `resolve`: schema table and Used-Schema Set closure
//! - `normalize`: OpenAPI spec -> API IR (operation extraction, type definitions)
//! - `api`: API-level IR (ApiIR, TypeDefIR, OperationIR)
//! - `types`: `TypeExpr` plus the Go AST
//! - `codegen`: API IR -> Go AST
//! - `emit`: Go AST -> code strings (via Emit trait)

pub mod api;
mod codegen;
mod emit;
pub mod mapper;
mod normalize;
pub mod resolve;
pub mod types;
pub mod utils;

// Re-export the main entry points
pub use codegen::{GENERATED_HEADER, codegen_client, codegen_models, codegen_operation};
pub use emit::Emit;
pub use normalize::{ADDITIONAL_PROPERTIES_FIELD, NameRules, extract_operations, normalize_spec};
