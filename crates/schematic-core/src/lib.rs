//! Schematic Core - path schema DSL and validation engine
//!
//! A schema describes the shape of a `/`-separated hierarchical path, such as
//! a secret path in a key/value store. Schemas are compiled once and then
//! validate any number of paths against values supplied by a
//! [`VariableStore`].
//!
//! # Main Components
//!
//! - **Lexer / Parser**: schema text to [`SchemaAst`]
//! - **Compiler**: AST to an ordered list of [`Constraint`]s
//! - **Engine**: [`Schema::validate`], greedy left-to-right consumption with
//!   backtracking across variable set members
//! - **Modifiers**: named segment transformations applied to variables
//! - **Extractor**: experimental reverse matching, [`Schema::extract_context`]
//!
//! # Example
//!
//! ```
//! use schematic_core::{compile, MemoryStore, ValidationContext};
//!
//! # fn main() -> schematic_core::Result<()> {
//! let schema = compile(r#"$gitlab_path.strip_last_prefix("helm-", "ansible-")/$[dbs]/+"#)?;
//! let store = MemoryStore::new()
//!     .with_variable("gitlab_path", "gitlab/group/helm-app")
//!     .with_set("dbs", ["postgres", "mysql"]);
//!
//! schema.validate("gitlab/group/app/postgres/password", &ValidationContext::new(&store))?;
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod compiler;
pub mod constraint;
pub mod context;
pub mod error;
pub mod extractor;
pub mod lexer;
pub mod modifiers;
pub mod parser;
pub mod schema;

mod prop_tests;

// Re-export main types for convenience
pub use ast::{ModifierCall, Part, Quantifier, SchemaAst, WildcardSymbol};
pub use compiler::Compiler;
pub use constraint::{Constraint, RegexConstraint};
pub use context::{MemoryStore, ValidationContext, VariableStore};
pub use error::{ErrorKind, Position, Result, SchemaError};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use modifiers::{
    strip_last_prefix, ModifierError, ModifierFunction, ModifierRegistry, ModifierResult,
    STRIP_LAST_PREFIX,
};
pub use parser::{parse, Parser};
pub use schema::{split_path, Schema};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lex, parse and compile schema text
pub fn compile(source: &str) -> Result<Schema> {
    Schema::compile(source)
}

/// Compile an already parsed schema
pub fn compile_ast(ast: &SchemaAst) -> Result<Schema> {
    Schema::from_ast(ast)
}

/// Compile `source` and validate a single `input` against `store`
pub fn validate(source: &str, input: &str, store: &dyn VariableStore) -> Result<()> {
    compile(source)?.validate(input, &ValidationContext::new(store))
}
