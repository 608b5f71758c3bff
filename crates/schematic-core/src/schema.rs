//! Compiled schemas and path validation
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::ast::SchemaAst;
use crate::compiler::Compiler;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::error::{Result, SchemaError};
use crate::extractor;
use crate::parser::Parser;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, trace};

/// A compiled schema: its source text plus an ordered constraint list.
///
/// Immutable after compilation, so one instance can validate many paths,
/// including concurrently from several threads.
#[derive(Debug, Clone)]
pub struct Schema {
    source: String,
    constraints: Vec<Constraint>,
}

impl Schema {
    /// Lex, parse and compile schema text
    pub fn compile(source: &str) -> Result<Self> {
        let ast = Parser::new(source)?.parse()?;
        let constraints = Compiler::new().compile(&ast)?;
        debug!(schema = source, "schema compiled");
        Ok(Self {
            source: source.to_string(),
            constraints,
        })
    }

    /// Compile an already parsed AST; the source text is its canonical rendering
    pub fn from_ast(ast: &SchemaAst) -> Result<Self> {
        Ok(Self {
            source: ast.to_string(),
            constraints: Compiler::new().compile(ast)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Check that the whole input path satisfies the schema.
    ///
    /// Constraint failures come back wrapped in [`SchemaError::Constraint`];
    /// segments left over after the last constraint produce
    /// [`SchemaError::TrailingSegments`].
    #[instrument(level = "debug", skip(self, ctx), fields(schema = %self.source))]
    pub fn validate(&self, input: &str, ctx: &ValidationContext<'_>) -> Result<()> {
        self.validate_segments(&split_path(input), ctx)
    }

    /// Same as [`Schema::validate`] for a path that is already split
    pub fn validate_segments(&self, segments: &[String], ctx: &ValidationContext<'_>) -> Result<()> {
        let leftover = self.consume(segments, ctx)?;
        if !leftover.is_empty() {
            return Err(SchemaError::TrailingSegments {
                leftover: leftover.to_vec(),
            });
        }
        Ok(())
    }

    /// Run every constraint in order and return the unconsumed tail
    pub(crate) fn consume<'s>(
        &self,
        segments: &'s [String],
        ctx: &ValidationContext<'_>,
    ) -> Result<&'s [String]> {
        let mut remaining = segments;
        for (index, constraint) in self.constraints.iter().enumerate() {
            remaining = constraint.consume(remaining, ctx).map_err(|err| {
                err.at_constraint(index, constraint.describe(), segments.join("/"))
            })?;
            trace!(index, constraint = %constraint, remaining = remaining.len(), "constraint satisfied");
        }
        Ok(remaining)
    }

    /// Recover variable bindings from a path by matching constraints right to left
    pub fn extract_context(&self, input: &str) -> Result<HashMap<String, String>> {
        extractor::extract_context(self, input)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a path on `/`, dropping empty segments
pub fn split_path(input: &str) -> Vec<String> {
    input
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
