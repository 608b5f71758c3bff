//! Constraint compiler
//!
//! Lowers a parsed [`SchemaAst`] into the flat constraint list the engine
//! runs. Quantifier bounds and regex patterns are checked here, so a
//! compiled schema never fails for structural reasons at validation time.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::ast::*;
use crate::constraint::{Constraint, RegexConstraint};
use crate::error::{Result, SchemaError};
use tracing::debug;

/// AST to constraint list compiler
#[derive(Debug, Default)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile every part in order. Fails on the first invalid part.
    pub fn compile(&self, ast: &SchemaAst) -> Result<Vec<Constraint>> {
        if ast.parts.is_empty() {
            return Err(SchemaError::syntax(
                "Schema must contain at least one part",
                0,
                "",
                vec!["schema part".to_string()],
                "EOF",
            ));
        }

        let constraints = ast
            .parts
            .iter()
            .map(|part| self.compile_part(part))
            .collect::<Result<Vec<_>>>()?;

        debug!(constraints = constraints.len(), "compiled schema");
        Ok(constraints)
    }

    fn compile_part(&self, part: &Part) -> Result<Constraint> {
        match part {
            Part::Literal(text) => Ok(Constraint::Literal(text.clone())),
            Part::Regex(pattern) => Ok(Constraint::Regex(RegexConstraint::new(pattern.as_str())?)),
            Part::Variable { name, modifiers } => Ok(Constraint::Variable {
                name: name.clone(),
                modifiers: modifiers.clone(),
            }),
            Part::VariableSet { name } => Ok(Constraint::VariableSet { name: name.clone() }),
            Part::Wildcard { symbol: WildcardSymbol::Multi, quantifier: None } => {
                Ok(Constraint::WildcardMulti)
            }
            Part::Wildcard { symbol: WildcardSymbol::Multi, quantifier: Some(q) } => {
                Err(SchemaError::MultiWildcardQuantifier { min: q.min, max: q.max })
            }
            Part::Wildcard { symbol: WildcardSymbol::Single, quantifier } => {
                let Quantifier { min, max } = quantifier.unwrap_or_else(|| Quantifier::exactly(1));
                if min > max {
                    return Err(SchemaError::QuantifierRange { min, max });
                }
                Ok(Constraint::WildcardSingle { min, max })
            }
        }
    }
}
