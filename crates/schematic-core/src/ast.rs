//! Abstract syntax tree for schema text
//!
//! A schema is a `/`-separated sequence of parts. The AST mirrors the text
//! one-to-one; [`fmt::Display`] renders it back into canonical schema text.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use std::fmt;

/// A parsed schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaAst {
    /// Parts in source order, never empty for parser output
    pub parts: Vec<Part>,
}

/// One `/`-separated part of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Part {
    /// Fixed segment text
    Literal(String),
    /// Double-quoted pattern that must fully match one segment
    Regex(String),
    /// `$name` with an optional chain of `.modifier("arg", ...)` calls
    Variable {
        name: String,
        modifiers: Vec<ModifierCall>,
    },
    /// `$[name]`
    VariableSet { name: String },
    /// `+`, `+{n}`, `+{min,max}` or `*`
    Wildcard {
        symbol: WildcardSymbol,
        quantifier: Option<Quantifier>,
    },
}

/// A modifier invocation attached to a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierCall {
    pub name: String,
    /// Raw string arguments, quotes removed
    pub args: Vec<String>,
}

/// Wildcard flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardSymbol {
    /// `+`: bounded run of segments
    Single,
    /// `*`: any number of segments, including zero
    Multi,
}

/// `{min,max}` bounds on a `+` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Quantifier {
    pub min: usize,
    pub max: usize,
}

impl Quantifier {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// `{n}` shorthand
    pub fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }
}

impl SchemaAst {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Names of every `$name` variable, in source order
    pub fn variable_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Variable { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names of every `$[name]` variable set, in source order
    pub fn variable_set_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::VariableSet { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for SchemaAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Literal(text) => write!(f, "{}", text),
            Part::Regex(pattern) => write!(f, "\"{}\"", pattern),
            Part::Variable { name, modifiers } => {
                write!(f, "${}", name)?;
                for modifier in modifiers {
                    write!(f, ".{}", modifier)?;
                }
                Ok(())
            }
            Part::VariableSet { name } => write!(f, "$[{}]", name),
            Part::Wildcard { symbol, quantifier } => {
                write!(f, "{}", symbol)?;
                if let Some(q) = quantifier {
                    write!(f, "{}", q)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ModifierCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\"", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for WildcardSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WildcardSymbol::Single => write!(f, "+"),
            WildcardSymbol::Multi => write!(f, "*"),
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.min, self.max)
    }
}
