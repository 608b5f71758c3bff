//! Compiled constraints and their matching rules
//!
//! Each constraint consumes a prefix of the remaining path segments and hands
//! the rest to the next one. Consumption is greedy and never backtracks,
//! except between the members of a variable set.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::ast::ModifierCall;
use crate::context::ValidationContext;
use crate::error::{Result, SchemaError};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::trace;

/// A single compiled matching rule
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Exactly one segment equal to the text
    Literal(String),
    /// Exactly one segment fully matching the pattern
    Regex(RegexConstraint),
    /// Between `min` and `max` segments
    WildcardSingle { min: usize, max: usize },
    /// Every remaining segment
    WildcardMulti,
    /// The resolved and modified value of `$name`, segment by segment
    Variable {
        name: String,
        modifiers: Vec<ModifierCall>,
    },
    /// Whichever member of `$[name]` matches first
    VariableSet { name: String },
}

/// Regex part together with its compiled, anchored matcher
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    pattern: String,
    regex: Regex,
}

impl RegexConstraint {
    /// Compile a pattern so that it must match a whole segment
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            SchemaError::InvalidRegex {
                pattern: pattern.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { pattern, regex })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl Constraint {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Constraint::Literal(text) => format!("Literal({})", text),
            Constraint::Regex(regex) => format!("Regex(\"{}\")", regex.pattern()),
            Constraint::WildcardSingle { min, max } => format!("WildcardSingle{{{},{}}}", min, max),
            Constraint::WildcardMulti => "WildcardMulti".to_string(),
            Constraint::Variable { name, modifiers } => {
                let mut out = format!("Variable(${}", name);
                for modifier in modifiers {
                    out.push('.');
                    out.push_str(&modifier.to_string());
                }
                out.push(')');
                out
            }
            Constraint::VariableSet { name } => format!("VariableSet($[{}])", name),
        }
    }

    /// Match against the front of `segments` and return what is left
    pub fn consume<'s>(
        &self,
        segments: &'s [String],
        ctx: &ValidationContext<'_>,
    ) -> Result<&'s [String]> {
        match self {
            Constraint::Literal(text) => {
                let (first, rest) = split_first(segments)?;
                if first != text {
                    return Err(SchemaError::SegmentMismatch {
                        expected: text.clone(),
                        found: first.clone(),
                    });
                }
                Ok(rest)
            }
            Constraint::Regex(regex) => {
                let (first, rest) = split_first(segments)?;
                if !regex.is_match(first) {
                    return Err(SchemaError::SegmentMismatch {
                        expected: format!("match for \"{}\"", regex.pattern()),
                        found: first.clone(),
                    });
                }
                Ok(rest)
            }
            Constraint::WildcardSingle { min, max } => {
                if segments.len() < *min {
                    return Err(SchemaError::InsufficientSegments {
                        needed: *min,
                        available: segments.len(),
                    });
                }
                Ok(&segments[segments.len().min(*max)..])
            }
            Constraint::WildcardMulti => Ok(&segments[segments.len()..]),
            Constraint::Variable { name, modifiers } => {
                consume_variable(name, modifiers, segments, ctx)
            }
            Constraint::VariableSet { name } => consume_variable_set(name, segments, ctx),
        }
    }
}

fn split_first(segments: &[String]) -> Result<(&String, &[String])> {
    segments.split_first().ok_or(SchemaError::InsufficientSegments {
        needed: 1,
        available: 0,
    })
}

fn consume_variable<'s>(
    name: &str,
    modifiers: &[ModifierCall],
    segments: &'s [String],
    ctx: &ValidationContext<'_>,
) -> Result<&'s [String]> {
    let value = ctx
        .store()
        .get_variable(name)
        .ok_or_else(|| SchemaError::VariableNotFound { name: name.to_string() })?;

    let mut expected: Vec<String> = value.split('/').map(str::to_string).collect();
    for call in modifiers {
        let function = ctx
            .modifiers()
            .get(&call.name)
            .ok_or_else(|| SchemaError::ModifierNotFound { name: call.name.clone() })?;
        expected = (*function)(expected, &call.args).map_err(|source| SchemaError::Modifier {
            name: call.name.clone(),
            source,
        })?;
    }
    trace!(variable = name, expected = %expected.join("/"), "resolved variable");

    if segments.len() < expected.len() {
        return Err(SchemaError::InsufficientSegments {
            needed: expected.len(),
            available: segments.len(),
        });
    }

    for (want, got) in expected.iter().zip(segments) {
        if want != got {
            return Err(SchemaError::SegmentMismatch {
                expected: want.clone(),
                found: got.clone(),
            });
        }
    }

    Ok(&segments[expected.len()..])
}

/// Try each member in order against the same remaining segments. The first
/// member that matches wins; a member that fails to compile aborts the search.
fn consume_variable_set<'s>(
    name: &str,
    segments: &'s [String],
    ctx: &ValidationContext<'_>,
) -> Result<&'s [String]> {
    let members = ctx
        .store()
        .get_variable_set(name)
        .ok_or_else(|| SchemaError::VariableSetNotFound { name: name.to_string() })?;

    if members.is_empty() {
        return Err(SchemaError::EmptySet { name: name.to_string() });
    }

    for member in &members {
        let schema = ctx.member_schema(member)?;
        match schema.consume(segments, ctx) {
            Ok(rest) => {
                trace!(set = name, member = member.as_str(), "set member matched");
                return Ok(rest);
            }
            Err(err) => {
                trace!(set = name, member = member.as_str(), error = %err, "set member rejected");
            }
        }
    }

    Err(SchemaError::NoSetMemberMatched {
        name: name.to_string(),
        tried: members.len(),
    })
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Constraints serialize as their description
impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.describe())
    }
}
