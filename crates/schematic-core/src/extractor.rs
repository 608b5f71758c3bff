//! Reverse matching of paths against schemas
//!
//! Given only a path and a schema, recover what `$name` must have been for the
//! path to validate. Constraints are matched from the right, each fixed-width
//! constraint taking one segment, and the leftmost variable receives whatever
//! is left. This is experimental and only covers schemas of that shape.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::constraint::Constraint;
use crate::error::{Result, SchemaError};
use crate::schema::{split_path, Schema};
use std::collections::HashMap;
use tracing::debug;

/// Recover variable bindings for `input` under `schema`.
///
/// Returns an empty map when the schema has no variables. Fails when a
/// variable is not the leftmost constraint, when a `*` wildcard is present,
/// or when the segments cannot be lined up with the constraints.
pub fn extract_context(schema: &Schema, input: &str) -> Result<HashMap<String, String>> {
    let segments = split_path(input);
    let mut end = segments.len();
    let mut bindings = HashMap::new();

    for (index, constraint) in schema.constraints().iter().enumerate().rev() {
        match constraint {
            Constraint::Literal(text) => {
                let segment = take_last(&segments, &mut end, index, constraint, input)?;
                if segment != text {
                    return Err(SchemaError::extraction(
                        format!("constraint #{} expected '{}', found '{}'", index, text, segment),
                        input,
                    ));
                }
            }
            Constraint::Regex(regex) => {
                let segment = take_last(&segments, &mut end, index, constraint, input)?;
                if !regex.is_match(segment) {
                    return Err(SchemaError::extraction(
                        format!(
                            "constraint #{} pattern \"{}\" does not match '{}'",
                            index,
                            regex.pattern(),
                            segment
                        ),
                        input,
                    ));
                }
            }
            Constraint::WildcardSingle { .. } | Constraint::VariableSet { .. } => {
                take_last(&segments, &mut end, index, constraint, input)?;
            }
            Constraint::WildcardMulti => {
                return Err(SchemaError::extraction(
                    format!("constraint #{} '*' has no fixed width to match from the right", index),
                    input,
                ));
            }
            Constraint::Variable { name, .. } => {
                if index != 0 {
                    return Err(SchemaError::extraction(
                        format!("variable ${} must be the first part of the schema", name),
                        input,
                    ));
                }
                if end == 0 {
                    return Err(SchemaError::extraction(
                        format!("no segments left for variable ${}", name),
                        input,
                    ));
                }
                bindings.insert(name.clone(), segments[..end].join("/"));
                end = 0;
            }
        }
    }

    if end != 0 {
        return Err(SchemaError::extraction(
            format!("{} leading segment(s) not covered by the schema", end),
            input,
        ));
    }

    debug!(bindings = bindings.len(), "extracted context");
    Ok(bindings)
}

fn take_last<'s>(
    segments: &'s [String],
    end: &mut usize,
    index: usize,
    constraint: &Constraint,
    input: &str,
) -> Result<&'s String> {
    if *end == 0 {
        return Err(SchemaError::extraction(
            format!("ran out of segments at constraint #{} {}", index, constraint),
            input,
        ));
    }
    *end -= 1;
    Ok(&segments[*end])
}
