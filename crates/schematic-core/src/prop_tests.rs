//! Property-based tests for schema compilation and validation
//!
//! These tests verify that parsing never panics, that rendering an AST back
//! to text is lossless, and that validation behaves consistently for the
//! quantified and unbounded wildcards.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

#[cfg(test)]
mod tests {
    use crate::ast::{ModifierCall, Part, Quantifier, SchemaAst, WildcardSymbol};
    use crate::context::{MemoryStore, ValidationContext};
    use crate::{compile, parse};
    use proptest::prelude::*;

    const IDENT: &str = "[a-zA-Z_][a-zA-Z0-9_-]{0,10}";

    /// Strategy for generating one schema part
    fn part_strategy() -> impl Strategy<Value = Part> {
        prop_oneof![
            IDENT.prop_map(Part::Literal),
            "[a-z0-9.]{1,8}".prop_map(Part::Regex),
            (IDENT, proptest::collection::vec((IDENT, proptest::collection::vec("[a-z-]{0,6}", 1..3)), 0..3))
                .prop_map(|(name, calls)| Part::Variable {
                    name,
                    modifiers: calls
                        .into_iter()
                        .map(|(name, args)| ModifierCall { name, args })
                        .collect(),
                }),
            IDENT.prop_map(|name| Part::VariableSet { name }),
            Just(Part::Wildcard { symbol: WildcardSymbol::Multi, quantifier: None }),
            proptest::option::of((0usize..5, 0usize..5)).prop_map(|q| Part::Wildcard {
                symbol: WildcardSymbol::Single,
                quantifier: q.map(|(a, b)| Quantifier::new(a.min(b), a.max(b))),
            }),
        ]
    }

    /// Strategy for generating a whole schema AST
    fn ast_strategy() -> impl Strategy<Value = SchemaAst> {
        proptest::collection::vec(part_strategy(), 1..6).prop_map(SchemaAst::new)
    }

    fn path_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-z0-9-]{1,8}", 0..8)
    }

    proptest! {
        /// Property: parsing arbitrary text should never panic
        #[test]
        fn prop_parse_never_panics(input in "\\PC{0,40}") {
            let _ = compile(&input);
        }

        /// Property: rendering an AST and parsing it again yields the same AST
        #[test]
        fn prop_display_round_trip(ast in ast_strategy()) {
            let text = ast.to_string();
            let reparsed = parse(&text).expect("rendered schema should parse");
            prop_assert_eq!(reparsed, ast);
        }

        /// Property: a literal-only schema accepts exactly its own path
        #[test]
        fn prop_literal_schema_accepts_itself(segments in proptest::collection::vec(IDENT, 1..6)) {
            let text = segments.join("/");
            let schema = compile(&text).unwrap();
            let store = MemoryStore::new();
            let ctx = ValidationContext::new(&store);

            prop_assert!(schema.validate(&text, &ctx).is_ok());
            let longer = format!("{}/extra", text);
            prop_assert!(schema.validate(&longer, &ctx).is_err());
        }

        /// Property: a lone `+{min,max}` accepts exactly the paths with min..=max segments
        #[test]
        fn prop_quantified_wildcard_bounds(
            min in 0usize..4,
            extra in 0usize..4,
            path in path_strategy()
        ) {
            let max = min + extra;
            let schema = compile(&format!("+{{{},{}}}", min, max)).unwrap();
            let store = MemoryStore::new();
            let ctx = ValidationContext::new(&store);

            let accepted = schema.validate(&path.join("/"), &ctx).is_ok();
            prop_assert_eq!(accepted, path.len() >= min && path.len() <= max);
        }

        /// Property: `prefix/*` accepts the prefix followed by anything
        #[test]
        fn prop_multi_wildcard_accepts_any_tail(prefix in IDENT, tail in path_strategy()) {
            let schema = compile(&format!("{}/*", prefix)).unwrap();
            let store = MemoryStore::new();
            let ctx = ValidationContext::new(&store);

            let mut path = vec![prefix];
            path.extend(tail);
            prop_assert!(schema.validate(&path.join("/"), &ctx).is_ok());
        }

        /// Property: validation is deterministic
        #[test]
        fn prop_validation_deterministic(ast in ast_strategy(), path in path_strategy()) {
            if let Ok(schema) = crate::compile_ast(&ast) {
                let store = MemoryStore::new()
                    .with_variable("p", "a/b")
                    .with_set("s", ["a", "b/+"]);
                let input = path.join("/");

                let first = schema.validate(&input, &ValidationContext::new(&store));
                let second = schema.validate(&input, &ValidationContext::new(&store));
                match (first, second) {
                    (Ok(()), Ok(())) => {}
                    (Err(e1), Err(e2)) => prop_assert_eq!(e1.to_string(), e2.to_string()),
                    _ => prop_assert!(false, "Non-deterministic results"),
                }
            }
        }

        /// Property: a bare variable accepts the path it resolves to
        #[test]
        fn prop_variable_matches_its_value(path in proptest::collection::vec("[a-z0-9-]{1,8}", 1..6)) {
            let value = path.join("/");
            let store = MemoryStore::new().with_variable("v", value.clone());
            let schema = compile("$v").unwrap();
            prop_assert!(schema.validate(&value, &ValidationContext::new(&store)).is_ok());
        }
    }
}
