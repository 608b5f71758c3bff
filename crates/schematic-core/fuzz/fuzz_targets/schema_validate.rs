//! Fuzzing target for path validation
//!
//! The first line of input is the schema, the rest is the path. Variable set
//! members come from the same fuzzed text so recursive validation is covered.
//! Members that reference other variables are skipped: the engine does not
//! bound set nesting, so a self-referencing set would recurse forever.

#![no_main]

use libfuzzer_sys::fuzz_target;
use schematic_core::{compile, MemoryStore, ValidationContext};

fuzz_target!(|data: &[u8]| {
    let lossy = String::from_utf8_lossy(data);
    let text: &str = &lossy;
    let (schema_text, path) = text.split_once('\n').unwrap_or((text, ""));

    let Ok(schema) = compile(schema_text) else {
        return;
    };

    let store = MemoryStore::new()
        .with_variable("v", path)
        .with_set(
            "s",
            path.lines()
                .filter(|line| !line.contains('$'))
                .take(4)
                .map(str::to_string)
                .collect::<Vec<_>>(),
        );
    let ctx = ValidationContext::new(&store);

    let _ = schema.validate(path, &ctx);
    let _ = schema.extract_context(path);
});
