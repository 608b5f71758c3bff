//! Fuzzing target for schema compilation
//!
//! Lexing, parsing and compiling arbitrary text must return an error rather
//! than panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use schematic_core::compile;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(schema) = compile(text) {
            // a compiled schema always has at least one constraint
            assert!(!schema.is_empty());
        }
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = compile(&lossy);
});
