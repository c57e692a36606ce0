#![allow(dead_code)]

use caddyconf::{Caddyfile, parse_all, write_caddyfile};

/// Parse then write should reproduce `input` exactly (for inputs that
/// are already in canonical form).
pub fn roundtrip(input: &str) {
    let cf = parse_all(input).expect("parse failed");
    let output = write_caddyfile(&cf);
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

/// Copy of `caddyfile` with every `raw_block` cleared, so two models can
/// be compared by structure alone.
pub fn structure(caddyfile: &Caddyfile) -> Caddyfile {
    let mut cf = caddyfile.clone();
    if let Some(global) = cf.global_options.as_mut() {
        global.raw_block.clear();
    }
    for site in &mut cf.sites {
        site.raw_block.clear();
    }
    cf
}

/// Helper: write a model, parse it back, assert structural equality.
pub fn assert_ast_roundtrip(original: &Caddyfile) {
    let written = write_caddyfile(original);
    let parsed = parse_all(&written).unwrap_or_else(|e| {
        panic!(
            "failed to re-parse written output: {e}\n\
             --- written ---\n{written}"
        )
    });

    let original = structure(original);
    let parsed = structure(&parsed);
    assert_eq!(
        original.global_options, parsed.global_options,
        "global_options mismatch\n--- written ---\n{written}"
    );
    assert_eq!(
        original.snippets, parsed.snippets,
        "snippets mismatch\n--- written ---\n{written}"
    );
    assert_eq!(
        original.sites, parsed.sites,
        "sites mismatch\n--- written ---\n{written}"
    );
}

/// Assert `parse(write(parse(input)))` equals `parse(input)` structurally.
pub fn assert_text_roundtrip(input: &str) {
    let first = parse_all(input).expect("parse failed");
    assert_ast_roundtrip(&first);
}
