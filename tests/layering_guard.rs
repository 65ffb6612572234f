//! Layering guardrails for the vocabulary crate.
//!
//! `sable_core` holds const registries only and must stay dependency-free so hosts can embed the recognition table
//! without pulling in the lowering stack. This test scans its `Cargo.toml` and fails if `[dependencies]` gains an
//! entry.

#[test]
fn vocabulary_crate_has_no_dependencies() {
    let manifest = include_str!("../crates/sable_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if !line_no_comment.is_empty() {
            panic!("`sable_core` must not depend on other crates, found `{line_no_comment}`");
        }
    }
}
