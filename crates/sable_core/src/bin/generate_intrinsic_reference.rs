//! Generate Markdown reference docs from `sable_core::lang` registries.
//!
//! This binary renders the intrinsic table, the annotation-chain steps and the builtin target types into
//! `docs/reference/surface.md`.
//!
//! ## Notes
//! - The generated file is a derived artifact; update the registries instead of editing it by hand.
//!
//! ## Examples
//! Run from the workspace root:
//! ```bash
//! cargo run -p sable_core --bin generate_intrinsic_reference
//! ```
//!
//! ## Panics
//! - If the workspace root cannot be resolved.
//! - If the output file cannot be written.

use std::fs;
use std::path::{Path, PathBuf};

use sable_core::lang::types::{numerics, primitives};
use sable_core::lang::{annotations, intrinsics};

fn trim_trailing_newlines_to_at_most_two(out: &mut String) {
    let mut count = 0usize;
    for ch in out.chars().rev() {
        if ch == '\n' {
            count += 1;
        } else {
            break;
        }
    }
    while count > 2 {
        out.pop();
        count -= 1;
    }
}

fn start_section(out: &mut String, heading: &str) {
    trim_trailing_newlines_to_at_most_two(out);
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
    }
    out.push_str(heading);
    out.push_str("\n\n");
}

fn code_list(items: &[&str]) -> String {
    items.iter().map(|a| format!("`{a}`")).collect::<Vec<_>>().join(", ")
}

fn workspace_root() -> PathBuf {
    // crates/sable_core -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .expect("resolve workspace root")
}

fn main() {
    let out_dir = workspace_root().join("docs/reference");
    fs::create_dir_all(&out_dir).expect("create docs/reference/");
    write_surface_reference(&out_dir.join("surface.md"));
}

fn write_surface_reference(path: &Path) {
    let mut out = String::new();
    out.push_str("# Sable compile-time surface reference\n\n");
    out.push_str("Generated file. Regenerate with `cargo run -p sable_core --bin generate_intrinsic_reference`.\n");

    render_intrinsics_section(&mut out);
    render_annotation_steps_section(&mut out);
    render_numeric_types_section(&mut out);
    render_primitive_types_section(&mut out);

    trim_trailing_newlines_to_at_most_two(&mut out);
    out.push('\n');
    fs::write(path, out).expect("write surface.md");
}

fn render_intrinsics_section(out: &mut String) {
    start_section(out, "## Intrinsics");

    out.push_str("| Id | Spelling | Aliases | Inputs | Result | Lowering | Erasure | Since |\n");
    out.push_str("|---|---|---|---|---|---|---|---|\n");
    for i in intrinsics::INTRINSICS {
        out.push_str(&format!(
            "| {:?} | `{}` | {} | {} | `{}` | `{}` | {:?} | {} |\n",
            i.id,
            i.canonical,
            code_list(i.aliases),
            i.shape,
            i.result,
            i.lowering,
            i.erasure,
            i.since
        ));
    }

    for i in intrinsics::INTRINSICS {
        if i.examples.is_empty() {
            continue;
        }
        start_section(out, &format!("### `{}`", i.canonical));
        out.push_str(i.description);
        out.push_str("\n\n");
        for ex in i.examples {
            out.push_str("```text\n");
            out.push_str(ex.code);
            out.push_str("\n```\n\n");
            if let Some(note) = ex.note {
                out.push_str(note);
                out.push_str("\n\n");
            }
        }
    }
}

fn render_annotation_steps_section(out: &mut String) {
    start_section(out, "## Annotation chain steps");

    out.push_str("| Id | Spelling | Form | Role | Description |\n");
    out.push_str("|---|---|---|---|---|\n");
    for s in annotations::ANNOTATION_STEPS {
        out.push_str(&format!(
            "| {:?} | `{}` | {:?} | {:?} | {} |\n",
            s.item.id, s.item.canonical, s.form, s.role, s.item.description
        ));
    }
}

fn render_numeric_types_section(out: &mut String) {
    start_section(out, "## Numeric types");

    out.push_str("| Id | Spelling | Aliases | Integral | Size | Widens to |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for t in numerics::NUMERIC_TYPES {
        let widens: Vec<&str> = t.widens_to.iter().map(|w| numerics::as_str(*w)).collect();
        out.push_str(&format!(
            "| {:?} | `{}` | {} | {} | {} | {} |\n",
            t.id,
            t.canonical,
            code_list(t.aliases),
            t.integral,
            t.size,
            code_list(&widens)
        ));
    }
}

fn render_primitive_types_section(out: &mut String) {
    start_section(out, "## Other builtin types");

    out.push_str("| Id | Spelling | Aliases | Description |\n");
    out.push_str("|---|---|---|---|\n");
    for t in primitives::PRIMITIVE_TYPES {
        out.push_str(&format!(
            "| {:?} | `{}` | {} | {} |\n",
            t.id,
            t.canonical,
            code_list(t.aliases),
            t.description
        ));
    }
}
