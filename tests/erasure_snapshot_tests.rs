//! Snapshot of the intrinsic recognition table's erasure classification.
//!
//! A change here means an intrinsic moved between "transformed in place" and "erased"; review it together with the
//! lowering arm for that intrinsic.

use sable_core::lang::intrinsics::{self, ErasureClass};

#[test]
fn erasure_classification() {
    let classes: Vec<(&str, ErasureClass)> = intrinsics::INTRINSICS
        .iter()
        .map(|info| (info.canonical, intrinsics::erasure_class(info.id)))
        .collect();

    insta::assert_debug_snapshot!(classes, @r#"
    [
        (
            "stackalloc",
            Transformed,
        ),
        (
            "sizeof",
            Transformed,
        ),
        (
            "defaultof",
            Transformed,
        ),
        (
            "nameof",
            Transformed,
        ),
        (
            "trycast",
            Transformed,
        ),
        (
            "asinterface",
            Erased,
        ),
        (
            "istype",
            Transformed,
        ),
        (
            "thisarg",
            Erased,
        ),
    ]
    "#);
}
