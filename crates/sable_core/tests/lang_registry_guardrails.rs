use std::collections::HashMap;

use sable_core::lang::annotations::{self, AnnotationStepId, StepForm, StepRole};
use sable_core::lang::intrinsics::{self, ErasureClass, IntrinsicId, IntrinsicPosition};
use sable_core::lang::types::{numerics, primitives};

#[test]
fn intrinsic_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, IntrinsicId> = HashMap::new();

    for info in intrinsics::INTRINSICS {
        assert_eq!(
            intrinsics::from_str(info.canonical),
            Some(info.id),
            "intrinsic canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            intrinsics::as_str(info.id),
            info.canonical,
            "intrinsic as_str mismatch for {:?}",
            info.id
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate intrinsic spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
        for &alias in info.aliases {
            assert_eq!(intrinsics::from_str(alias), Some(info.id));
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!("duplicate intrinsic alias {:?}: {:?} and {:?}", alias, prev, info.id);
            }
        }
    }
}

#[test]
fn every_intrinsic_id_has_exactly_one_row() {
    let all = [
        IntrinsicId::StackAlloc,
        IntrinsicId::SizeOf,
        IntrinsicId::DefaultOf,
        IntrinsicId::NameOf,
        IntrinsicId::TryCast,
        IntrinsicId::InterfaceView,
        IntrinsicId::TypeTest,
        IntrinsicId::ThisArg,
    ];
    assert_eq!(intrinsics::INTRINSICS.len(), all.len());
    for id in all {
        let rows = intrinsics::INTRINSICS.iter().filter(|i| i.id == id).count();
        assert_eq!(rows, 1, "expected one registry row for {id:?}");
    }
}

#[test]
fn erasure_classes_match_the_two_erasure_families() {
    let erased: Vec<IntrinsicId> = intrinsics::INTRINSICS
        .iter()
        .filter(|i| i.erasure == ErasureClass::Erased)
        .map(|i| i.id)
        .collect();
    assert_eq!(erased, vec![IntrinsicId::InterfaceView, IntrinsicId::ThisArg]);
    assert!(intrinsics::is_erased(IntrinsicId::InterfaceView));
    assert!(!intrinsics::is_erased(IntrinsicId::TryCast));
}

#[test]
fn parameter_type_intrinsics_take_no_value_arguments() {
    for info in intrinsics::INTRINSICS {
        if info.shape.position == IntrinsicPosition::ParameterType {
            assert_eq!(info.shape.value_args, 0, "{:?}", info.id);
            assert_eq!(info.shape.type_args, 1, "{:?}", info.id);
        }
    }
    assert_eq!(
        intrinsics::from_str_in("thisarg", IntrinsicPosition::Expression),
        None
    );
    assert_eq!(
        intrinsics::from_str_in("thisarg", IntrinsicPosition::ParameterType),
        Some(IntrinsicId::ThisArg)
    );
}

#[test]
fn annotation_steps_resolvable_and_shaped() {
    for step in annotations::ANNOTATION_STEPS {
        assert_eq!(annotations::from_str(step.item.canonical), Some(step.item.id));
    }
    assert_eq!(annotations::role(AnnotationStepId::Select), StepRole::Root);
    assert_eq!(annotations::form(AnnotationStepId::TypeTarget), StepForm::Member);
    assert_eq!(annotations::form(AnnotationStepId::Method), StepForm::MemberCall);
    assert_eq!(annotations::from_str("Select"), None);
}

#[test]
fn numeric_widening_is_acyclic_and_never_narrows() {
    for t in numerics::NUMERIC_TYPES {
        assert!(numerics::widens_to(t.id, t.id));
        for &target in t.widens_to {
            assert_ne!(target, t.id, "{:?} lists itself", t.id);
            assert!(
                !numerics::info_for(target).widens_to.contains(&t.id),
                "widening cycle between {:?} and {:?}",
                t.id,
                target
            );
            if numerics::is_integral(target) {
                assert!(
                    numerics::info_for(target).size >= t.size,
                    "{:?} -> {:?} narrows",
                    t.id,
                    target
                );
            }
        }
    }
}

#[test]
fn type_spellings_do_not_collide_across_registries() {
    for t in numerics::NUMERIC_TYPES {
        assert_eq!(primitives::from_str(t.canonical), None, "{}", t.canonical);
        for alias in t.aliases {
            assert_eq!(primitives::from_str(alias), None, "{alias}");
        }
    }
    for t in primitives::PRIMITIVE_TYPES {
        assert_eq!(numerics::from_str(t.canonical), None, "{}", t.canonical);
    }
}
