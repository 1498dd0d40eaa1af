use super::*;
use crate::builtins::BuiltinGeneric;
use crate::db::TypeEnvironment;
use crate::diagnostics::{LookupFailure, ResolveError};
use crate::fixtures::Fixture;
use crate::options::ResolverOptions;
use crate::types::Variance;

// =============================================================================
// Direct parameterization
// =============================================================================

#[test]
fn test_resolve_direct_parameterization() {
    let f = Fixture::new();
    let walker = f.env.walker();

    let one = f.applied(f.super1, &[f.value1]);
    assert_eq!(walker.resolve_one(&one, &f.t1), Ok(f.value1));

    let two = f.applied(f.super2, &[f.value1, f.value2]);
    assert_eq!(walker.resolve_one(&two, &f.t1), Ok(f.value1));
    assert_eq!(walker.resolve_one(&two, &f.t2), Ok(f.value2));
}

#[test]
fn test_direct_parameterization_does_not_walk_bases() {
    let f = Fixture::new();
    // MiddleClass2TypeVarInstantiatedFirst[Value2] binds only its own `_T2`.
    let subject = f.applied(f.middle2_first, &[f.value2]);
    let bindings = resolve_all(&f.env, &subject).expect("resolves");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.get_param(&f.t2), Some(f.value2));
    assert_eq!(bindings.get_param(&f.t1), None);
}

#[test]
fn test_generic_marker_application_has_no_bindings() {
    let f = Fixture::new();
    let marker = Subject::Type(f.env.generic(&[f.t1.clone()]));
    let bindings = resolve_all(&f.env, &marker).expect("resolves");
    assert!(bindings.is_empty());
    assert!(matches!(
        resolve_one(&f.env, &marker, &f.t1),
        Err(ResolveError::NotGeneric { .. })
    ));
}

// =============================================================================
// Subclassing
// =============================================================================

#[test]
fn test_resolve_through_single_inheritance() {
    let f = Fixture::new();
    let walker = f.env.walker();

    for def in [f.type_var1, f.type_var1_level2] {
        assert_eq!(walker.resolve_one(&f.class(def), &f.t1), Ok(f.value1));
    }
    for def in [f.type_var2, f.type_var2_level2] {
        assert_eq!(walker.resolve_one(&f.class(def), &f.t1), Ok(f.value1));
        assert_eq!(walker.resolve_one(&f.class(def), &f.t2), Ok(f.value2));
    }
}

#[test]
fn test_resolve_partial_instantiation() {
    let f = Fixture::new();
    let walker = f.env.walker();

    for def in [f.type_var2_level2_first, f.type_var2_level2_second] {
        let subject = f.class(def);
        assert_eq!(walker.resolve_one(&subject, &f.t1), Ok(f.value1));
        assert_eq!(walker.resolve_one(&subject, &f.t2), Ok(f.value2));
    }
}

#[test]
fn test_partially_instantiated_middle_binds_only_fixed_parameter() {
    let f = Fixture::new();
    let bindings = resolve_all(&f.env, &f.class(f.middle2_first)).expect("resolves");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.get_param(&f.t1), Some(f.value1));
    assert!(!bindings.contains_key(&BindingKey::Param(f.t2.clone())));
}

#[test]
fn test_resolve_multiple_inheritance() {
    let f = Fixture::new();
    let walker = f.env.walker();

    assert_eq!(walker.resolve_one(&f.class(f.super11), &f.t1), Ok(f.value1));
    for def in [
        f.super12,
        f.super21,
        f.super11_level2,
        f.super12_level2,
        f.super21_level2,
        f.first_then_a,
        f.second_then_a,
        f.second_then_first,
    ] {
        let subject = f.class(def);
        assert_eq!(walker.resolve_one(&subject, &f.t1), Ok(f.value1), "{def:?}");
        assert_eq!(walker.resolve_one(&subject, &f.t2), Ok(f.value2), "{def:?}");
    }
}

#[test]
fn test_unparameterized_generic_has_no_bindings() {
    let f = Fixture::new();
    for def in [f.super1, f.super2, f.middle1] {
        let bindings = resolve_all(&f.env, &f.class(def)).expect("resolves");
        assert!(bindings.is_empty(), "{def:?}");
    }
}

#[test]
fn test_marker_declared_parameter_next_to_instantiated_base() {
    let f = Fixture::new();
    let subject = f.applied(f.middle2_add_generic, &[f.value3]);
    assert_eq!(resolve_one(&f.env, &subject, &f.t2), Ok(f.value3));

    // The bare class still sees the base instantiation.
    let bare = f.class(f.middle2_add_generic);
    assert_eq!(resolve_one(&f.env, &bare, &f.t1), Ok(f.value1));
}

// =============================================================================
// Built-in forms
// =============================================================================

#[test]
fn test_builtin_forms_bind_by_position() {
    let f = Fixture::new();
    let walker = f.env.walker();

    for kind in [
        BuiltinGeneric::Iterable,
        BuiltinGeneric::Iterator,
        BuiltinGeneric::Container,
        BuiltinGeneric::Collection,
        BuiltinGeneric::List,
        BuiltinGeneric::Deque,
        BuiltinGeneric::Set,
    ] {
        let subject = f.builtin(kind, &[f.value1]);
        assert_eq!(walker.resolve_one(&subject, 0u32), Ok(f.value1), "{kind:?}");
    }

    let dict = f.builtin(BuiltinGeneric::Dict, &[f.value1, f.value2]);
    assert_eq!(walker.resolve_one(&dict, 0u32), Ok(f.value1));
    assert_eq!(walker.resolve_one(&dict, 1u32), Ok(f.value2));

    let generator = f.builtin(BuiltinGeneric::Generator, &[f.value1, f.value2, f.value3]);
    assert_eq!(walker.resolve_one(&generator, 0u32), Ok(f.value1));
    assert_eq!(walker.resolve_one(&generator, 1u32), Ok(f.value2));
    assert_eq!(walker.resolve_one(&generator, 2u32), Ok(f.value3));
}

#[test]
fn test_runtime_builtin_binds_like_canonical_form() {
    let f = Fixture::new();
    let dict = f.env.runtime_builtin(BuiltinGeneric::Dict);
    let subject = f.applied(dict, &[f.value1, f.value2]);
    let bindings = resolve_all(&f.env, &subject).expect("resolves");
    assert_eq!(bindings.get_index(0), Some(f.value1));
    assert_eq!(bindings.get_index(1), Some(f.value2));
}

#[test]
fn test_user_classes_over_builtin_forms_bind_by_identity() {
    let f = Fixture::new();
    let walker = f.env.walker();

    let list = f.applied(f.super_list, &[f.value1]);
    assert_eq!(walker.resolve_one(&list, &f.t1), Ok(f.value1));

    let dict = f.applied(f.super_dict, &[f.value1, f.value2]);
    assert_eq!(walker.resolve_one(&dict, &f.t1), Ok(f.value1));
    assert_eq!(walker.resolve_one(&dict, &f.t2), Ok(f.value2));

    let generator = f.applied(f.super_generator, &[f.value1, f.value2, f.value3]);
    assert_eq!(walker.resolve_one(&generator, &f.t3), Ok(f.value3));
}

#[test]
fn test_iterable_ancestry() {
    let f = Fixture::new();
    let walker = f.env.walker();

    assert_eq!(walker.resolve_one(&f.class(f.iterable_direct), 0u32), Ok(f.value1));
    assert_eq!(walker.resolve_one(&f.class(f.type_var1_iterable), &f.t1), Ok(f.value1));
    assert_eq!(
        walker.resolve_one(&f.class(f.type_var1_iterable_level2), &f.t1),
        Ok(f.value1)
    );
}

#[test]
fn test_positions_continue_after_earlier_bindings() {
    let f = Fixture::new();
    let bindings = resolve_all(&f.env, &f.class(f.multiple_containers)).expect("resolves");

    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings.get_param(&f.t1), Some(f.value1));
    assert_eq!(bindings.get_index(1), Some(f.value2));
    assert_eq!(bindings.get_index(2), Some(f.value3));
    assert_eq!(bindings.get_index(0), None);
}

#[test]
fn test_builtin_arity_is_checked() {
    let f = Fixture::new();
    let subject = f.builtin(BuiltinGeneric::List, &[f.value1, f.value2]);
    match resolve_all(&f.env, &subject) {
        Err(ResolveError::ArityMismatch {
            site,
            expected,
            found,
        }) => {
            assert_eq!(site, "List[Value1, Value2]");
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected ArityMismatch, got {other:?}"),
    }
}

#[test]
fn test_declared_arity_is_checked() {
    let f = Fixture::new();
    let subject = f.applied(f.super2, &[f.value1]);
    assert!(matches!(
        resolve_all(&f.env, &subject),
        Err(ResolveError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_missing_index_is_unknown_parameter() {
    let f = Fixture::new();
    let subject = f.builtin(BuiltinGeneric::List, &[f.value1]);
    match resolve_one(&f.env, &subject, 3u32) {
        Err(ResolveError::UnknownParameter {
            parameter, failure, ..
        }) => {
            assert_eq!(parameter, "#3");
            assert_eq!(failure, LookupFailure::Missing);
        }
        other => panic!("expected UnknownParameter, got {other:?}"),
    }
}

#[test]
fn test_unbound_parameter_is_unknown_parameter() {
    let f = Fixture::new();
    let subject = f.class(f.type_var1);
    assert!(matches!(
        resolve_one(&f.env, &subject, &f.t3),
        Err(ResolveError::UnknownParameter {
            failure: LookupFailure::Missing,
            ..
        })
    ));
}

#[test]
fn test_linked_alias_resolves_by_name() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let root = env.class_builder("Root").generic(&[t.clone()]).build().expect("Root");

    // Child re-declares `T` under a fresh identity with its own bound.
    let bound = env.concrete("Number");
    let t_child = env
        .interner()
        .linked_type_param(&t, Some(bound), Variance::Covariant);
    let child = env
        .class_builder("Child")
        .extends(env.application(root, vec![env.type_param(&t_child)]))
        .build()
        .expect("Child");

    let int = env.concrete("Int");
    let leaf = env
        .class_builder("Leaf")
        .extends(env.application(child, vec![int]))
        .build()
        .expect("Leaf");
    let subject = Subject::Type(env.class_type(leaf));

    // Either identity yields the same type.
    assert_eq!(resolve_one(&env, &subject, &t_child), Ok(int));
    assert_eq!(resolve_one(&env, &subject, &t), Ok(int));

    // Membership never uses the name.
    assert_eq!(is_bound(&env, &subject, &t_child), Ok(true));
    assert_eq!(is_bound(&env, &subject, &t), Ok(false));
}

#[test]
fn test_name_fallback_can_be_disabled() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let alias = env
        .interner()
        .linked_type_param(&t, None, Variance::Invariant);
    // Same display name, no link.
    let namesake = env.fresh_type_param("T");
    let holder = env
        .class_builder("Holder")
        .generic(&[alias.clone()])
        .build()
        .expect("Holder");
    let int = env.concrete("Int");
    let subject = Subject::Type(env.application(holder, vec![int]));

    assert_eq!(resolve_one(&env, &subject, &namesake), Ok(int));

    let options = ResolverOptions {
        name_fallback: false,
        ..ResolverOptions::default()
    };
    let strict = HierarchyWalker::with_options(&env, &options);
    assert_eq!(strict.resolve_one(&subject, &alias), Ok(int));
    // Links are not part of the name fallback.
    assert_eq!(strict.resolve_one(&subject, &t), Ok(int));
    assert!(matches!(
        strict.resolve_one(&subject, &namesake),
        Err(ResolveError::UnknownParameter {
            failure: LookupFailure::Missing,
            ..
        })
    ));
}

#[test]
fn test_ambiguous_name_is_an_error() {
    let env = TypeEnvironment::new();
    let left_t = env.fresh_type_param("T");
    let right_t = env.fresh_type_param("T");
    let query = env.fresh_type_param("T");
    let left = env.class_builder("Left").generic(&[left_t.clone()]).build().expect("Left");
    let right = env.class_builder("Right").generic(&[right_t.clone()]).build().expect("Right");

    let int = env.concrete("Int");
    let str_ = env.concrete("Str");
    let both = env
        .class_builder("Both")
        .extends(env.application(left, vec![int]))
        .extends(env.application(right, vec![str_]))
        .build()
        .expect("Both");
    let subject = Subject::Type(env.class_type(both));

    assert_eq!(resolve_one(&env, &subject, &left_t), Ok(int));
    assert_eq!(resolve_one(&env, &subject, &right_t), Ok(str_));
    match resolve_one(&env, &subject, &query) {
        Err(ResolveError::UnknownParameter {
            parameter,
            subject,
            failure,
        }) => {
            assert_eq!(parameter, "T");
            assert_eq!(subject, "Both");
            assert_eq!(failure, LookupFailure::Ambiguous { matches: 2 });
        }
        other => panic!("expected ambiguous lookup, got {other:?}"),
    }
}

#[test]
fn test_linked_alias_in_a_chain_resolves_each_member() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let middle_t = env.interner().linked_type_param(&t, None, Variance::Invariant);
    let leaf_t = env
        .interner()
        .linked_type_param(&middle_t, None, Variance::Invariant);
    let root = env.class_builder("Root").generic(&[t.clone()]).build().expect("Root");
    let middle = env
        .class_builder("Middle")
        .extends(env.application(root, vec![env.type_param(&middle_t)]))
        .build()
        .expect("Middle");
    let leaf = env
        .class_builder("Leaf")
        .extends(env.application(middle, vec![env.type_param(&leaf_t)]))
        .build()
        .expect("Leaf");
    let int = env.concrete("Int");
    let subject = Subject::Type(env.application(leaf, vec![int]));

    let strict = HierarchyWalker::with_options(
        &env,
        &ResolverOptions {
            name_fallback: false,
            ..ResolverOptions::default()
        },
    );
    for param in [&t, &middle_t, &leaf_t] {
        assert_eq!(strict.resolve_one(&subject, param), Ok(int));
    }
}

// =============================================================================
// Instances
// =============================================================================

#[test]
fn test_instance_with_instantiation_record() {
    let f = Fixture::new();
    let ty = f.env.application(f.super2, vec![f.value1, f.value2]);
    let instance = Instance::of(&f.env, ty).expect("parameterization");
    assert_eq!(instance.class, f.super2);

    let subject = Subject::Instance(instance);
    assert_eq!(resolve_one(&f.env, &subject, &f.t1), Ok(f.value1));
    assert_eq!(resolve_one(&f.env, &subject, &f.t2), Ok(f.value2));
}

#[test]
fn test_instance_record_binds_only_own_parameters() {
    let f = Fixture::new();
    let ty = f.env.application(f.middle2_first, vec![f.value2]);
    let subject = Subject::Instance(Instance::of(&f.env, ty).expect("parameterization"));

    let bindings = resolve_all(&f.env, &subject).expect("resolves");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.get_param(&f.t2), Some(f.value2));
}

#[test]
fn test_instance_of_subclass_walks_bases() {
    let f = Fixture::new();
    let subject = Subject::Instance(Instance::new(f.type_var2_level2));
    assert_eq!(resolve_one(&f.env, &subject, &f.t1), Ok(f.value1));
    assert_eq!(resolve_one(&f.env, &subject, &f.t2), Ok(f.value2));
}

#[test]
fn test_instance_of_requires_parameterization() {
    let f = Fixture::new();
    assert!(Instance::of(&f.env, f.value1).is_none());
    assert!(Instance::of(&f.env, f.env.class_type(f.super1)).is_none());
}

#[test]
fn test_declared_params() {
    let f = Fixture::new();
    let walker = f.env.walker();
    assert_eq!(&*walker.declared_params(f.super2), &[f.t1.clone(), f.t2.clone()]);
    assert_eq!(&*walker.declared_params(f.middle2_first), &[f.t2.clone()]);
    assert!(walker.declared_params(f.type_var1).is_empty());
    assert!(walker.declared_params(f.env.builtin(BuiltinGeneric::Dict)).is_empty());
}
