use super::*;
use crate::builtins::BuiltinGeneric;

#[test]
fn test_marker_arguments_are_the_declared_list() {
    let env = TypeEnvironment::new();
    let a = env.fresh_type_param("A");
    let b = env.fresh_type_param("B");
    let pair = env
        .class_builder("Pair")
        .generic(&[b.clone(), a.clone()])
        .build()
        .expect("Pair");
    let info = env.definitions().get(pair).expect("registered");
    assert_eq!(&*info.type_params, &[b, a]);
    assert_eq!(info.kind, DefKind::Class);
}

#[test]
fn test_free_parameters_in_first_appearance_order() {
    let env = TypeEnvironment::new();
    let a = env.fresh_type_param("A");
    let b = env.fresh_type_param("B");
    let (a_ty, b_ty) = (env.type_param(&a), env.type_param(&b));
    let dict = env.builtin_type(BuiltinGeneric::Dict, vec![b_ty, a_ty]);
    let list = env.builtin_type(BuiltinGeneric::List, vec![env.union(vec![a_ty, b_ty])]);

    let sub = env
        .class_builder("Sub")
        .extends(dict)
        .extends(list)
        .build()
        .expect("Sub");
    let params = env.definitions().get(sub).expect("registered").type_params;
    assert_eq!(&*params, &[b, a]);
}

#[test]
fn test_explicit_parameters_take_precedence() {
    let env = TypeEnvironment::new();
    let a = env.fresh_type_param("A");
    let b = env.fresh_type_param("B");
    let list = env.builtin_type(BuiltinGeneric::List, vec![env.type_param(&a)]);
    let def = env
        .class_builder("Explicit")
        .extends(list)
        .type_params(vec![b.clone(), a.clone()])
        .build()
        .expect("Explicit");
    let params = env.definitions().get(def).expect("registered").type_params;
    assert_eq!(&*params, &[b, a]);
}

#[test]
fn test_records_keep_fields() {
    let env = TypeEnvironment::new();
    let int = env.concrete("Int");
    let def = env
        .class_builder("Point")
        .record()
        .field("x", int)
        .field("y", int)
        .build()
        .expect("Point");
    assert_eq!(env.definitions().get_kind(def), Some(DefKind::Record));
    let fields = env.definitions().get_fields(def).expect("registered");
    let names: Vec<String> = fields
        .iter()
        .map(|field| env.interner().resolve_atom_ref(field.name).to_string())
        .collect();
    assert_eq!(names, ["x", "y"]);
}

#[test]
fn test_rejects_invalid_bases() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let int = env.concrete("Int");

    let err = env.class_builder("A").extends(env.type_param(&t)).build();
    assert!(matches!(err, Err(DeclarationError::InvalidBase { .. })));

    let union = env.union(vec![int, env.concrete("Str")]);
    let err = env.class_builder("B").extends(union).build();
    assert!(matches!(err, Err(DeclarationError::InvalidBase { .. })));

    let bare_marker = env.class_type(env.generic_marker());
    let err = env.class_builder("C").extends(bare_marker).build();
    assert!(matches!(err, Err(DeclarationError::InvalidBase { .. })));

    let dangling = env.class_type(DefId(9_999));
    assert_eq!(
        env.class_builder("D").extends(dangling).build(),
        Err(DeclarationError::UnknownBase {
            class: "D".to_string(),
            base: "<def #9999>".to_string(),
        })
    );
}

#[test]
fn test_rejects_malformed_marker_use() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let u = env.fresh_type_param("U");
    let int = env.concrete("Int");

    let twice = env
        .class_builder("Twice")
        .generic(&[t.clone()])
        .generic(&[u.clone()])
        .build();
    assert!(matches!(twice, Err(DeclarationError::DuplicateMarker { .. })));

    let concrete_arg = env.application(env.generic_marker(), vec![int]);
    let err = env.class_builder("Concrete").extends(concrete_arg).build();
    assert_eq!(
        err,
        Err(DeclarationError::NonParameterMarkerArgument {
            class: "Concrete".to_string(),
            argument: "Int".to_string(),
        })
    );

    let repeated = env.class_builder("Repeated").generic(&[t.clone(), t.clone()]).build();
    assert!(matches!(repeated, Err(DeclarationError::DuplicateParameter { .. })));
}

#[test]
fn test_rejects_undeclared_base_parameter() {
    let env = TypeEnvironment::new();
    let t = env.fresh_type_param("T");
    let u = env.fresh_type_param("U");
    let list = env.builtin_type(BuiltinGeneric::List, vec![env.type_param(&u)]);
    let err = env
        .class_builder("Sub")
        .extends(list)
        .generic(&[t.clone()])
        .build();
    assert_eq!(
        err,
        Err(DeclarationError::UndeclaredParameter {
            class: "Sub".to_string(),
            parameter: "U".to_string(),
        })
    );
}
