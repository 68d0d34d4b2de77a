use pretty_assertions::assert_eq;
use typecompat_catalog::{CatalogOptions, TypeCatalog};
use typecompat_hierarchy::{is_compatible, CheckError, CompatibilityChecker, HierarchyResolver};
use typecompat_test_utils::{ClassFileBuilder, ClassTree};

fn animals() -> ClassTree {
    ClassTree::new().with([
        ClassFileBuilder::class("com/example/Animal"),
        ClassFileBuilder::class("com/example/Dog").extends("com/example/Animal"),
        ClassFileBuilder::interface("com/example/Flyable"),
        ClassFileBuilder::class("com/example/Bird")
            .extends("com/example/Animal")
            .implements("com/example/Flyable"),
        ClassFileBuilder::class("com/example/Parrot").extends("com/example/Bird"),
        ClassFileBuilder::class("com/example/Rock"),
    ])
}

const ALL: &[&str] = &[
    "com.example.Animal",
    "com.example.Dog",
    "com.example.Flyable",
    "com.example.Bird",
    "com.example.Parrot",
    "com.example.Rock",
];

#[test]
fn subclass_is_compatible_with_superclass_but_not_the_reverse() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    assert!(is_compatible(&catalog, "com.example.Animal", "com.example.Dog").unwrap());
    assert!(!is_compatible(&catalog, "com.example.Dog", "com.example.Animal").unwrap());
}

#[test]
fn class_is_compatible_with_implemented_interface() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    assert!(is_compatible(&catalog, "com.example.Flyable", "com.example.Bird").unwrap());
    assert!(is_compatible(&catalog, "com.example.Flyable", "com.example.Parrot").unwrap());
    assert!(!is_compatible(&catalog, "com.example.Flyable", "com.example.Dog").unwrap());
}

#[test]
fn every_type_is_compatible_with_itself() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();
    let mut checker = CompatibilityChecker::new(&catalog);

    for name in ALL {
        assert!(checker.is_compatible(name, name).unwrap(), "{name}");
    }
}

#[test]
fn object_is_compatible_with_every_class() {
    let tree = animals();
    // Superclass outside the root and outside the stdlib slice.
    tree.add(ClassFileBuilder::class("com/example/Robot").extends("org/robotics/Machine"));
    let catalog = TypeCatalog::load(tree.path()).unwrap();
    let mut checker = CompatibilityChecker::new(&catalog);

    for name in ALL.iter().chain(&["com.example.Robot"]) {
        let expected = *name != "com.example.Flyable";
        assert_eq!(
            checker.is_compatible("java.lang.Object", name).unwrap(),
            expected,
            "{name}"
        );
    }
}

#[test]
fn object_is_compatible_without_the_stdlib_stub() {
    let tree = ClassTree::new().with([
        ClassFileBuilder::class("app/Service").extends("org/framework/Base"),
        ClassFileBuilder::class("app/Plain"),
        ClassFileBuilder::interface("app/Api"),
    ]);
    let options = CatalogOptions {
        include_stdlib_stub: false,
        ..CatalogOptions::default()
    };
    let catalog = TypeCatalog::load_with_options(tree.path(), &options).unwrap();

    assert!(is_compatible(&catalog, "java.lang.Object", "app.Service").unwrap());
    assert!(is_compatible(&catalog, "java.lang.Object", "app.Plain").unwrap());
    // Nothing defines Object here, and an interface never reaches it.
    assert_eq!(
        is_compatible(&catalog, "java.lang.Object", "app.Api").unwrap_err(),
        CheckError::TypeNotFound {
            name: "java.lang.Object".to_string()
        }
    );
}

#[test]
fn compatibility_is_antisymmetric_and_transitive() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();
    let mut checker = CompatibilityChecker::new(&catalog);

    let mut holds = Vec::new();
    for a in ALL {
        for b in ALL {
            if checker.is_compatible(a, b).unwrap() {
                holds.push((*a, *b));
            }
        }
    }

    for &(a, b) in &holds {
        if a != b {
            assert!(!holds.contains(&(b, a)), "{a} and {b} are mutually compatible");
        }
        for &(b2, c) in &holds {
            if b2 == b {
                assert!(holds.contains(&(a, c)), "{a} <- {b} <- {c} is not transitive");
            }
        }
    }
}

#[test]
fn unknown_type_is_an_error_not_false() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    let err = is_compatible(&catalog, "com.example.Animal", "com.example.Cat").unwrap_err();
    assert_eq!(
        err,
        CheckError::TypeNotFound {
            name: "com.example.Cat".into()
        }
    );
    let err = is_compatible(&catalog, "com.example.Cat", "com.example.Dog").unwrap_err();
    assert_eq!(err.kind(), "TypeNotFound");
}

#[test]
fn unrelated_malformed_file_does_not_affect_the_answer() {
    let tree = animals();
    tree.add_raw("com/example/Broken.class", b"\xCA\xFE\xBA\xBE\x00\x00");
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    assert!(is_compatible(&catalog, "com.example.Animal", "com.example.Dog").unwrap());
}

#[test]
fn malformed_queried_type_is_reported_as_malformed() {
    let tree = animals();
    let broken = tree.add_raw("com/example/Broken.class", b"\xCA\xFE\xBA\xBE\x00\x00");
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    match is_compatible(&catalog, "com.example.Animal", "com.example.Broken").unwrap_err() {
        CheckError::MalformedInput { name, path, .. } => {
            assert_eq!(name, "com.example.Broken");
            assert_eq!(path, broken);
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

#[test]
fn mutual_inheritance_is_a_cycle() {
    let tree = ClassTree::new().with([
        ClassFileBuilder::class("cyc/A").extends("cyc/B"),
        ClassFileBuilder::class("cyc/B").extends("cyc/A"),
    ]);
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    let cases = [
        ("cyc.A", ["cyc.A", "cyc.B", "cyc.A"]),
        ("cyc.B", ["cyc.B", "cyc.A", "cyc.B"]),
    ];
    for (sub, path) in cases {
        let mut resolver = HierarchyResolver::new(&catalog);
        let err = resolver.ancestors_of(sub).unwrap_err();
        assert_eq!(err.to_string(), format!("cyclic inheritance: {}", path.join(" -> ")));

        let err = is_compatible(&catalog, "java.lang.Object", sub).unwrap_err();
        assert_eq!(err.kind(), "CyclicHierarchy");
        let err = is_compatible(&catalog, sub, sub).unwrap_err();
        assert_eq!(err.kind(), "CyclicHierarchy");
    }
}

#[test]
fn ancestors_reach_outside_the_root_through_the_stdlib_stub() {
    let tree = ClassTree::new().with([
        ClassFileBuilder::class("app/Names").extends("java/util/ArrayList"),
        ClassFileBuilder::class("app/Failure").extends("java/lang/IllegalStateException"),
    ]);
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    assert!(is_compatible(&catalog, "java.lang.Iterable", "app.Names").unwrap());
    assert!(is_compatible(&catalog, "java.io.Serializable", "app.Names").unwrap());
    assert!(is_compatible(&catalog, "java.lang.RuntimeException", "app.Failure").unwrap());
    assert!(!is_compatible(&catalog, "java.util.Map", "app.Names").unwrap());
}

#[test]
fn opaque_ancestors_are_kept_by_name() {
    let tree = ClassTree::new().with([
        ClassFileBuilder::class("app/Service").extends("org/framework/Base"),
        ClassFileBuilder::class("app/Impl")
            .extends("app/Service")
            .implements("org/framework/Lifecycle"),
    ]);
    let catalog = TypeCatalog::load(tree.path()).unwrap();

    let mut resolver = HierarchyResolver::new(&catalog);
    let ancestors = resolver.ancestors_of("app.Impl").unwrap();
    assert_eq!(
        ancestors.iter().collect::<Vec<_>>(),
        vec![
            "app.Service",
            "org.framework.Base",
            "org.framework.Lifecycle",
            "java.lang.Object"
        ]
    );
    assert_eq!(
        ancestors.opaque().collect::<Vec<_>>(),
        vec!["org.framework.Base", "org.framework.Lifecycle"]
    );

    assert!(is_compatible(&catalog, "org.framework.Base", "app.Impl").unwrap());
    assert!(is_compatible(&catalog, "java.lang.Object", "app.Impl").unwrap());
    assert!(is_compatible(&catalog, "java.lang.Object", "app.Service").unwrap());
}

#[test]
fn explain_path_follows_declared_edges() {
    let tree = animals();
    let catalog = TypeCatalog::load(tree.path()).unwrap();
    let mut checker = CompatibilityChecker::new(&catalog);

    assert_eq!(
        checker
            .supertype_path("java.lang.Object", "com.example.Parrot")
            .unwrap(),
        Some(vec![
            "com.example.Parrot".to_string(),
            "com.example.Bird".to_string(),
            "com.example.Animal".to_string(),
            "java.lang.Object".to_string(),
        ])
    );
}
