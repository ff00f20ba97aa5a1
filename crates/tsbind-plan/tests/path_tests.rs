//! Path-planner relativity: a specifier resolved from the source
//! namespace's directory reaches the target's module file.

use std::path::{Component, Path, PathBuf};
use tsbind_plan::{module_specifier, namespace_directory};

/// Resolve `specifier` the way a module loader would, starting from
/// `base_dir`, then normalize `..` components.
fn resolve(base_dir: &str, specifier: &str) -> PathBuf {
    let mut path = PathBuf::from(base_dir);
    path.push(specifier);
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}

fn module_file(namespace: &str) -> PathBuf {
    if namespace.is_empty() {
        Path::new("_root").join("index")
    } else {
        Path::new(namespace).join("internal").join("index")
    }
}

#[test]
fn every_pair_resolves_to_the_target_module() {
    let namespaces = ["", "System", "System.IO", "System.Collections.Generic"];
    for source in namespaces {
        for target in namespaces {
            if source == target {
                continue;
            }
            let spec = module_specifier(source, target);
            let resolved = resolve(&namespace_directory(source), &spec);
            assert_eq!(
                resolved,
                module_file(target),
                "{source:?} -> {target:?} via {spec}"
            );
        }
    }
}

#[test]
fn specifiers_are_pure_functions_of_the_pair() {
    // Compute in two different orders; results must agree.
    let forward = module_specifier("System", "System.IO");
    let _ = module_specifier("System.IO", "System");
    let again = module_specifier("System", "System.IO");
    assert_eq!(forward, again);
}
