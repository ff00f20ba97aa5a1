//! Relative module specifiers between namespace directories.
//!
//! The directory scheme is fixed: the root namespace lives in `_root`,
//! every other namespace in a directory named after itself with its
//! surface at `internal/index`. A specifier depends only on the
//! `(source, target)` pair, never on traversal order.

/// The directory a namespace's module files live in.
#[must_use]
pub fn namespace_directory(namespace: &str) -> String {
    if namespace.is_empty() {
        "_root".to_string()
    } else {
        namespace.to_string()
    }
}

/// The relative specifier that reaches `target_ns`'s module from
/// `source_ns`'s directory.
#[must_use]
pub fn module_specifier(source_ns: &str, target_ns: &str) -> String {
    let prefix = if source_ns.is_empty() { "./" } else { "../" };
    if target_ns.is_empty() {
        format!("{prefix}_root/index")
    } else {
        format!("{prefix}{target_ns}/internal/index")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_to_namespace() {
        assert_eq!(module_specifier("", "System.IO"), "./System.IO/internal/index");
    }

    #[test]
    fn namespace_to_root() {
        assert_eq!(module_specifier("System.IO", ""), "../_root/index");
    }

    #[test]
    fn namespace_to_namespace() {
        assert_eq!(
            module_specifier("System.IO", "System.Text"),
            "../System.Text/internal/index"
        );
    }

    #[test]
    fn specifier_is_stable_per_pair() {
        let a = module_specifier("System.IO", "System.Text");
        let b = module_specifier("System.IO", "System.Text");
        assert_eq!(a, b);
    }

    #[test]
    fn root_directory_name() {
        assert_eq!(namespace_directory(""), "_root");
        assert_eq!(namespace_directory("System"), "System");
    }
}
