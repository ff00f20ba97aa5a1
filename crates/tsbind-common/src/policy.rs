//! Policy knobs recognized by the pipeline.
//!
//! Mirrors the configuration surface: each area of the pipeline reads
//! exactly one sub-policy. All knobs deserialize from the JSON config
//! file; unknown keys are rejected so typos fail loudly.

use serde::Deserialize;
use std::collections::BTreeMap;

/// How diamond inheritance conflicts are resolved (shape pass 5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiamondPolicy {
    /// Keep every variant; reservation disambiguates.
    #[default]
    OverloadAll,
    /// Keep the most-derived source; demote the rest to views.
    PreferDerived,
    /// Report and leave the shape untouched.
    Error,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct InterfacePolicy {
    /// Inline the base-interface closure into each interface.
    pub inline_all: bool,
    pub diamond: DiamondPolicy,
}

impl Default for InterfacePolicy {
    fn default() -> Self {
        Self {
            inline_all: true,
            diamond: DiamondPolicy::default(),
        }
    }
}

/// How unsatisfied interface requirements materialize on classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExplicitImplMode {
    SynthesizeWithSuffix,
    #[default]
    EmitExplicitViews,
    Skip,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ClassPolicy {
    /// Emit `extends` clauses for base classes.
    pub keep_extends: bool,
    /// Suffix for members that hide a base member (`is_new`).
    pub hidden_member_suffix: String,
    pub explicit_impl: ExplicitImplMode,
}

impl Default for ClassPolicy {
    fn default() -> Self {
        Self {
            keep_extends: true,
            hidden_member_suffix: "_new".to_string(),
            explicit_impl: ExplicitImplMode::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct IndexerPolicy {
    /// Keep a lone indexer as an indexed property instead of get/set
    /// method pairs.
    pub property_when_single: bool,
    /// Method-name stem for converted indexers (`get_Item`/`set_Item`).
    pub method_name: String,
}

impl Default for IndexerPolicy {
    fn default() -> Self {
        Self {
            property_when_single: true,
            method_name: "Item".to_string(),
        }
    }
}

/// How constraints from multiple inheritance paths are merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintMerge {
    #[default]
    Intersection,
    /// Not representable downstream; approximated with a warning.
    Union,
    PreferLeft,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ConstraintPolicy {
    /// Fully resolve raw constraint references before emission.
    pub strict_closure: bool,
    pub merge: ConstraintMerge,
    /// Accept losing `new()` constraints (reported once per pair).
    pub allow_ctor_constraint_loss: bool,
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self {
            strict_closure: true,
            merge: ConstraintMerge::default(),
            allow_ctor_constraint_loss: true,
        }
    }
}

/// Identifier style applied uniformly by the naming authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameTransform {
    #[default]
    None,
    CamelCase,
    PascalCase,
}

impl NameTransform {
    /// Apply the transform to one identifier. ASCII-oriented, matching
    /// the identifiers that survive CLR metadata.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::None => name.to_string(),
            Self::CamelCase => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Self::PascalCase => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EmissionPolicy {
    pub name_transform: NameTransform,
    pub emit_doc_comments: bool,
}

impl Default for EmissionPolicy {
    fn default() -> Self {
        Self {
            name_transform: NameTransform::default(),
            emit_doc_comments: true,
        }
    }
}

/// Suffix strategy when statics collide during reservation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaticConflictStrategy {
    #[default]
    NumericSuffix,
    DisambiguatingSuffix,
    Error,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RenamingPolicy {
    pub static_conflict: StaticConflictStrategy,
    /// Apply the hidden-member suffix to `is_new` members.
    pub hidden_new: bool,
    /// User-supplied `{stable id key → name}` overrides; win over style
    /// and sanitation.
    pub explicit_map: BTreeMap<String, String>,
    pub allow_static_member_rename: bool,
}

impl Default for RenamingPolicy {
    fn default() -> Self {
        Self {
            static_conflict: StaticConflictStrategy::default(),
            hidden_new: true,
            explicit_map: BTreeMap::new(),
            allow_static_member_rename: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ModulesPolicy {
    /// Lay namespaces out as `<ns>/internal/index` directories.
    pub use_namespace_directories: bool,
    /// Alias every import instead of only on collision.
    pub always_alias_imports: bool,
}

impl Default for ModulesPolicy {
    fn default() -> Self {
        Self {
            use_namespace_directories: true,
            always_alias_imports: false,
        }
    }
}

/// What to do about derived/base static-side collisions (shape pass 7).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaticSideAction {
    #[default]
    Analyze,
    AutoRename,
    Error,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct StaticSidePolicy {
    pub action: StaticSideAction,
}

/// The full policy aggregate threaded through the pipeline context.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Policy {
    pub interface: InterfacePolicy,
    pub class: ClassPolicy,
    pub indexer: IndexerPolicy,
    pub constraint: ConstraintPolicy,
    pub emission: EmissionPolicy,
    pub renaming: RenamingPolicy,
    pub modules: ModulesPolicy,
    pub static_side: StaticSidePolicy,
}
