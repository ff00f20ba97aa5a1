//! Diagnostics for the binding pipeline.
//!
//! The pipeline never throws for domain failures: every non-trivial
//! outcome is a coded `Diagnostic` collected in a `DiagnosticBag`. The
//! validation gate decides, from the bag, whether emission may proceed.
//! Counts per code feed the machine-readable `RunSummary`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Diagnostic severity. `Error` blocks emission at the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes. The string form (`as_str`) is the contract
/// for regression gates; variants are never renumbered, only added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticCode {
    // Naming authority
    UnreservedName,
    NameConflictUnresolved,
    StaticSideNameCollision,
    StaticSideRenamed,
    StaticSideCollisionNoted,
    HiddenNewConflict,
    RenameDecision,
    ReservedWordUnsanitized,

    // Gate invariants
    ValidationFailed,
    DuplicateMember,
    AmbiguousOverload,

    // Explicit views
    ViewCoverageMissing,
    ViewCoverageOrphan,
    ViewPropertyNameInvalid,

    // Indexers
    IndexerConflict,

    // Imports and module paths
    InvalidImportModulePath,
    CircularNamespaceDependency,
    ImportKeyContaminated,
    ExternalInterfaceReference,

    // Generic constraints
    CtorConstraintLoss,
    ConstraintMergeUnsupported,
    ConstraintUnrepresentable,
    ConstraintContradiction,
    ConstraintNarrowed,

    // Shape bookkeeping
    DiamondConflict,
    CovarianceLoss,
    DedupWinner,
    ExplicitImplSynthesized,
    OverloadOmitted,
    ReturnOverloadDemoted,

    // Load boundary
    AssemblyLoadFailed,
    CompilerGeneratedSkipped,
}

impl DiagnosticCode {
    /// The stable string form reported in artifacts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnreservedName => "PG_NAME_001",
            Self::NameConflictUnresolved => "PG_NAME_002",
            Self::StaticSideNameCollision => "PG_NAME_003",
            Self::StaticSideRenamed => "PG_NAME_004",
            Self::StaticSideCollisionNoted => "PG_NAME_005",
            Self::HiddenNewConflict => "PG_NAME_006",
            Self::RenameDecision => "PG_NAME_007",
            Self::ReservedWordUnsanitized => "PG_ID_001",
            Self::ValidationFailed => "PG_GATE_001",
            Self::DuplicateMember => "PG_GATE_002",
            Self::AmbiguousOverload => "PG_OV_001",
            Self::ViewCoverageMissing => "PG_VIEW_001",
            Self::ViewCoverageOrphan => "PG_VIEW_002",
            Self::ViewPropertyNameInvalid => "PG_VIEW_003",
            Self::IndexerConflict => "PG_IDX_001",
            Self::InvalidImportModulePath => "PG_IMP_001",
            Self::CircularNamespaceDependency => "PG_IMP_002",
            Self::ImportKeyContaminated => "PG_IMP_003",
            Self::ExternalInterfaceReference => "PG_IMP_004",
            Self::CtorConstraintLoss => "PG_CT_001",
            Self::ConstraintMergeUnsupported => "PG_CT_002",
            Self::ConstraintUnrepresentable => "PG_CT_003",
            Self::ConstraintContradiction => "PG_CT_004",
            Self::ConstraintNarrowed => "PG_CT_005",
            Self::DiamondConflict => "PG_SHAPE_001",
            Self::CovarianceLoss => "PG_SHAPE_002",
            Self::DedupWinner => "PG_SHAPE_003",
            Self::ExplicitImplSynthesized => "PG_SHAPE_004",
            Self::OverloadOmitted => "PG_OV_002",
            Self::ReturnOverloadDemoted => "PG_OV_003",
            Self::AssemblyLoadFailed => "PG_LOAD_001",
            Self::CompilerGeneratedSkipped => "PG_LOAD_002",
        }
    }

    /// Severity is a property of the code, so counts per code are also
    /// counts per severity.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnreservedName
            | Self::NameConflictUnresolved
            | Self::StaticSideNameCollision
            | Self::ReservedWordUnsanitized
            | Self::ValidationFailed
            | Self::DuplicateMember
            | Self::AmbiguousOverload
            | Self::ViewCoverageMissing
            | Self::ViewPropertyNameInvalid
            | Self::IndexerConflict
            | Self::InvalidImportModulePath
            | Self::CircularNamespaceDependency
            | Self::ImportKeyContaminated
            | Self::ConstraintContradiction
            | Self::DiamondConflict
            | Self::AssemblyLoadFailed => Severity::Error,

            Self::StaticSideCollisionNoted
            | Self::ViewCoverageOrphan
            | Self::ExternalInterfaceReference
            | Self::CtorConstraintLoss
            | Self::ConstraintMergeUnsupported
            | Self::ConstraintUnrepresentable
            | Self::ConstraintNarrowed
            | Self::CovarianceLoss => Severity::Warning,

            Self::StaticSideRenamed
            | Self::HiddenNewConflict
            | Self::RenameDecision
            | Self::DedupWinner
            | Self::ExplicitImplSynthesized
            | Self::OverloadOmitted
            | Self::ReturnOverloadDemoted
            | Self::CompilerGeneratedSkipped => Severity::Info,
        }
    }

    /// One-line human description for `--list-diagnostics`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnreservedName => "a final name was requested before reservation",
            Self::NameConflictUnresolved => "explicit name overrides collide within one scope",
            Self::StaticSideNameCollision => "derived static member collides with a base static",
            Self::StaticSideRenamed => "static member renamed to avoid a base collision",
            Self::StaticSideCollisionNoted => "static collision detected (analyze-only policy)",
            Self::HiddenNewConflict => "hiding member reserved under a renamed identifier",
            Self::RenameDecision => "naming authority recorded a rename decision",
            Self::ReservedWordUnsanitized => "reserved word reached emission unsanitized",
            Self::ValidationFailed => "emitted entity is missing a final name",
            Self::DuplicateMember => "two entities share a final name in one scope",
            Self::AmbiguousOverload => "two methods share an erasure key in one scope",
            Self::ViewCoverageMissing => "view-only member missing from its interface view",
            Self::ViewCoverageOrphan => "view-only member on a static container has no view",
            Self::ViewPropertyNameInvalid => "view property name invalid or duplicated",
            Self::IndexerConflict => "indexer property survived in a view position",
            Self::InvalidImportModulePath => "import path carries assembly-qualified text",
            Self::CircularNamespaceDependency => "namespace import graph contains a cycle",
            Self::ImportKeyContaminated => "CLR lookup key carries assembly-qualified text",
            Self::ExternalInterfaceReference => "interface resolves outside the compiled set",
            Self::CtorConstraintLoss => "default-constructor constraint not representable",
            Self::ConstraintMergeUnsupported => "union constraint merge approximated",
            Self::ConstraintUnrepresentable => "constraint has no target-system encoding",
            Self::ConstraintContradiction => "value-type and reference-type constraints clash",
            Self::ConstraintNarrowed => "constraint narrowed during closure",
            Self::DiamondConflict => "diamond inheritance conflict under error policy",
            Self::CovarianceLoss => "property covariance flattened on the class surface",
            Self::DedupWinner => "class-surface dedup selected a winner",
            Self::ExplicitImplSynthesized => "explicit interface member clone synthesized",
            Self::OverloadOmitted => "overload indistinguishable after erasure omitted",
            Self::ReturnOverloadDemoted => "return-type overload demoted to a view",
            Self::AssemblyLoadFailed => "input assembly could not be opened",
            Self::CompilerGeneratedSkipped => "compiler-generated type skipped at load",
        }
    }

    /// All codes, for `--list-diagnostics`. Kept in `as_str` order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UnreservedName,
            Self::NameConflictUnresolved,
            Self::StaticSideNameCollision,
            Self::StaticSideRenamed,
            Self::StaticSideCollisionNoted,
            Self::HiddenNewConflict,
            Self::RenameDecision,
            Self::ReservedWordUnsanitized,
            Self::ValidationFailed,
            Self::DuplicateMember,
            Self::AmbiguousOverload,
            Self::ViewCoverageMissing,
            Self::ViewCoverageOrphan,
            Self::ViewPropertyNameInvalid,
            Self::IndexerConflict,
            Self::InvalidImportModulePath,
            Self::CircularNamespaceDependency,
            Self::ImportKeyContaminated,
            Self::ExternalInterfaceReference,
            Self::CtorConstraintLoss,
            Self::ConstraintMergeUnsupported,
            Self::ConstraintUnrepresentable,
            Self::ConstraintContradiction,
            Self::ConstraintNarrowed,
            Self::DiamondConflict,
            Self::CovarianceLoss,
            Self::DedupWinner,
            Self::ExplicitImplSynthesized,
            Self::OverloadOmitted,
            Self::ReturnOverloadDemoted,
            Self::AssemblyLoadFailed,
            Self::CompilerGeneratedSkipped,
        ]
    }
}

/// Where a diagnostic points in the symbol graph. All fields optional;
/// namespace-level findings leave the rest empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl DiagnosticSite {
    #[must_use]
    pub fn namespace(ns: impl Into<String>) -> Self {
        Self {
            namespace: Some(ns.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ty(ns: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(ns.into()),
            type_name: Some(type_name.into()),
            member: None,
        }
    }

    #[must_use]
    pub fn member(
        ns: impl Into<String>,
        type_name: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(ns.into()),
            type_name: Some(type_name.into()),
            member: Some(member.into()),
        }
    }
}

impl fmt::Display for DiagnosticSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.namespace, &self.type_name, &self.member) {
            (Some(ns), Some(ty), Some(m)) => write!(f, "{ns}.{ty}::{m}"),
            (Some(ns), Some(ty), None) => write!(f, "{ns}.{ty}"),
            (Some(ns), None, _) => write!(f, "{ns}"),
            _ => write!(f, "<global>"),
        }
    }
}

/// A single pipeline finding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<DiagnosticSite>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            site: None,
        }
    }

    #[must_use]
    pub fn with_site(mut self, site: DiagnosticSite) -> Self {
        self.site = Some(site);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.code.as_str(), self.severity, self.message)?;
        if let Some(site) = &self.site {
            write!(f, " [{site}]")?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics with per-code counts.
///
/// One bag lives in the per-run context and is threaded through every
/// pass; passes append, the gate reads.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    counts: BTreeMap<&'static str, usize>,
    error_count: usize,
}

impl DiagnosticBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        *self.counts.entry(diagnostic.code.as_str()).or_insert(0) += 1;
        if diagnostic.severity == Severity::Error {
            self.error_count += 1;
        }
        tracing::debug!(code = diagnostic.code.as_str(), %diagnostic, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn report(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Diagnostic::new(code, message));
    }

    pub fn report_at(
        &mut self,
        code: DiagnosticCode,
        message: impl Into<String>,
        site: DiagnosticSite,
    ) {
        self.push(Diagnostic::new(code, message).with_site(site));
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn count_of(&self, code: DiagnosticCode) -> usize {
        self.counts.get(code.as_str()).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Build the machine-readable run summary (counts per code).
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut warning_count = 0;
        let mut info_count = 0;
        for d in &self.diagnostics {
            match d.severity {
                Severity::Warning => warning_count += 1,
                Severity::Info => info_count += 1,
                Severity::Error => {}
            }
        }
        RunSummary {
            counts: self
                .counts
                .iter()
                .map(|(code, n)| ((*code).to_string(), *n))
                .collect(),
            error_count: self.error_count,
            warning_count,
            info_count,
        }
    }

    /// Write the human-readable dump, errors first, then warnings, then
    /// info, each group in insertion order.
    pub fn write_human(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            for d in self.diagnostics.iter().filter(|d| d.severity == severity) {
                writeln!(out, "{d}")?;
            }
        }
        Ok(())
    }
}

/// Machine-readable summary persisted by the gate: counts per code plus
/// severity totals. Regression gates diff this between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub counts: BTreeMap<String, usize>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_derives_from_code() {
        let d = Diagnostic::new(DiagnosticCode::DuplicateMember, "x");
        assert_eq!(d.severity, Severity::Error);
        let d = Diagnostic::new(DiagnosticCode::CtorConstraintLoss, "x");
        assert_eq!(d.severity, Severity::Warning);
    }

    #[test]
    fn bag_counts_per_code() {
        let mut bag = DiagnosticBag::new();
        bag.report(DiagnosticCode::DedupWinner, "a");
        bag.report(DiagnosticCode::DedupWinner, "b");
        bag.report(DiagnosticCode::DuplicateMember, "c");
        assert_eq!(bag.count_of(DiagnosticCode::DedupWinner), 2);
        assert_eq!(bag.count_of(DiagnosticCode::DuplicateMember), 1);
        assert!(bag.has_errors());
        let summary = bag.summary();
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.info_count, 2);
        assert_eq!(summary.counts["PG_SHAPE_003"], 2);
    }

    #[test]
    fn all_codes_have_distinct_strings() {
        let mut seen = std::collections::BTreeSet::new();
        for code in DiagnosticCode::all() {
            assert!(seen.insert(code.as_str()), "duplicate {}", code.as_str());
        }
    }
}
