//! The naming authority.
//!
//! Resolution order per request: explicit override, then the installed
//! style transform, then reserved-word sanitation, then conflict
//! suffixing. Decisions are keyed by `(stable id, scope key)` - the
//! same member reserved on the class surface and inside a view holds
//! two independent names.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tsbind_common::limits::MAX_SUFFIX_ATTEMPTS;
use tsbind_common::policy::{NameTransform, StaticConflictStrategy};
use tsbind_common::{sanitize_identifier, DiagnosticBag, DiagnosticCode};
use tsbind_model::{MemberStableId, Scope, Side, StableId, TypeStableId};

/// Why a reservation was requested. Recorded on the decision for the
/// run summary and for debugging rename churn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ReserveReason {
    Requested,
    ExplicitOverride,
    HiddenNewConflict,
    StaticSideNameCollision,
    ViewMemberCollision,
    ViewProperty,
}

/// Origin facts that steer conflict suffixing: explicit-interface
/// clones prefer an interface-derived suffix over numbering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReserveSource {
    /// Simple name of the originating interface, when the member is an
    /// explicit-interface-implementation clone.
    pub interface_simple_name: Option<String>,
}

impl ReserveSource {
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_interface(simple_name: impl Into<String>) -> Self {
        Self {
            interface_simple_name: Some(simple_name.into()),
        }
    }
}

/// One recorded naming decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub name: String,
    pub reason: ReserveReason,
    pub source: ReserveSource,
    pub was_sanitized: bool,
    pub was_suffixed: bool,
}

/// Error from the total-after-reservation accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamingError {
    Unreserved { id: StableId, scope_key: String },
}

impl fmt::Display for NamingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreserved { id, scope_key } => {
                write!(f, "no reservation for {id} in scope {scope_key}")
            }
        }
    }
}

impl std::error::Error for NamingError {}

/// Occupancy record for one name in one scope.
#[derive(Clone, Debug)]
struct SlotOwner {
    id: StableId,
    /// Methods share their slot with other methods (legal overloads).
    overloadable: bool,
}

#[derive(Debug, Default)]
struct ScopeTable {
    slots: FxHashMap<String, SlotOwner>,
}

/// Single source of truth for every emitted identifier.
#[derive(Debug, Default)]
pub struct Renamer {
    style: NameTransform,
    static_conflict: StaticConflictStrategy,
    overrides: FxHashMap<String, String>,
    tables: FxHashMap<String, ScopeTable>,
    decisions: FxHashMap<(StableId, String), Decision>,
}

impl Renamer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the uniform style transform. Call before any reservation.
    pub fn adopt_style(&mut self, transform: NameTransform) {
        self.style = transform;
    }

    /// Install the static-conflict suffix strategy.
    pub fn set_static_conflict(&mut self, strategy: StaticConflictStrategy) {
        self.static_conflict = strategy;
    }

    /// Inject user-supplied `{stable id key → name}` overrides. Keys
    /// are the `Display` form of the stable id. Overrides win over
    /// style and sanitation.
    pub fn apply_overrides(&mut self, map: impl IntoIterator<Item = (String, String)>) {
        self.overrides.extend(map);
    }

    /// Reserve a type name in a namespace scope.
    pub fn reserve_type(
        &mut self,
        id: &TypeStableId,
        requested: &str,
        scope: &Scope,
        reason: ReserveReason,
        source: &ReserveSource,
        diagnostics: &mut DiagnosticBag,
    ) -> String {
        self.resolve(
            StableId::Type(id.clone()),
            requested,
            scope,
            Side::Instance,
            reason,
            source,
            false,
            false,
            diagnostics,
        )
    }

    /// Reserve a member name in a type or view scope.
    pub fn reserve_member(
        &mut self,
        id: &MemberStableId,
        requested: &str,
        scope: &Scope,
        reason: ReserveReason,
        is_static: bool,
        source: &ReserveSource,
        diagnostics: &mut DiagnosticBag,
    ) -> String {
        self.resolve(
            StableId::Member(id.clone()),
            requested,
            scope,
            Side::from_static(is_static),
            reason,
            source,
            false,
            is_static,
            diagnostics,
        )
    }

    /// Reserve a method name: overloads with the same requested name
    /// legally share a final name within a scope.
    pub fn reserve_method(
        &mut self,
        id: &MemberStableId,
        requested: &str,
        scope: &Scope,
        reason: ReserveReason,
        is_static: bool,
        source: &ReserveSource,
        diagnostics: &mut DiagnosticBag,
    ) -> String {
        self.resolve(
            StableId::Member(id.clone()),
            requested,
            scope,
            Side::from_static(is_static),
            reason,
            source,
            true,
            is_static,
            diagnostics,
        )
    }

    /// Total accessor after reservation.
    pub fn get_final_type(&self, id: &TypeStableId, scope: &Scope) -> Result<&str, NamingError> {
        let key = scope.key(Side::Instance);
        self.decisions
            .get(&(StableId::Type(id.clone()), key.clone()))
            .map(|d| d.name.as_str())
            .ok_or(NamingError::Unreserved {
                id: StableId::Type(id.clone()),
                scope_key: key,
            })
    }

    /// Total accessor after reservation.
    pub fn get_final_member(
        &self,
        id: &MemberStableId,
        scope: &Scope,
        is_static: bool,
    ) -> Result<&str, NamingError> {
        let key = scope.key(Side::from_static(is_static));
        self.decisions
            .get(&(StableId::Member(id.clone()), key.clone()))
            .map(|d| d.name.as_str())
            .ok_or(NamingError::Unreserved {
                id: StableId::Member(id.clone()),
                scope_key: key,
            })
    }

    /// Non-mutating probe: the styled, sanitized form a future
    /// reservation of `requested_base` would start from. Used by the
    /// view-member collision probe and class-surface dedup grouping.
    #[must_use]
    pub fn peek_final_member(
        &self,
        _scope: &Scope,
        requested_base: &str,
        _is_static: bool,
    ) -> String {
        let styled = self.style.apply(requested_base);
        let (sanitized, _) = sanitize_identifier(&styled);
        sanitized
    }

    /// Whether `name` is occupied in the scope's side table.
    #[must_use]
    pub fn is_taken(&self, scope: &Scope, name: &str, is_static: bool) -> bool {
        let key = scope.key(Side::from_static(is_static));
        self.tables
            .get(&key)
            .is_some_and(|table| table.slots.contains_key(name))
    }

    /// All names reserved in the scope's side table, sorted.
    #[must_use]
    pub fn list_reserved(&self, scope: &Scope, is_static: bool) -> BTreeSet<String> {
        let key = scope.key(Side::from_static(is_static));
        self.tables
            .get(&key)
            .map(|table| table.slots.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The recorded decision for a `(stable id, scope key)` pair.
    #[must_use]
    pub fn decision(&self, id: &StableId, scope_key: &str) -> Option<&Decision> {
        self.decisions.get(&(id.clone(), scope_key.to_string()))
    }

    /// Count of recorded decisions, for the run summary.
    #[must_use]
    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    fn resolve(
        &mut self,
        id: StableId,
        requested: &str,
        scope: &Scope,
        side: Side,
        reason: ReserveReason,
        source: &ReserveSource,
        overloadable: bool,
        is_static: bool,
        diagnostics: &mut DiagnosticBag,
    ) -> String {
        let scope_key = scope.key(side);

        // Idempotence: a pair already decided keeps its decision, no
        // matter what the new request asks for.
        if let Some(decision) = self.decisions.get(&(id.clone(), scope_key.clone())) {
            return decision.name.clone();
        }

        // 1. Explicit override wins verbatim.
        if let Some(override_name) = self.overrides.get(&id.to_string()).cloned() {
            let table = self.tables.entry(scope_key.clone()).or_default();
            if let Some(owner) = table.slots.get(&override_name)
                && owner.id != id
            {
                diagnostics.report(
                    DiagnosticCode::NameConflictUnresolved,
                    format!(
                        "override name `{override_name}` for {id} collides with {} in {scope_key}",
                        owner.id
                    ),
                );
            }
            table.slots.insert(
                override_name.clone(),
                SlotOwner {
                    id: id.clone(),
                    overloadable,
                },
            );
            self.record(
                id,
                scope_key,
                override_name.clone(),
                ReserveReason::ExplicitOverride,
                source.clone(),
                false,
                false,
            );
            return override_name;
        }

        // 2-3. Style, then sanitation.
        let styled = self.style.apply(requested);
        let (base, was_sanitized) = sanitize_identifier(&styled);

        // 4. Insert into the scope table, or share a method slot.
        let table = self.tables.entry(scope_key.clone()).or_default();
        match table.slots.get(&base) {
            None => {
                table.slots.insert(
                    base.clone(),
                    SlotOwner {
                        id: id.clone(),
                        overloadable,
                    },
                );
                self.record(id, scope_key, base.clone(), reason, source.clone(), was_sanitized, false);
                return base;
            }
            Some(owner) if overloadable && owner.overloadable => {
                // Legal overload group: same final name, own decision.
                self.record(id, scope_key, base.clone(), reason, source.clone(), was_sanitized, false);
                return base;
            }
            Some(_) => {}
        }

        // 5. Deterministic suffix allocation.
        let mut candidates: Vec<String> = Vec::new();
        if let Some(iface) = &source.interface_simple_name {
            candidates.push(format!("{base}_{iface}"));
        }
        if is_static {
            match self.static_conflict {
                StaticConflictStrategy::DisambiguatingSuffix => {
                    candidates.push(format!("{base}_static"));
                }
                StaticConflictStrategy::Error => {
                    diagnostics.report(
                        DiagnosticCode::StaticSideNameCollision,
                        format!("static member name `{base}` collides in {scope_key}"),
                    );
                }
                StaticConflictStrategy::NumericSuffix => {}
            }
        }

        let table = self.tables.entry(scope_key.clone()).or_default();
        for candidate in candidates {
            if !table.slots.contains_key(&candidate) {
                table.slots.insert(
                    candidate.clone(),
                    SlotOwner {
                        id: id.clone(),
                        overloadable,
                    },
                );
                self.record(id, scope_key, candidate.clone(), reason, source.clone(), was_sanitized, true);
                return candidate;
            }
        }

        for n in 2..MAX_SUFFIX_ATTEMPTS {
            let candidate = format!("{base}{n}");
            if !table.slots.contains_key(&candidate) {
                table.slots.insert(
                    candidate.clone(),
                    SlotOwner {
                        id: id.clone(),
                        overloadable,
                    },
                );
                self.record(id, scope_key, candidate.clone(), reason, source.clone(), was_sanitized, true);
                return candidate;
            }
        }

        // Suffix space exhausted; fall back to the base name and let
        // the gate report the duplicate.
        diagnostics.report(
            DiagnosticCode::NameConflictUnresolved,
            format!("suffix space exhausted for `{base}` in {scope_key}"),
        );
        self.record(id, scope_key, base.clone(), reason, source.clone(), was_sanitized, false);
        base
    }

    fn record(
        &mut self,
        id: StableId,
        scope_key: String,
        name: String,
        reason: ReserveReason,
        source: ReserveSource,
        was_sanitized: bool,
        was_suffixed: bool,
    ) {
        tracing::debug!(%id, scope = %scope_key, %name, ?reason, "reserved");
        self.decisions.insert(
            (id, scope_key),
            Decision {
                name,
                reason,
                source,
                was_sanitized,
                was_suffixed,
            },
        );
    }
}
