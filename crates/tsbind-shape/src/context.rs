//! The per-run pass context.
//!
//! No process-global state: policy, the naming authority, the interner
//! and the diagnostic bag are owned by the run and threaded explicitly
//! through every pass. Field access keeps the borrows disjoint, so a
//! pass can reserve a name and report a diagnostic in one breath.

use tsbind_common::policy::Policy;
use tsbind_common::{DiagnosticBag, Interner};
use tsbind_naming::Renamer;

pub struct PassContext<'a> {
    pub policy: &'a Policy,
    pub renamer: &'a mut Renamer,
    pub interner: &'a mut Interner,
    pub diagnostics: &'a mut DiagnosticBag,
}

impl<'a> PassContext<'a> {
    #[must_use]
    pub fn new(
        policy: &'a Policy,
        renamer: &'a mut Renamer,
        interner: &'a mut Interner,
        diagnostics: &'a mut DiagnosticBag,
    ) -> Self {
        Self {
            policy,
            renamer,
            interner,
            diagnostics,
        }
    }
}
