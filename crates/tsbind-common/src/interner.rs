//! String interning for identifier deduplication.
//!
//! Type and member names repeat heavily across a symbol graph (every
//! `System.String` reference, every `ToString` member). Interning turns
//! repeated comparisons into `u32` equality and keeps one copy of each
//! string alive for the run.

use rustc_hash::FxHashMap;

/// An interned string handle. Cheap to copy, compare, and hash.
///
/// Atoms are only meaningful relative to the `Interner` that produced
/// them; they are never serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// Raw index into the interner's string table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Single-threaded string interner.
///
/// The pipeline is sequential (one run, one thread), so no sharding or
/// locking is needed.
#[derive(Debug, Default)]
pub struct Interner {
    map: FxHashMap<Box<str>, Atom>,
    strings: Vec<Box<str>>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its atom. Idempotent.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&atom) = self.map.get(text) {
            return atom;
        }
        let atom = Atom(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, atom);
        atom
    }

    /// Resolve an atom back to its string.
    ///
    /// Panics if the atom came from a different interner with a larger
    /// string table; callers keep atoms and interner together.
    #[must_use]
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.index()]
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("System.String");
        let b = interner.intern("System.String");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_atoms() {
        let mut interner = Interner::new();
        let a = interner.intern("ToString");
        let b = interner.intern("GetHashCode");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "ToString");
        assert_eq!(interner.resolve(b), "GetHashCode");
    }
}
