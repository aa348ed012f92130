//! Interned names and symbols.
//!
//! Every module and declaration name is interned once in a [`NameTable`];
//! a [`Symbol`] is a pair of interned ids and is `Copy`, cheap to compare
//! and usable as a map key.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroU32;

/// Identifier of an interned name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameId(NonZeroU32);

impl NameId {
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Self)
    }

    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A `(module, name)` pair identifying one declaration.
///
/// Equality is pairwise over the interned ids; two symbols with the same
/// local name but different defining modules are distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Defining (or imported-from) module.
    pub module: NameId,
    /// Local name within the module.
    pub name: NameId,
}

impl Symbol {
    /// Render the symbol against its name table.
    #[must_use]
    pub fn display<'a>(&self, names: &'a NameTable) -> SymbolDisplay<'a> {
        SymbolDisplay {
            module: names.get(self.module),
            name: names.get(self.name),
        }
    }
}

/// Borrowed, printable form of a symbol.
#[derive(Clone, Copy, Debug)]
pub struct SymbolDisplay<'a> {
    module: &'a str,
    name: &'a str,
}

impl fmt::Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// FxHash-style hash function for strings.
#[inline]
fn hash_str(s: &str) -> u64 {
    const K: u64 = 0x517c_c1b7_2722_0a95;
    let mut hash = 0u64;
    for byte in s.bytes() {
        hash = hash.rotate_left(5) ^ u64::from(byte);
        hash = hash.wrapping_mul(K);
    }
    hash
}

/// Name interner with hash-and-verify deduplication.
///
/// Names are concatenated into one buffer with an offset table. Lookup
/// hashes the candidate and verifies against actual content, so hash
/// collisions cost an extra comparison instead of a wrong answer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameTable {
    /// Concatenated name data.
    data: String,
    /// `offsets[i]` is the start of name `i`; one trailing entry marks the end.
    offsets: Vec<u32>,
    /// hash(name) → candidate ids.
    dedup: BTreeMap<u64, Vec<NameId>>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: String::new(),
            offsets: alloc::vec![0],
            dedup: BTreeMap::new(),
        }
    }

    /// Intern a name, returning its id.
    #[allow(clippy::missing_panics_doc)] // Panics only past u32::MAX names
    #[allow(clippy::cast_possible_truncation)] // Data bounded by available memory
    pub fn intern(&mut self, s: &str) -> NameId {
        let hash = hash_str(s);
        if let Some(candidates) = self.dedup.get(&hash) {
            for &id in candidates {
                if self.get(id) == s {
                    return id;
                }
            }
        }

        self.data.push_str(s);
        self.offsets.push(self.data.len() as u32);
        let id = NameId::from_index(self.offsets.len() - 2).expect("too many names");
        self.dedup.entry(hash).or_default().push(id);
        id
    }

    /// Look up an already-interned name.
    #[must_use]
    pub fn find(&self, s: &str) -> Option<NameId> {
        let candidates = self.dedup.get(&hash_str(s))?;
        candidates.iter().copied().find(|&id| self.get(id) == s)
    }

    /// Get the text of an interned name.
    #[must_use]
    pub fn get(&self, id: NameId) -> &str {
        let start = self.offsets[id.index()] as usize;
        let end = self.offsets[id.index() + 1] as usize;
        &self.data[start..end]
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.len() == 1
    }
}
