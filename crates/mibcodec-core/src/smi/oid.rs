//! OID representations: numeric arcs and symbolic paths.

use super::symbol::Symbol;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

/// A fully-resolved numeric OID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Create a new OID from a vector of arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    /// Create an OID from a slice of arcs.
    #[must_use]
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Parse an OID from dotted notation (e.g. "1.3.6.1.2.1").
    #[must_use]
    pub fn from_dotted(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::new(Vec::new()));
        }
        let arcs: Result<Vec<u32>, _> = s.split('.').map(str::parse).collect();
        arcs.ok().map(Self::new)
    }

    /// Convert to dotted notation.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        let mut result = String::with_capacity(self.arcs.len() * 4);
        let mut iter = self.arcs.iter();
        if let Some(first) = iter.next() {
            // write! to String is infallible
            let _ = write!(result, "{first}");
            for arc in iter {
                result.push('.');
                let _ = write!(result, "{arc}");
            }
        }
        result
    }

    /// Get the parent OID (all arcs except the last).
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.arcs.len() <= 1 {
            None
        } else {
            Some(Self::from_slice(&self.arcs[..self.arcs.len() - 1]))
        }
    }

    /// Get the last arc.
    #[must_use]
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// Check if this OID is a prefix of another.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Get the arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Create a child OID by appending an arc.
    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Self::new(arcs)
    }

    /// Append a single arc in place.
    pub fn push(&mut self, arc: u32) {
        self.arcs.push(arc);
    }

    /// Append arcs in place.
    pub fn extend(&mut self, arcs: &[u32]) {
        self.arcs.extend_from_slice(arcs);
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

/// One component of a symbolic OID value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OidComponent {
    /// A bare arc number.
    Number(u32),
    /// A bare name, resolved against previously declared paths.
    Symbol(Symbol),
    /// The `name(n)` form: the number is authoritative, the name declares it.
    Named(Symbol, u32),
}

/// A symbolic OID value as written in a module: `{ iso org(3) dod(6) 1 }`.
///
/// The numeric form is obtained by resolving named components against the
/// store; see `MibStore::numeric_oid`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OidPath {
    components: Vec<OidComponent>,
}

impl OidPath {
    /// Create a path from its components.
    #[must_use]
    pub fn new(components: Vec<OidComponent>) -> Self {
        Self { components }
    }

    /// The components in declaration order.
    #[must_use]
    pub fn components(&self) -> &[OidComponent] {
        &self.components
    }

    /// Check if the path has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
