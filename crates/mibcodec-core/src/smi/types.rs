//! Type descriptors for parsed syntaxes.

use super::constraint::Constraint;
use super::symbol::{NameId, Symbol};
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Base kind of a type descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// `INTEGER`, possibly with named numbers.
    Integer,
    /// `OCTET STRING`.
    OctetString,
    /// `BIT STRING`.
    BitString,
    /// `BITS`, with named bit positions.
    Bits,
    /// `OBJECT IDENTIFIER`.
    ObjectIdentifier,
    /// `NULL`.
    Null,
    /// `SEQUENCE { … }` (table rows).
    Sequence,
    /// `SEQUENCE OF …` (tables).
    SequenceOf,
    /// `CHOICE { … }`.
    Choice,
    /// A reference to another named type.
    Referenced,
}

/// Ordered named-number list for `INTEGER { up(1), down(2) }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedNumbers {
    /// (value, label) pairs in declaration order.
    pub values: Vec<(i64, NameId)>,
}

impl NamedNumbers {
    /// Create a new named-number list.
    #[must_use]
    pub fn new(values: Vec<(i64, NameId)>) -> Self {
        Self { values }
    }

    /// Get the label for a numeric value.
    #[must_use]
    pub fn label(&self, value: i64) -> Option<NameId> {
        self.values
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, l)| *l)
    }
}

/// Ordered named-bit list for `BITS { flagA(0), flagB(1) }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedBits {
    /// (label, bit position) pairs in declaration order.
    pub bits: Vec<(NameId, u32)>,
}

impl NamedBits {
    /// Create a new named-bit list.
    #[must_use]
    pub fn new(bits: Vec<(NameId, u32)>) -> Self {
        Self { bits }
    }

    /// Get the label for a bit position.
    #[must_use]
    pub fn label(&self, position: u32) -> Option<NameId> {
        self.bits
            .iter()
            .find(|(_, p)| *p == position)
            .map(|(l, _)| *l)
    }
}

/// Inner structure of compound types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeContent {
    /// Element type of a `SEQUENCE OF`.
    Element(Box<TypeDescriptor>),
    /// Ordered fields of a `SEQUENCE` or `CHOICE`. Entries are `None` while
    /// the builder is still filling the map.
    Fields(Vec<(Symbol, Option<TypeDescriptor>)>),
}

/// A parsed type: base kind plus the optional refinements of the dialect.
///
/// A descriptor is fully resolved only when every [`TypeKind::Referenced`]
/// node names a symbol present in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    /// Base kind.
    pub kind: TypeKind,
    /// Named numbers, for INTEGER enumerations.
    pub names: Option<NamedNumbers>,
    /// Named bit positions, for BITS.
    pub bits: Option<NamedBits>,
    /// Size or value range constraint.
    pub constraint: Option<Constraint>,
    /// Inner structure, for SEQUENCE, SEQUENCE OF and CHOICE.
    pub content: Option<TypeContent>,
    /// Referenced symbol, when `kind` is [`TypeKind::Referenced`].
    pub reference: Option<Symbol>,
}

impl TypeDescriptor {
    /// Create a bare descriptor of the given kind.
    #[must_use]
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            names: None,
            bits: None,
            constraint: None,
            content: None,
            reference: None,
        }
    }

    /// Create a descriptor referencing another type by symbol.
    #[must_use]
    pub fn referenced(symbol: Symbol) -> Self {
        let mut td = Self::new(TypeKind::Referenced);
        td.reference = Some(symbol);
        td
    }
}
