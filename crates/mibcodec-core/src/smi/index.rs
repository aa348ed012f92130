//! Row-index resolution: splitting an OID tail into typed values.

use super::codec::{CodecRegistry, CodecValue};
use super::symbol::{NameId, Symbol};
use crate::error::MibError;
use crate::store::MibStore;
use alloc::vec::Vec;

/// One decoded index value, with its symbolic label when the syntax is an
/// enumeration or BITS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedIndexValue {
    /// The decoded value.
    pub value: CodecValue,
    /// The named-number or named-bit label for the numeric code.
    pub label: Option<NameId>,
}

/// The declared INDEX list of a table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    symbols: Vec<Symbol>,
}

impl Index {
    /// Create an index over the given column symbols.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// The index of a table row, from its INDEX attribute.
    #[must_use]
    pub fn for_row(store: &MibStore, row: Symbol) -> Option<Self> {
        store.object_index(row).map(|s| Self::new(s.to_vec()))
    }

    /// The index column symbols, in declaration order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Split an OID tail into one typed value per index column.
    ///
    /// Each column's syntax is flattened through the store; its constraint
    /// (or, failing that, the codec's intrinsic constraint) claims a leading
    /// fragment of the OID, which the registered codec decodes. A column
    /// with no constraint at all consumes exactly one arc.
    ///
    /// # Errors
    ///
    /// [`MibError::ConstraintViolation`] when a fragment cannot satisfy a
    /// constraint, [`MibError::TrailingIndex`] when arcs remain after the
    /// last column, plus any error from syntax resolution or decoding.
    pub fn resolve(
        &self,
        oid: &[u32],
        store: &MibStore,
        codecs: &CodecRegistry,
    ) -> Result<Vec<TypedIndexValue>, MibError> {
        let mut values = Vec::with_capacity(self.symbols.len());
        let mut rest: Option<Vec<u32>> = if oid.is_empty() {
            None
        } else {
            Some(oid.to_vec())
        };

        for &sym in &self.symbols {
            let Some(current) = rest.take() else {
                break;
            };

            let syntax = store.resolve_syntax(sym)?;
            let codec = codecs.get(syntax.smi_type)?;
            let constraint = syntax
                .constraint
                .clone()
                .or_else(|| codec.constraint());

            let (content, next) = match constraint {
                Some(c) => {
                    let extracted =
                        c.extract(&current)
                            .ok_or_else(|| MibError::ConstraintViolation {
                                oid: current.clone(),
                            })?;
                    (extracted.content, extracted.next)
                }
                None => {
                    let (&first, tail) = current
                        .split_first()
                        .ok_or(MibError::ConstraintViolation { oid: current.clone() })?;
                    let next = if tail.is_empty() {
                        None
                    } else {
                        Some(tail.to_vec())
                    };
                    (alloc::vec![first], next)
                }
            };

            let value = codec.decode(&content)?;
            let label = match (&syntax.names, &syntax.bits) {
                (Some(names), _) => value.as_i64().and_then(|v| names.label(v)),
                (None, Some(bits)) => value
                    .as_i64()
                    .and_then(|v| u32::try_from(v).ok())
                    .and_then(|v| bits.label(v)),
                (None, None) => None,
            };

            values.push(TypedIndexValue { value, label });
            rest = next;
        }

        if let Some(residue) = rest {
            if !residue.is_empty() {
                return Err(MibError::TrailingIndex { residue });
            }
        }
        Ok(values)
    }
}
