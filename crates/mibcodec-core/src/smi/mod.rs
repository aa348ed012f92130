//! The SMI data model.
//!
//! Symbols, OID paths, type descriptors, constraints, macro attribute bags
//! and the index resolver: the vocabulary shared by the builder, the store
//! and query-time callers.

mod attributes;
mod codec;
mod constraint;
mod index;
mod oid;
mod symbol;
mod types;
mod value;

pub use attributes::{attr, AttributeBag, AttributeValue};
pub use codec::{Codec, CodecRegistry, CodecValue, SmiType};
pub use constraint::{Constraint, Element, Extracted};
pub use index::{Index, TypedIndexValue};
pub use oid::{Oid, OidComponent, OidPath};
pub use symbol::{NameId, NameTable, Symbol, SymbolDisplay};
pub use types::{NamedBits, NamedNumbers, TypeContent, TypeDescriptor, TypeKind};
pub use value::{parse_binary_payload, parse_decimal, parse_hex_payload, IntegerValue, Value};
