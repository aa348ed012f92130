//! The primitive-codec capability contract.
//!
//! The core does not know how SMI primitives are represented; it only asks
//! a registered [`Codec`] to turn an OID sub-index into a value, and for
//! the intrinsic constraint of the primitive when the declared syntax has
//! none. The standard codec set lives outside this crate.

use super::constraint::Constraint;
use super::oid::Oid;
use crate::error::MibError;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// SMI base types a codec can be registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmiType {
    /// `INTEGER` / `Integer32`.
    Integer,
    /// `Unsigned32`.
    Unsigned32,
    /// `Counter32` (`Counter` in SMIv1).
    Counter32,
    /// `Counter64`.
    Counter64,
    /// `Gauge32` (`Gauge` in SMIv1).
    Gauge32,
    /// `IpAddress` (`NetworkAddress` in SMIv1).
    IpAddress,
    /// `OCTET STRING`.
    OctetString,
    /// `BIT STRING`.
    BitString,
    /// `OBJECT IDENTIFIER`.
    ObjectIdentifier,
    /// `Opaque`.
    Opaque,
    /// `TimeTicks`.
    TimeTicks,
    /// `NULL`.
    Null,
}

impl SmiType {
    /// The canonical type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Unsigned32 => "Unsigned32",
            Self::Counter32 => "Counter32",
            Self::Counter64 => "Counter64",
            Self::Gauge32 => "Gauge32",
            Self::IpAddress => "IpAddress",
            Self::OctetString => "OctetString",
            Self::BitString => "BitString",
            Self::ObjectIdentifier => "ObjectIdentifier",
            Self::Opaque => "Opaque",
            Self::TimeTicks => "TimeTicks",
            Self::Null => "Null",
        }
    }

    /// Map a referenced type name to a base type, accepting the SMIv1
    /// aliases that standard modules re-export.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let t = match name {
            "INTEGER" | "Integer32" => Self::Integer,
            "Unsigned32" => Self::Unsigned32,
            "Counter32" | "Counter" => Self::Counter32,
            "Counter64" => Self::Counter64,
            "Gauge32" | "Gauge" => Self::Gauge32,
            "IpAddress" | "NetworkAddress" => Self::IpAddress,
            "OctetString" => Self::OctetString,
            "Opaque" => Self::Opaque,
            "BitString" => Self::BitString,
            "ObjectIdentifier" => Self::ObjectIdentifier,
            "TimeTicks" => Self::TimeTicks,
            "Null" | "NULL" => Self::Null,
            _ => return None,
        };
        Some(t)
    }
}

/// A value decoded from an OID sub-index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecValue {
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer (counters, gauges, Unsigned32).
    Unsigned(u64),
    /// Raw bytes (octet strings, opaque, bit strings).
    Bytes(Vec<u8>),
    /// An IPv4 address.
    Ipv4(core::net::Ipv4Addr),
    /// An object identifier.
    Oid(Oid),
    /// Hundredths of seconds.
    Ticks(u64),
    /// The NULL value.
    Null,
}

impl CodecValue {
    /// The signed integer payload, if numeric.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Unsigned(v) | Self::Ticks(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// Capability contract for one SMI primitive.
pub trait Codec {
    /// Decode an extracted sub-index into a value.
    ///
    /// # Errors
    ///
    /// [`MibError::ConstraintViolation`] when the sub-index does not have
    /// the shape the primitive requires.
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError>;

    /// The intrinsic constraint of the primitive, if it has one.
    ///
    /// Applied during index resolution when the declared syntax carries no
    /// constraint of its own.
    fn constraint(&self) -> Option<Constraint> {
        None
    }
}

/// Capability table: one codec per SMI base type.
#[derive(Default)]
pub struct CodecRegistry {
    codecs: BTreeMap<SmiType, Box<dyn Codec>>,
}

impl CodecRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec for a base type, replacing any previous one.
    pub fn register(&mut self, smi_type: SmiType, codec: Box<dyn Codec>) {
        self.codecs.insert(smi_type, codec);
    }

    /// Get the codec for a base type.
    ///
    /// # Errors
    ///
    /// [`MibError::UnknownSmiType`] when no codec is registered.
    pub fn get(&self, smi_type: SmiType) -> Result<&dyn Codec, MibError> {
        self.codecs
            .get(&smi_type)
            .map(|codec| codec.as_ref())
            .ok_or_else(|| MibError::UnknownSmiType {
                name: String::from(smi_type.as_str()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullCodec;

    impl Codec for NullCodec {
        fn decode(&self, _sub_index: &[u32]) -> Result<CodecValue, MibError> {
            Ok(CodecValue::Null)
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SmiType::from_name("Integer32"), Some(SmiType::Integer));
        assert_eq!(SmiType::from_name("Counter"), Some(SmiType::Counter32));
        assert_eq!(
            SmiType::from_name("NetworkAddress"),
            Some(SmiType::IpAddress)
        );
        assert_eq!(SmiType::from_name("DisplayString"), None);
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = CodecRegistry::new();
        registry.register(SmiType::Null, Box::new(NullCodec));
        assert!(registry.get(SmiType::Null).is_ok());
        assert!(matches!(
            registry.get(SmiType::Counter64),
            Err(MibError::UnknownSmiType { .. })
        ));
    }
}
