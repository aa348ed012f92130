//! The standard primitive codec set.
//!
//! One decoder per SMI base type, operating on OID sub-index arcs as the
//! core's capability contract requires. Integers pass through, string-like
//! types collect arcs as bytes, `IpAddress` reads exactly four arcs.

use mibcodec_core::error::MibError;
use mibcodec_core::smi::{Codec, CodecRegistry, CodecValue, Constraint, Oid, SmiType};
use std::net::Ipv4Addr;

/// `INTEGER` / `Integer32`: one arc, signed.
pub struct IntegerCodec;

impl Codec for IntegerCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        let arc = single_arc(sub_index)?;
        Ok(CodecValue::Integer(i64::from(arc)))
    }
}

/// `Unsigned32`, `Counter32`, `Counter64`, `Gauge32`, and friends: one arc,
/// unsigned.
pub struct UnsignedCodec;

impl Codec for UnsignedCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        let arc = single_arc(sub_index)?;
        Ok(CodecValue::Unsigned(u64::from(arc)))
    }
}

/// `TimeTicks`: one arc of hundredths of seconds.
pub struct TimeTicksCodec;

impl Codec for TimeTicksCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        let arc = single_arc(sub_index)?;
        Ok(CodecValue::Ticks(u64::from(arc)))
    }
}

/// `OCTET STRING`, `Opaque` and `BIT STRING`: each arc is one byte.
pub struct OctetStringCodec;

impl Codec for OctetStringCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        let bytes = sub_index
            .iter()
            .map(|&arc| u8::try_from(arc))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| MibError::ConstraintViolation {
                oid: sub_index.to_vec(),
            })?;
        Ok(CodecValue::Bytes(bytes))
    }
}

/// `IpAddress`: exactly four arcs, one per octet.
pub struct IpAddressCodec;

impl Codec for IpAddressCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        let octets: [u32; 4] =
            sub_index
                .try_into()
                .map_err(|_| MibError::ConstraintViolation {
                    oid: sub_index.to_vec(),
                })?;
        let mut bytes = [0u8; 4];
        for (byte, &arc) in bytes.iter_mut().zip(&octets) {
            *byte = u8::try_from(arc).map_err(|_| MibError::ConstraintViolation {
                oid: sub_index.to_vec(),
            })?;
        }
        Ok(CodecValue::Ipv4(Ipv4Addr::from(bytes)))
    }

    fn constraint(&self) -> Option<Constraint> {
        Some(Constraint::fixed_size(4))
    }
}

/// `OBJECT IDENTIFIER`: the arcs pass through.
pub struct ObjectIdentifierCodec;

impl Codec for ObjectIdentifierCodec {
    fn decode(&self, sub_index: &[u32]) -> Result<CodecValue, MibError> {
        Ok(CodecValue::Oid(Oid::from_slice(sub_index)))
    }
}

/// `NULL`: decodes to the null value regardless of content.
pub struct NullCodec;

impl Codec for NullCodec {
    fn decode(&self, _sub_index: &[u32]) -> Result<CodecValue, MibError> {
        Ok(CodecValue::Null)
    }
}

fn single_arc(sub_index: &[u32]) -> Result<u32, MibError> {
    match sub_index {
        [arc] => Ok(*arc),
        _ => Err(MibError::ConstraintViolation {
            oid: sub_index.to_vec(),
        }),
    }
}

/// Build a registry with the full standard codec set.
#[must_use]
pub fn standard_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register(SmiType::Integer, Box::new(IntegerCodec));
    registry.register(SmiType::Unsigned32, Box::new(UnsignedCodec));
    registry.register(SmiType::Counter32, Box::new(UnsignedCodec));
    registry.register(SmiType::Counter64, Box::new(UnsignedCodec));
    registry.register(SmiType::Gauge32, Box::new(UnsignedCodec));
    registry.register(SmiType::TimeTicks, Box::new(TimeTicksCodec));
    registry.register(SmiType::OctetString, Box::new(OctetStringCodec));
    registry.register(SmiType::BitString, Box::new(OctetStringCodec));
    registry.register(SmiType::Opaque, Box::new(OctetStringCodec));
    registry.register(SmiType::IpAddress, Box::new(IpAddressCodec));
    registry.register(SmiType::ObjectIdentifier, Box::new(ObjectIdentifierCodec));
    registry.register(SmiType::Null, Box::new(NullCodec));
    registry
}
