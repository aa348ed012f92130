//! End-to-end tests: directory load, standard codecs, index decoding.

use mibcodec_core::smi::{CodecValue, Index, Oid, Symbol};
use mibcodec_core::store::MibStore;
use mibcodec_std::codecs::standard_registry;
use mibcodec_std::{cache, load_directory};
use std::fs;
use std::net::Ipv4Addr;

const ADDR_MIB: &str = r#"
ADDR-MIB DEFINITIONS ::= BEGIN

IMPORTS
    OBJECT-TYPE, IpAddress, Integer32
        FROM SNMPv2-SMI;

addrMib OBJECT IDENTIFIER ::= { 1 3 6 1 4 1 4242 }

AddrEntry ::= SEQUENCE {
    addrIf      Integer32,
    addrValue   IpAddress
}

addrTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF AddrEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Table of addresses."
    ::= { addrMib 1 }

addrEntry OBJECT-TYPE
    SYNTAX      AddrEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "One row."
    INDEX       { addrIf, addrValue }
    ::= { addrTable 1 }

addrIf OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Interface index."
    ::= { addrEntry 1 }

addrValue OBJECT-TYPE
    SYNTAX      IpAddress
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The address."
    ::= { addrEntry 2 }

END
"#;

const BASE_MIB: &str = r#"
SNMPv2-SMI DEFINITIONS ::= BEGIN
internet OBJECT IDENTIFIER ::= { iso org(3) dod(6) 1 }
END
"#;

fn sym(store: &MibStore, module: &str, name: &str) -> Symbol {
    Symbol {
        module: store.names().find(module).unwrap(),
        name: store.names().find(name).unwrap(),
    }
}

fn loaded_store() -> MibStore {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("SNMPv2-SMI"), BASE_MIB).unwrap();
    fs::write(dir.path().join("ADDR-MIB"), ADDR_MIB).unwrap();

    let mut store = MibStore::new();
    let report = load_directory(dir.path(), &mut store).unwrap();
    assert!(report.is_clean(), "failures: {:?}", report.failed);
    store
}

#[test]
fn test_numeric_oids_linked() {
    let store = loaded_store();
    let entry = sym(&store, "ADDR-MIB", "addrEntry");
    assert_eq!(
        store.numeric_oid(entry).unwrap().unwrap().arcs(),
        &[1, 3, 6, 1, 4, 1, 4242, 1, 1]
    );
}

#[test]
fn test_reverse_lookup() {
    let store = loaded_store();
    let oid = Oid::from_slice(&[1, 3, 6, 1, 4, 1, 4242, 1, 1, 2, 7, 10, 0, 0, 1]);
    let (s, residue) = store.symbol_for_oid(&oid).unwrap();
    assert_eq!(store.names().get(s.name), "addrValue");
    assert_eq!(residue, vec![7, 10, 0, 0, 1]);
}

#[test]
fn test_index_decoding_with_standard_codecs() {
    let store = loaded_store();
    let registry = standard_registry();

    let row = sym(&store, "ADDR-MIB", "addrEntry");
    let index = Index::for_row(&store, row).unwrap();

    // Row key: interface 7, address 10.0.0.1.
    let values = index
        .resolve(&[7, 10, 0, 0, 1], &store, &registry)
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].value, CodecValue::Integer(7));
    assert_eq!(
        values[1].value,
        CodecValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1))
    );
}

#[test]
fn test_cache_round_trip_preserves_queries() {
    let store = loaded_store();
    let bytes = cache::serialize_store(&store, None);
    let restored = cache::deserialize_store(&bytes, None).unwrap();

    let entry = sym(&restored, "ADDR-MIB", "addrEntry");
    assert_eq!(
        restored.numeric_oid(entry).unwrap().unwrap().arcs(),
        &[1, 3, 6, 1, 4, 1, 4242, 1, 1]
    );

    let registry = standard_registry();
    let index = Index::for_row(&restored, entry).unwrap();
    let values = index
        .resolve(&[7, 10, 0, 0, 1], &restored, &registry)
        .unwrap();
    assert_eq!(values[0].value, CodecValue::Integer(7));
}
