//! mibcodec-core: SMI/SMIv2 MIB compiler and index/OID codec
//!
//! This crate turns MIB modules written in the restricted ASN.1 dialect of
//! SMIv2 into an in-memory catalogue that can resolve symbolic names and
//! object identifiers, describe the syntax of every managed object, and
//! decode SNMP index fragments back into typed values.
//!
//! # Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → events → Builder → MibStore
//!          ^^^^^            ^^^^^^             ^^^^^^^
//!          lexer            parser             builder
//! ```
//!
//! The parser never materialises a parse tree: it drives a [`parser::ModuleListener`]
//! with enter/exit events, and the builder assembles symbols, types and OID
//! paths on an explicit value stack before registering them in the store.
//!
//! At query time, [`smi::Index`] splits a raw OID tail into typed sub-values
//! using the declared row index, the constraint engine and an external
//! primitive-codec registry.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod builder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod smi;
pub mod store;

use builder::ModuleBuilder;
use error::MibError;
use parser::Parser;
use store::MibStore;

/// Compile one MIB module into the store.
///
/// Compile-time failures abort the current module only: assignments already
/// registered by this or previous compiles stay in the store.
///
/// # Errors
///
/// Any of the compile-time [`MibError`] kinds, carrying the source name and
/// the line/column of the offending token.
pub fn compile_module(
    source: &[u8],
    source_name: &str,
    store: &mut MibStore,
) -> Result<(), MibError> {
    let parser = Parser::new(source, source_name)?;
    let mut builder = ModuleBuilder::new(store, source_name);
    parser.parse(&mut builder)
}
