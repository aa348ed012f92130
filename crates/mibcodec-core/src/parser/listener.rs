//! The event surface between parser and builder.
//!
//! The parser recognises the grammar and narrates it as enter/exit events;
//! a [`ModuleListener`] assembles semantics from them. The listener never
//! sees tokens or a parse tree, only rule boundaries and the small payloads
//! the grammar provides at each one. Every event is fallible: a listener
//! error aborts the module being compiled.

use crate::error::{Location, MibError};
use alloc::string::String;
use alloc::vec::Vec;

/// Which builtin type sub-rule fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinKind {
    /// `INTEGER`
    Integer,
    /// `OCTET STRING`
    OctetString,
    /// `BIT STRING`
    BitString,
    /// `BITS`
    Bits,
    /// `OBJECT IDENTIFIER`
    ObjectIdentifier,
    /// `NULL`
    Null,
    /// `SEQUENCE { … }`
    Sequence,
    /// `SEQUENCE OF …`
    SequenceOf,
    /// `CHOICE { … }`
    Choice,
}

/// Discriminant of the type rule that is being entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeHint<'a> {
    /// A builtin type.
    Builtin(BuiltinKind),
    /// A reference to a named type.
    Referenced(&'a str),
}

/// One component of an OID value, as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawOidComponent<'a> {
    /// A bare number.
    Number(u32),
    /// A bare name.
    Name(&'a str),
    /// The `name(number)` form.
    Named(&'a str, u32),
}

/// An integer literal in one of the three source forms.
///
/// Hex and binary carry the digit payload between the quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerLiteral<'a> {
    /// Decimal, possibly negative.
    Decimal(&'a str),
    /// Hexadecimal payload of a `'…'H` literal.
    Hex(&'a str),
    /// Binary payload of a `'…'B` literal.
    Binary(&'a str),
}

/// How the value of a macro attribute is delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributePayload<'a> {
    /// A single identifier (ENTERPRISE, GROUP, OBJECT, SUPPORTS, VARIATION, MODULE).
    Identifier(&'a str),
    /// A raw identifier list (INCLUDES, MANDATORY-GROUPS, VARIABLES,
    /// NOTIFICATIONS, AUGMENTS).
    NameList(Vec<String>),
    /// The trailing run of values on the stack (OBJECTS).
    Objects,
    /// The trailing run of referenced types on the stack (INDEX).
    Index,
    /// A single value or type on the stack (SYNTAX, DEFVAL, DESCRIPTION, …).
    FromStack,
    /// No value (MODULE referring to the current module).
    Empty,
}

/// Streaming listener over the module grammar.
///
/// Methods are grouped the way the grammar nests: module scaffolding,
/// assignments, values, macro attributes, types and constraints.
#[allow(unused_variables)]
pub trait ModuleListener {
    /// A module definition has been entered.
    fn enter_module(&mut self, name: &str, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// The module's `END` has been reached.
    fn exit_module(&mut self) -> Result<(), MibError> {
        Ok(())
    }

    /// One `symbols FROM module` group of the IMPORTS clause.
    fn import_symbols(&mut self, from_module: &str, symbols: &[String]) -> Result<(), MibError> {
        Ok(())
    }

    /// An assignment's name has been read.
    fn enter_assignment(&mut self, name: &str) -> Result<(), MibError> {
        Ok(())
    }

    /// A macro instance with an OID value is being assembled.
    fn enter_complex_assignment(&mut self, macro_name: &str) -> Result<(), MibError> {
        Ok(())
    }
    /// End of the macro instance; its OID value is on the stack.
    fn exit_complex_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// A TRAP-TYPE instance is being assembled.
    fn enter_trap_type_assignment(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// End of the TRAP-TYPE; its trap number is on the stack.
    fn exit_trap_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// An OBJECT-TYPE instance is being assembled.
    fn enter_object_type_assignment(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// End of the OBJECT-TYPE; its OID value is on the stack.
    fn exit_object_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// A TEXTUAL-CONVENTION is being assembled.
    fn enter_textual_convention_assignment(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// End of the TEXTUAL-CONVENTION; it has no terminal value.
    fn exit_textual_convention_assignment(&mut self, location: &Location)
        -> Result<(), MibError> {
        Ok(())
    }

    /// End of a `Name ::= type` assignment; the type is on the stack.
    fn exit_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// End of a `name type ::= value` assignment; type and value are on the
    /// stack.
    fn exit_value_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// An `{ objIdComponents+ }` value.
    fn oid_value(&mut self, components: &[RawOidComponent<'_>]) -> Result<(), MibError> {
        Ok(())
    }

    /// A boolean value.
    fn boolean_value(&mut self, value: bool) -> Result<(), MibError> {
        Ok(())
    }

    /// An integer value in any literal form.
    fn integer_value(
        &mut self,
        literal: IntegerLiteral<'_>,
        location: &Location,
    ) -> Result<(), MibError> {
        Ok(())
    }

    /// A quoted string value, without its quotes.
    fn string_value(&mut self, value: &str) -> Result<(), MibError> {
        Ok(())
    }

    /// A value that names another declaration.
    fn reference_value(&mut self, name: &str) -> Result<(), MibError> {
        Ok(())
    }

    /// End of one macro attribute.
    fn exit_macro_attribute(
        &mut self,
        name: &str,
        payload: AttributePayload<'_>,
        location: &Location,
    ) -> Result<(), MibError> {
        Ok(())
    }

    /// An ACCESS, MAX-ACCESS or MIN-ACCESS attribute.
    fn access_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
        Ok(())
    }

    /// A STATUS attribute.
    fn status_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
        Ok(())
    }

    /// A type rule is being entered.
    fn enter_type(&mut self, hint: TypeHint<'_>) -> Result<(), MibError> {
        Ok(())
    }
    /// The type rule (including any trailing constraint) is complete.
    fn exit_type(&mut self) -> Result<(), MibError> {
        Ok(())
    }

    /// A SEQUENCE field list is being entered.
    fn enter_sequence_type(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// The SEQUENCE field list is complete; one type per field name is on
    /// the stack.
    fn exit_sequence_type(
        &mut self,
        field_names: &[String],
        location: &Location,
    ) -> Result<(), MibError> {
        Ok(())
    }

    /// A CHOICE alternative list is being entered.
    fn enter_choice_type(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// The CHOICE alternative list is complete.
    fn exit_choice_type(
        &mut self,
        field_names: &[String],
        location: &Location,
    ) -> Result<(), MibError> {
        Ok(())
    }

    /// A SEQUENCE OF element type is complete; it is on the stack.
    fn exit_sequence_of_type(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }

    /// Named numbers of an INTEGER (or refined referenced) type.
    fn integer_names(&mut self, names: &[(String, i64)]) -> Result<(), MibError> {
        Ok(())
    }

    /// Named bit positions of a BITS type.
    fn bits_names(&mut self, bits: &[(String, u32)]) -> Result<(), MibError> {
        Ok(())
    }

    /// A constraint is being entered; `is_size` selects `SIZE(…)`.
    fn enter_constraint(&mut self, is_size: bool) -> Result<(), MibError> {
        Ok(())
    }
    /// The constraint is complete and should be normalised.
    fn exit_constraint(&mut self) -> Result<(), MibError> {
        Ok(())
    }
    /// One element group is complete; its one or two integers are on the
    /// stack.
    fn exit_constraint_elements(&mut self, location: &Location) -> Result<(), MibError> {
        Ok(())
    }
}
