//! The semantic builder.
//!
//! A pushdown machine listening to parse events. All intermediate state
//! lives on one explicit stack of heterogeneous [`StackFrame`]s; each event
//! pushes, replaces or pops frames, and completed assignments are handed to
//! the store as their rules exit.

use crate::error::{Location, MibError};
use crate::parser::{
    AttributePayload, BuiltinKind, IntegerLiteral, ModuleListener, RawOidComponent, TypeHint,
};
use crate::smi::{
    parse_binary_payload, parse_decimal, parse_hex_payload, AttributeBag, AttributeValue,
    Constraint, Element, NameId, NamedBits, NamedNumbers, OidComponent, OidPath, Symbol,
    TypeContent, TypeDescriptor, TypeKind, Value,
};
use crate::store::MibStore;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A macro instance under construction.
#[derive(Debug)]
pub struct MacroBag {
    /// The macro name (`OBJECT-TYPE`, `MODULE-IDENTITY`, …).
    pub macro_name: String,
    /// Attributes collected so far.
    pub attributes: AttributeBag,
}

impl MacroBag {
    fn new(macro_name: &str) -> Self {
        Self {
            macro_name: macro_name.into(),
            attributes: AttributeBag::new(),
        }
    }
}

/// One frame of the builder's value stack.
#[derive(Debug)]
pub enum StackFrame {
    /// A resolved assignment name.
    Symbol(Symbol),
    /// A type under construction.
    Type(TypeDescriptor),
    /// A terminal value.
    Value(Value),
    /// A macro attribute bag.
    Bag(MacroBag),
    /// A constraint under construction.
    Constraint(Constraint),
    /// Bounds the alternatives of a CHOICE.
    ChoiceMark,
}

/// Builds store entries from parse events.
pub struct ModuleBuilder<'a> {
    store: &'a mut MibStore,
    stack: Vec<StackFrame>,
    /// Import map of the module being compiled: name → source module.
    imported_from: BTreeMap<String, String>,
    current_module: String,
    current_module_id: Option<NameId>,
    /// Most recent location reported by the parser, for frame-shape errors.
    location: Location,
}

impl<'a> ModuleBuilder<'a> {
    /// Create a builder registering into the given store.
    pub fn new(store: &'a mut MibStore, source_name: &str) -> Self {
        Self {
            store,
            stack: Vec::new(),
            imported_from: BTreeMap::new(),
            current_module: String::new(),
            current_module_id: None,
            location: Location::new(source_name, 0, 0),
        }
    }

    /// Resolve a name against the import map, defaulting to the current
    /// module.
    fn resolve_symbol(&mut self, name: &str) -> Symbol {
        let module = self
            .imported_from
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.current_module.clone());
        self.store.symbol(&module, name)
    }

    fn invalid(&self, message: &str) -> MibError {
        MibError::InvalidAssignment {
            message: message.into(),
            location: self.location.clone(),
        }
    }

    // === Stack discipline ===

    fn pop(&mut self) -> Result<StackFrame, MibError> {
        self.stack
            .pop()
            .ok_or_else(|| self.invalid("value stack underflow"))
    }

    fn pop_value(&mut self) -> Result<Value, MibError> {
        match self.pop()? {
            StackFrame::Value(v) => Ok(v),
            _ => Err(self.invalid("expected a value on the stack")),
        }
    }

    fn pop_type(&mut self) -> Result<TypeDescriptor, MibError> {
        match self.pop()? {
            StackFrame::Type(td) => Ok(td),
            _ => Err(self.invalid("expected a type on the stack")),
        }
    }

    fn pop_symbol(&mut self) -> Result<Symbol, MibError> {
        match self.pop()? {
            StackFrame::Symbol(s) => Ok(s),
            _ => Err(self.invalid("expected an assignment name on the stack")),
        }
    }

    fn pop_bag(&mut self) -> Result<MacroBag, MibError> {
        match self.pop()? {
            StackFrame::Bag(bag) => Ok(bag),
            _ => Err(self.invalid("expected a macro bag on the stack")),
        }
    }

    fn pop_oid_path(&mut self) -> Result<OidPath, MibError> {
        match self.pop_value()? {
            Value::Oid(path) => Ok(path),
            _ => Err(self.invalid("expected an OID value")),
        }
    }

    fn top_type(&mut self) -> Result<&mut TypeDescriptor, MibError> {
        match self.stack.last_mut() {
            Some(StackFrame::Type(td)) => Ok(td),
            _ => Err(MibError::InvalidAssignment {
                message: "expected a type on the stack".into(),
                location: self.location.clone(),
            }),
        }
    }

    fn top_bag(&mut self) -> Result<&mut MacroBag, MibError> {
        match self.stack.last_mut() {
            Some(StackFrame::Bag(bag)) => Ok(bag),
            _ => Err(MibError::InvalidAssignment {
                message: "attribute outside a macro".into(),
                location: self.location.clone(),
            }),
        }
    }

    /// Store an attribute on the bag at the top of the stack.
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> Result<(), MibError> {
        let name_id = self.store.intern(name);
        let bag = self.top_bag()?;
        bag.attributes.set(name_id, value);
        Ok(())
    }
}

impl ModuleListener for ModuleBuilder<'_> {
    fn enter_module(&mut self, name: &str, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        self.current_module = name.into();
        self.imported_from.clear();
        self.stack.clear();
        self.current_module_id = Some(self.store.new_module(name)?);
        Ok(())
    }

    fn exit_module(&mut self) -> Result<(), MibError> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(self.invalid("leftover frames at module end"))
        }
    }

    fn import_symbols(&mut self, from_module: &str, symbols: &[String]) -> Result<(), MibError> {
        let from = self.store.intern(from_module);
        for symbol in symbols {
            self.imported_from
                .insert(symbol.clone(), from_module.into());
            let name = self.store.intern(symbol);
            if let Some(module) = self.current_module_id {
                self.store.add_import(module, name, from);
            }
        }
        Ok(())
    }

    fn enter_assignment(&mut self, name: &str) -> Result<(), MibError> {
        let sym = self.resolve_symbol(name);
        self.stack.push(StackFrame::Symbol(sym));
        Ok(())
    }

    fn enter_complex_assignment(&mut self, macro_name: &str) -> Result<(), MibError> {
        self.stack.push(StackFrame::Bag(MacroBag::new(macro_name)));
        Ok(())
    }

    fn exit_complex_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let oid = self.pop_oid_path()?;
        let bag = self.pop_bag()?;
        let sym = self.pop_symbol()?;
        self.store
            .add_macro_value(sym, &bag.macro_name, bag.attributes, oid)
    }

    fn enter_trap_type_assignment(&mut self) -> Result<(), MibError> {
        self.stack
            .push(StackFrame::Bag(MacroBag::new("TRAP-TYPE")));
        Ok(())
    }

    fn exit_trap_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let value = self.pop_value()?;
        let bag = self.pop_bag()?;
        let sym = self.pop_symbol()?;
        self.store
            .add_trap_type(sym, &bag.macro_name, bag.attributes, value)
    }

    fn enter_object_type_assignment(&mut self) -> Result<(), MibError> {
        self.stack
            .push(StackFrame::Bag(MacroBag::new("OBJECT-TYPE")));
        Ok(())
    }

    fn exit_object_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let oid = self.pop_oid_path()?;
        let bag = self.pop_bag()?;
        let sym = self.pop_symbol()?;
        self.store.add_object_type(sym, bag.attributes, oid)
    }

    fn enter_textual_convention_assignment(&mut self) -> Result<(), MibError> {
        self.stack
            .push(StackFrame::Bag(MacroBag::new("TEXTUAL-CONVENTION")));
        Ok(())
    }

    fn exit_textual_convention_assignment(
        &mut self,
        location: &Location,
    ) -> Result<(), MibError> {
        self.location = location.clone();
        let bag = self.pop_bag()?;
        let sym = self.pop_symbol()?;
        self.store.add_textual_convention(sym, bag.attributes)
    }

    fn exit_type_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let td = self.pop_type()?;
        let sym = self.pop_symbol()?;
        self.store.add_type(sym, td)
    }

    fn exit_value_assignment(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let value = self.pop_value()?;
        let syntax = self.pop_type()?;
        let sym = self.pop_symbol()?;
        self.store.add_value(sym, syntax, value)
    }

    // === Values ===

    fn oid_value(&mut self, components: &[RawOidComponent<'_>]) -> Result<(), MibError> {
        let mut path = Vec::with_capacity(components.len());
        for component in components {
            let resolved = match *component {
                RawOidComponent::Number(n) => OidComponent::Number(n),
                RawOidComponent::Name(name) => OidComponent::Symbol(self.resolve_symbol(name)),
                RawOidComponent::Named(name, n) => {
                    OidComponent::Named(self.resolve_symbol(name), n)
                }
            };
            path.push(resolved);
        }
        self.stack
            .push(StackFrame::Value(Value::Oid(OidPath::new(path))));
        Ok(())
    }

    fn boolean_value(&mut self, value: bool) -> Result<(), MibError> {
        self.stack.push(StackFrame::Value(Value::Boolean(value)));
        Ok(())
    }

    fn integer_value(
        &mut self,
        literal: IntegerLiteral<'_>,
        location: &Location,
    ) -> Result<(), MibError> {
        self.location = location.clone();
        let parsed = match literal {
            IntegerLiteral::Decimal(text) => parse_decimal(text),
            IntegerLiteral::Hex(payload) => parse_hex_payload(payload),
            IntegerLiteral::Binary(payload) => parse_binary_payload(payload),
        };
        let value = parsed.ok_or_else(|| MibError::Lex {
            message: "bad number literal".into(),
            location: location.clone(),
        })?;
        self.stack.push(StackFrame::Value(Value::Integer(value)));
        Ok(())
    }

    fn string_value(&mut self, value: &str) -> Result<(), MibError> {
        self.stack
            .push(StackFrame::Value(Value::String(value.into())));
        Ok(())
    }

    fn reference_value(&mut self, name: &str) -> Result<(), MibError> {
        let sym = self.resolve_symbol(name);
        self.stack.push(StackFrame::Value(Value::Reference(sym)));
        Ok(())
    }

    // === Macro attributes ===

    fn exit_macro_attribute(
        &mut self,
        name: &str,
        payload: AttributePayload<'_>,
        location: &Location,
    ) -> Result<(), MibError> {
        self.location = location.clone();
        let value = match payload {
            AttributePayload::Identifier(id) => {
                let sym = self.resolve_symbol(id);
                AttributeValue::Symbol(sym)
            }
            AttributePayload::NameList(names) => AttributeValue::Names(names),
            AttributePayload::Objects => {
                // Contiguous run of values below the top of the stack.
                let mut values = Vec::new();
                while matches!(self.stack.last(), Some(StackFrame::Value(_))) {
                    values.push(self.pop_value()?);
                }
                values.reverse();
                AttributeValue::Values(values)
            }
            AttributePayload::Index => {
                // Contiguous run of referenced types; declaration order is
                // restored by prepending as we pop.
                let mut symbols = Vec::new();
                while matches!(self.stack.last(), Some(StackFrame::Type(_))) {
                    let td = self.pop_type()?;
                    if let Some(sym) = td.reference {
                        symbols.insert(0, sym);
                    }
                }
                AttributeValue::Index(symbols)
            }
            AttributePayload::FromStack => match self.stack.last() {
                Some(StackFrame::Value(_)) => match self.pop_value()? {
                    Value::String(s) => AttributeValue::String(s),
                    other => AttributeValue::Value(other),
                },
                Some(StackFrame::Type(_)) => AttributeValue::Syntax(self.pop_type()?),
                _ => return Err(self.invalid("attribute value missing from the stack")),
            },
            AttributePayload::Empty => return Ok(()),
        };
        self.set_attribute(name, value)
    }

    fn access_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
        self.set_attribute(name, AttributeValue::String(value.into()))
    }

    fn status_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
        self.set_attribute(name, AttributeValue::String(value.into()))
    }

    // === Types ===

    fn enter_type(&mut self, hint: TypeHint<'_>) -> Result<(), MibError> {
        let td = match hint {
            TypeHint::Builtin(kind) => TypeDescriptor::new(match kind {
                BuiltinKind::Integer => TypeKind::Integer,
                BuiltinKind::OctetString => TypeKind::OctetString,
                BuiltinKind::BitString => TypeKind::BitString,
                BuiltinKind::Bits => TypeKind::Bits,
                BuiltinKind::ObjectIdentifier => TypeKind::ObjectIdentifier,
                BuiltinKind::Null => TypeKind::Null,
                BuiltinKind::Sequence => TypeKind::Sequence,
                BuiltinKind::SequenceOf => TypeKind::SequenceOf,
                BuiltinKind::Choice => TypeKind::Choice,
            }),
            TypeHint::Referenced(name) => {
                let sym = self.resolve_symbol(name);
                TypeDescriptor::referenced(sym)
            }
        };
        self.stack.push(StackFrame::Type(td));
        Ok(())
    }

    fn exit_type(&mut self) -> Result<(), MibError> {
        if matches!(self.stack.last(), Some(StackFrame::Constraint(_))) {
            let constraint = match self.pop()? {
                StackFrame::Constraint(c) => c,
                _ => unreachable!("just matched a constraint frame"),
            };
            self.top_type()?.constraint = Some(constraint);
        }
        Ok(())
    }

    fn enter_sequence_type(&mut self) -> Result<(), MibError> {
        self.top_type()?.kind = TypeKind::Sequence;
        Ok(())
    }

    fn exit_sequence_type(
        &mut self,
        field_names: &[String],
        location: &Location,
    ) -> Result<(), MibError> {
        self.location = location.clone();
        let mut popped = Vec::with_capacity(field_names.len());
        for _ in field_names {
            popped.push(self.pop_type()?);
        }
        let mut fields = Vec::with_capacity(field_names.len());
        for name in field_names {
            let sym = self.resolve_symbol(name);
            let td = popped.pop().ok_or_else(|| self.invalid("field count mismatch"))?;
            fields.push((sym, Some(td)));
        }
        self.top_type()?.content = Some(TypeContent::Fields(fields));
        Ok(())
    }

    fn enter_choice_type(&mut self) -> Result<(), MibError> {
        self.top_type()?.kind = TypeKind::Choice;
        self.stack.push(StackFrame::ChoiceMark);
        Ok(())
    }

    fn exit_choice_type(
        &mut self,
        field_names: &[String],
        location: &Location,
    ) -> Result<(), MibError> {
        self.location = location.clone();
        let mut popped = Vec::new();
        loop {
            match self.stack.last() {
                Some(StackFrame::ChoiceMark) => {
                    self.stack.pop();
                    break;
                }
                Some(StackFrame::Type(_)) => popped.push(self.pop_type()?),
                _ => return Err(self.invalid("unbounded CHOICE alternatives")),
            }
        }
        if popped.len() != field_names.len() {
            return Err(self.invalid("CHOICE alternative count mismatch"));
        }
        let mut fields = Vec::with_capacity(field_names.len());
        for name in field_names {
            let sym = self.resolve_symbol(name);
            let td = popped.pop().ok_or_else(|| self.invalid("field count mismatch"))?;
            fields.push((sym, Some(td)));
        }
        self.top_type()?.content = Some(TypeContent::Fields(fields));
        Ok(())
    }

    fn exit_sequence_of_type(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        let element = self.pop_type()?;
        self.top_type()?.content = Some(TypeContent::Element(Box::new(element)));
        Ok(())
    }

    fn integer_names(&mut self, names: &[(String, i64)]) -> Result<(), MibError> {
        let values: Vec<(i64, NameId)> = names
            .iter()
            .map(|(name, value)| (*value, self.store.intern(name)))
            .collect();
        self.top_type()?.names = Some(NamedNumbers::new(values));
        Ok(())
    }

    fn bits_names(&mut self, bits: &[(String, u32)]) -> Result<(), MibError> {
        let bits: Vec<(NameId, u32)> = bits
            .iter()
            .map(|(name, position)| (self.store.intern(name), *position))
            .collect();
        self.top_type()?.bits = Some(NamedBits::new(bits));
        Ok(())
    }

    // === Constraints ===

    fn enter_constraint(&mut self, is_size: bool) -> Result<(), MibError> {
        self.stack
            .push(StackFrame::Constraint(Constraint::new(is_size)));
        Ok(())
    }

    fn exit_constraint(&mut self) -> Result<(), MibError> {
        match self.stack.last_mut() {
            Some(StackFrame::Constraint(c)) => {
                c.finish();
                Ok(())
            }
            _ => Err(self.invalid("constraint missing from the stack")),
        }
    }

    fn exit_constraint_elements(&mut self, location: &Location) -> Result<(), MibError> {
        self.location = location.clone();
        // Pop order is high-then-low.
        let mut bounds = Vec::with_capacity(2);
        while matches!(self.stack.last(), Some(StackFrame::Value(Value::Integer(_)))) {
            let value = match self.pop_value()? {
                Value::Integer(v) => v,
                _ => unreachable!("just matched an integer frame"),
            };
            let value = value
                .as_i64()
                .ok_or_else(|| self.invalid("constraint bound out of range"))?;
            bounds.push(value);
        }
        let element = match bounds.as_slice() {
            [single] => Element::single(*single),
            [high, low, ..] => Element::range(*low, *high),
            [] => return Err(self.invalid("constraint element without bounds")),
        };
        match self.stack.last_mut() {
            Some(StackFrame::Constraint(c)) => {
                c.push(element);
                Ok(())
            }
            _ => Err(self.invalid("constraint missing from the stack")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_module;
    use crate::smi::{IntegerValue, TypeKind};
    use crate::store::Resolved;
    use alloc::string::ToString;

    fn compile(source: &str, store: &mut MibStore) -> Result<(), MibError> {
        compile_module(source.as_bytes(), "test", store)
    }

    #[test]
    fn test_plain_oid_assignment() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN foo OBJECT IDENTIFIER ::= { 1 3 6 } END",
            &mut store,
        )
        .unwrap();
        let foo = store.symbol("M", "foo");
        assert_eq!(store.numeric_oid(foo).unwrap().unwrap().arcs(), &[1, 3, 6]);
    }

    #[test]
    fn test_oid_through_parent() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             foo OBJECT IDENTIFIER ::= { 1 3 6 } \
             bar OBJECT IDENTIFIER ::= { foo 7 } END",
            &mut store,
        )
        .unwrap();
        let bar = store.symbol("M", "bar");
        assert_eq!(
            store.numeric_oid(bar).unwrap().unwrap().arcs(),
            &[1, 3, 6, 7]
        );
    }

    #[test]
    fn test_named_oid_components() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             internet OBJECT IDENTIFIER ::= { iso org(3) dod(6) 1 } END",
            &mut store,
        )
        .unwrap();
        let internet = store.symbol("M", "internet");
        assert_eq!(
            store.numeric_oid(internet).unwrap().unwrap().arcs(),
            &[1, 3, 6, 1]
        );
    }

    #[test]
    fn test_type_assignment_with_enum() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             Status ::= INTEGER { up(1), down(2) } END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "Status");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        assert_eq!(td.kind, TypeKind::Integer);
        let names = td.names.as_ref().unwrap();
        let up = store.names().find("up").unwrap();
        assert_eq!(names.label(1), Some(up));
    }

    #[test]
    fn test_integer_value_fitting() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             small INTEGER ::= 5 \
             wide INTEGER ::= 70000 END",
            &mut store,
        )
        .unwrap();
        let small = store.symbol("M", "small");
        let Some(Resolved::Value(entry)) = store.resolve(small) else {
            panic!("expected a value");
        };
        assert_eq!(entry.value.as_integer(), Some(IntegerValue::I8(5)));

        let wide = store.symbol("M", "wide");
        let Some(Resolved::Value(entry)) = store.resolve(wide) else {
            panic!("expected a value");
        };
        assert_eq!(entry.value.as_integer(), Some(IntegerValue::I32(70_000)));
    }

    #[test]
    fn test_hex_value() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN mask INTEGER ::= 'FF00'H END",
            &mut store,
        )
        .unwrap();
        let mask = store.symbol("M", "mask");
        let Some(Resolved::Value(entry)) = store.resolve(mask) else {
            panic!("expected a value");
        };
        assert_eq!(
            entry.value.as_integer(),
            Some(IntegerValue::I32(0xFF00))
        );
    }

    #[test]
    fn test_imported_symbol_resolution() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             IMPORTS mib-2 FROM SNMPv2-SMI; \
             thing OBJECT IDENTIFIER ::= { mib-2 42 } END",
            &mut store,
        )
        .unwrap();
        // The reference must resolve into the exporting module's namespace.
        let thing = store.symbol("M", "thing");
        let Some(Resolved::Value(entry)) = store.resolve(thing) else {
            panic!("expected a value");
        };
        let Value::Oid(path) = &entry.value else {
            panic!("expected an OID value");
        };
        let OidComponent::Symbol(parent) = path.components()[0] else {
            panic!("expected a symbolic component");
        };
        assert_eq!(store.names().get(parent.module), "SNMPv2-SMI");
    }

    #[test]
    fn test_object_type_with_index() {
        let mut store = MibStore::new();
        compile(
            r#"
            M DEFINITIONS ::= BEGIN
            ifEntry OBJECT-TYPE
                SYNTAX IfEntry
                MAX-ACCESS not-accessible
                STATUS current
                INDEX { ifIndex }
                ::= { 1 3 6 1 2 1 2 2 1 }
            END
            "#,
            &mut store,
        )
        .unwrap();
        let entry = store.symbol("M", "ifEntry");
        let index = store.object_index(entry).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(store.names().get(index[0].name), "ifIndex");
    }

    #[test]
    fn test_textual_convention() {
        let mut store = MibStore::new();
        compile(
            r#"
            M DEFINITIONS ::= BEGIN
            DisplayString ::= TEXTUAL-CONVENTION
                DISPLAY-HINT "255a"
                STATUS current
                DESCRIPTION "Printable string."
                SYNTAX OCTET STRING (SIZE (0..255))
            END
            "#,
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "DisplayString");
        let Some(Resolved::TextualConvention(bag)) = store.resolve(sym) else {
            panic!("expected a textual convention");
        };
        let hint = store.names().find("DISPLAY-HINT").unwrap();
        assert_eq!(
            bag.get(hint),
            Some(&AttributeValue::String("255a".into()))
        );
        let syntax = store.names().find("SYNTAX").unwrap();
        let Some(AttributeValue::Syntax(td)) = bag.get(syntax) else {
            panic!("expected a syntax attribute");
        };
        assert_eq!(td.kind, TypeKind::OctetString);
        assert!(td.constraint.as_ref().unwrap().is_size());
    }

    #[test]
    fn test_trap_type() {
        let mut store = MibStore::new();
        compile(
            r#"
            M DEFINITIONS ::= BEGIN
            linkDown TRAP-TYPE
                ENTERPRISE snmp
                VARIABLES { ifIndex }
                DESCRIPTION "A link went down."
                ::= 2
            END
            "#,
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "linkDown");
        let Some(Resolved::TrapType(trap)) = store.resolve(sym) else {
            panic!("expected a trap type");
        };
        assert_eq!(trap.value.as_integer(), Some(IntegerValue::I8(2)));
        let variables = store.names().find("VARIABLES").unwrap();
        assert_eq!(
            trap.attributes.get(variables),
            Some(&AttributeValue::Names(alloc::vec!["ifIndex".to_string()]))
        );
    }

    #[test]
    fn test_module_identity() {
        let mut store = MibStore::new();
        compile(
            r#"
            M DEFINITIONS ::= BEGIN
            m MODULE-IDENTITY
                LAST-UPDATED "9611082155Z"
                ORGANIZATION "Example"
                CONTACT-INFO "nobody"
                DESCRIPTION "A module."
                REVISION "9611082155Z"
                DESCRIPTION "First revision."
                ::= { 1 3 6 1 2 1 31 }
            END
            "#,
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "m");
        let Some(Resolved::Macro(entry)) = store.resolve(sym) else {
            panic!("expected a macro entry");
        };
        assert_eq!(store.names().get(entry.macro_name), "MODULE-IDENTITY");
        // Repeated DESCRIPTION: last one wins.
        let description = store.names().find("DESCRIPTION").unwrap();
        assert_eq!(
            entry.attributes.get(description),
            Some(&AttributeValue::String("First revision.".into()))
        );
    }

    #[test]
    fn test_duplicate_assignment_keeps_first() {
        let mut store = MibStore::new();
        let err = compile(
            "M DEFINITIONS ::= BEGIN \
             x ::= INTEGER \
             x ::= INTEGER END",
            &mut store,
        )
        .unwrap_err();
        assert!(matches!(err, MibError::DuplicateSymbol { .. }));
        // The first definition survives.
        let x = store.symbol("M", "x");
        assert!(matches!(store.resolve(x), Some(Resolved::Type(_))));
    }

    #[test]
    fn test_duplicate_module() {
        let mut store = MibStore::new();
        compile("M DEFINITIONS ::= BEGIN END", &mut store).unwrap();
        let err = compile("M DEFINITIONS ::= BEGIN END", &mut store).unwrap_err();
        assert!(matches!(err, MibError::DuplicateModule { .. }));
    }

    #[test]
    fn test_sequence_fields_in_order() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             IfEntry ::= SEQUENCE { ifIndex INTEGER, ifDescr OCTET STRING } END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "IfEntry");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        let Some(TypeContent::Fields(fields)) = &td.content else {
            panic!("expected fields");
        };
        assert_eq!(store.names().get(fields[0].0.name), "ifIndex");
        assert_eq!(fields[0].1.as_ref().unwrap().kind, TypeKind::Integer);
        assert_eq!(store.names().get(fields[1].0.name), "ifDescr");
        assert_eq!(fields[1].1.as_ref().unwrap().kind, TypeKind::OctetString);
    }

    #[test]
    fn test_choice_fields() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             NetworkAddress ::= CHOICE { internet IpAddress } END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "NetworkAddress");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        assert_eq!(td.kind, TypeKind::Choice);
        let Some(TypeContent::Fields(fields)) = &td.content else {
            panic!("expected fields");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields[0].1.as_ref().unwrap().kind,
            TypeKind::Referenced
        );
    }

    #[test]
    fn test_sequence_of() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN IfTable ::= SEQUENCE OF IfEntry END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "IfTable");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        assert_eq!(td.kind, TypeKind::SequenceOf);
        let Some(TypeContent::Element(inner)) = &td.content else {
            panic!("expected an element type");
        };
        assert_eq!(inner.kind, TypeKind::Referenced);
    }

    #[test]
    fn test_bits_type() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN \
             Flags ::= BITS { alpha(0), beta(1) } END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "Flags");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        assert_eq!(td.kind, TypeKind::Bits);
        let bits = td.bits.as_ref().unwrap();
        let beta = store.names().find("beta").unwrap();
        assert_eq!(bits.label(1), Some(beta));
    }

    #[test]
    fn test_constraint_normalised_on_exit() {
        let mut store = MibStore::new();
        compile(
            "M DEFINITIONS ::= BEGIN T ::= INTEGER (0..10 | 5..20) END",
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "T");
        let Some(Resolved::Type(td)) = store.resolve(sym) else {
            panic!("expected a type");
        };
        let constraint = td.constraint.as_ref().unwrap();
        assert_eq!(constraint.elements(), &[Element::range(0, 20)]);
    }

    #[test]
    fn test_objects_attribute_order() {
        let mut store = MibStore::new();
        compile(
            r#"
            M DEFINITIONS ::= BEGIN
            grp OBJECT-GROUP
                OBJECTS { a, b, c }
                STATUS current
                DESCRIPTION "group"
                ::= { 1 2 3 }
            END
            "#,
            &mut store,
        )
        .unwrap();
        let sym = store.symbol("M", "grp");
        let Some(Resolved::Macro(entry)) = store.resolve(sym) else {
            panic!("expected a macro entry");
        };
        let objects = store.names().find("OBJECTS").unwrap();
        let Some(AttributeValue::Values(values)) = entry.attributes.get(objects) else {
            panic!("expected collected values");
        };
        let labels: Vec<&str> = values
            .iter()
            .map(|v| match v {
                Value::Reference(s) => store.names().get(s.name),
                other => panic!("unexpected value {other:?}"),
            })
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }
}
