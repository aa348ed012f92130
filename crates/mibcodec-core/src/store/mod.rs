//! The MIB store: per-module symbol tables and the numeric OID index.
//!
//! The store is append-only during the load phase: modules register their
//! assignments as the builder exits each rule. Once every module is loaded,
//! [`MibStore::freeze`] links imports, resolves every declared OID path to
//! its numeric form and populates the reverse index; afterwards the store
//! is logically read-only and queries need no synchronisation.

use crate::error::MibError;
use crate::smi::{
    attr, AttributeBag, AttributeValue, Constraint, NameId, NameTable, NamedBits, NamedNumbers,
    Oid, OidComponent, OidPath, SmiType, Symbol, TypeContent, TypeDescriptor, TypeKind, Value,
};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One registered module: its imports and the assignments it contributed.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    /// Import entries: (symbol name, source module name).
    pub imports: Vec<(NameId, NameId)>,
    /// Assignments contributed by this module, in source order.
    pub assignments: Vec<Symbol>,
}

/// An OBJECT-TYPE entry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectType {
    /// The macro attribute bag; contains at least SYNTAX, ACCESS and STATUS.
    pub attributes: AttributeBag,
    /// The declared OID path.
    pub oid: OidPath,
}

/// A TRAP-TYPE entry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapType {
    /// The macro name (`TRAP-TYPE`).
    pub macro_name: NameId,
    /// The macro attribute bag (ENTERPRISE, VARIABLES, …).
    pub attributes: AttributeBag,
    /// The trap number.
    pub value: Value,
}

/// A plain value assignment.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueEntry {
    /// The declared syntax.
    pub syntax: TypeDescriptor,
    /// The value.
    pub value: Value,
}

/// Any other macro instance carrying an OID value (MODULE-IDENTITY,
/// OBJECT-IDENTITY, OBJECT-GROUP, NOTIFICATION-TYPE, …).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacroEntry {
    /// The macro name.
    pub macro_name: NameId,
    /// The macro attribute bag.
    pub attributes: AttributeBag,
    /// The declared OID path.
    pub oid: OidPath,
}

/// Which table holds a symbol, with a borrowed payload.
#[derive(Clone, Copy, Debug)]
pub enum Resolved<'a> {
    /// A type assignment.
    Type(&'a TypeDescriptor),
    /// A textual convention.
    TextualConvention(&'a AttributeBag),
    /// An OBJECT-TYPE.
    ObjectType(&'a ObjectType),
    /// A TRAP-TYPE.
    TrapType(&'a TrapType),
    /// A value assignment.
    Value(&'a ValueEntry),
    /// Another macro instance.
    Macro(&'a MacroEntry),
}

/// A syntax flattened through its REFERENCED chain, ready for decoding.
#[derive(Clone, Debug)]
pub struct ResolvedSyntax {
    /// The SMI base type the chain bottoms out at.
    pub smi_type: SmiType,
    /// The nearest declared constraint along the chain, if any.
    pub constraint: Option<Constraint>,
    /// Named numbers from the nearest enumerated descriptor.
    pub names: Option<NamedNumbers>,
    /// Named bits from the nearest BITS descriptor.
    pub bits: Option<NamedBits>,
}

/// The process-wide catalogue of compiled modules.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MibStore {
    names: NameTable,
    modules: BTreeMap<NameId, Module>,
    types: BTreeMap<Symbol, TypeDescriptor>,
    textual_conventions: BTreeMap<Symbol, AttributeBag>,
    object_types: BTreeMap<Symbol, ObjectType>,
    trap_types: BTreeMap<Symbol, TrapType>,
    values: BTreeMap<Symbol, ValueEntry>,
    macros: BTreeMap<Symbol, MacroEntry>,
    /// Well-known roots, by bare name.
    roots: BTreeMap<NameId, u32>,
    /// Memoised numeric forms, filled by `freeze`.
    numeric: BTreeMap<Symbol, Oid>,
    /// Reverse index, filled by `freeze`.
    oids: BTreeMap<Oid, Symbol>,
    frozen: bool,
}

impl Default for MibStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MibStore {
    /// Create an empty store with the well-known roots pre-seeded.
    #[must_use]
    pub fn new() -> Self {
        let mut names = NameTable::new();
        let mut roots = BTreeMap::new();
        roots.insert(names.intern("ccitt"), 0);
        roots.insert(names.intern("iso"), 1);
        roots.insert(names.intern("joint-iso-ccitt"), 2);
        Self {
            names,
            modules: BTreeMap::new(),
            types: BTreeMap::new(),
            textual_conventions: BTreeMap::new(),
            object_types: BTreeMap::new(),
            trap_types: BTreeMap::new(),
            values: BTreeMap::new(),
            macros: BTreeMap::new(),
            roots,
            numeric: BTreeMap::new(),
            oids: BTreeMap::new(),
            frozen: false,
        }
    }

    /// The name table backing symbols in this store.
    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Intern a name.
    pub fn intern(&mut self, s: &str) -> NameId {
        self.names.intern(s)
    }

    /// Intern a `(module, name)` symbol.
    pub fn symbol(&mut self, module: &str, name: &str) -> Symbol {
        Symbol {
            module: self.names.intern(module),
            name: self.names.intern(name),
        }
    }

    /// Whether the load phase has been finalised.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // === Load phase ===

    /// Register an empty module.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateModule`] if the name is already registered.
    pub fn new_module(&mut self, name: &str) -> Result<NameId, MibError> {
        let id = self.names.intern(name);
        if self.modules.contains_key(&id) {
            return Err(MibError::DuplicateModule {
                module: name.into(),
            });
        }
        self.modules.insert(id, Module::default());
        Ok(id)
    }

    /// Record one import entry for a module.
    pub fn add_import(&mut self, module: NameId, symbol_name: NameId, from: NameId) {
        if let Some(m) = self.modules.get_mut(&module) {
            m.imports.push((symbol_name, from));
        }
    }

    /// Check whether a symbol is bound in any table.
    #[must_use]
    pub fn is_defined(&self, sym: Symbol) -> bool {
        self.types.contains_key(&sym)
            || self.textual_conventions.contains_key(&sym)
            || self.object_types.contains_key(&sym)
            || self.trap_types.contains_key(&sym)
            || self.values.contains_key(&sym)
            || self.macros.contains_key(&sym)
    }

    fn check_free(&self, sym: Symbol) -> Result<(), MibError> {
        if self.is_defined(sym) {
            Err(MibError::DuplicateSymbol {
                symbol: sym.display(&self.names).to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn record_assignment(&mut self, sym: Symbol) {
        if let Some(m) = self.modules.get_mut(&sym.module) {
            m.assignments.push(sym);
        }
    }

    /// Register a type assignment.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_type(&mut self, sym: Symbol, td: TypeDescriptor) -> Result<(), MibError> {
        self.check_free(sym)?;
        self.types.insert(sym, td);
        self.record_assignment(sym);
        Ok(())
    }

    /// Register a value assignment.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_value(
        &mut self,
        sym: Symbol,
        syntax: TypeDescriptor,
        value: Value,
    ) -> Result<(), MibError> {
        self.check_free(sym)?;
        self.values.insert(sym, ValueEntry { syntax, value });
        self.record_assignment(sym);
        Ok(())
    }

    /// Register a textual convention.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_textual_convention(
        &mut self,
        sym: Symbol,
        attributes: AttributeBag,
    ) -> Result<(), MibError> {
        self.check_free(sym)?;
        self.textual_conventions.insert(sym, attributes);
        self.record_assignment(sym);
        Ok(())
    }

    /// Register an OBJECT-TYPE.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_object_type(
        &mut self,
        sym: Symbol,
        attributes: AttributeBag,
        oid: OidPath,
    ) -> Result<(), MibError> {
        self.check_free(sym)?;
        self.object_types.insert(sym, ObjectType { attributes, oid });
        self.record_assignment(sym);
        Ok(())
    }

    /// Register a TRAP-TYPE.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_trap_type(
        &mut self,
        sym: Symbol,
        macro_name: &str,
        attributes: AttributeBag,
        value: Value,
    ) -> Result<(), MibError> {
        self.check_free(sym)?;
        let macro_name = self.names.intern(macro_name);
        self.trap_types.insert(
            sym,
            TrapType {
                macro_name,
                attributes,
                value,
            },
        );
        self.record_assignment(sym);
        Ok(())
    }

    /// Register any other macro instance with an OID value.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateSymbol`] if the symbol is already bound.
    pub fn add_macro_value(
        &mut self,
        sym: Symbol,
        macro_name: &str,
        attributes: AttributeBag,
        oid: OidPath,
    ) -> Result<(), MibError> {
        self.check_free(sym)?;
        let macro_name = self.names.intern(macro_name);
        self.macros.insert(
            sym,
            MacroEntry {
                macro_name,
                attributes,
                oid,
            },
        );
        self.record_assignment(sym);
        Ok(())
    }

    // === Queries ===

    /// Reveal which table holds a symbol.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<Resolved<'_>> {
        if let Some(td) = self.types.get(&sym) {
            Some(Resolved::Type(td))
        } else if let Some(bag) = self.textual_conventions.get(&sym) {
            Some(Resolved::TextualConvention(bag))
        } else if let Some(ot) = self.object_types.get(&sym) {
            Some(Resolved::ObjectType(ot))
        } else if let Some(tt) = self.trap_types.get(&sym) {
            Some(Resolved::TrapType(tt))
        } else if let Some(v) = self.values.get(&sym) {
            Some(Resolved::Value(v))
        } else {
            self.macros.get(&sym).map(Resolved::Macro)
        }
    }

    /// A registered module, by interned name.
    #[must_use]
    pub fn module(&self, name: NameId) -> Option<&Module> {
        self.modules.get(&name)
    }

    /// The declared syntax of a symbol, whichever table holds it.
    #[must_use]
    pub fn syntax_of(&self, sym: Symbol) -> Option<&TypeDescriptor> {
        match self.resolve(sym)? {
            Resolved::Type(td) => Some(td),
            Resolved::TextualConvention(bag) => self.bag_syntax(bag),
            Resolved::ObjectType(ot) => self.bag_syntax(&ot.attributes),
            Resolved::Value(v) => Some(&v.syntax),
            Resolved::TrapType(_) | Resolved::Macro(_) => None,
        }
    }

    fn bag_syntax<'a>(&self, bag: &'a AttributeBag) -> Option<&'a TypeDescriptor> {
        let syntax = self.names.find(attr::SYNTAX)?;
        match bag.get(syntax)? {
            AttributeValue::Syntax(td) => Some(td),
            _ => None,
        }
    }

    /// The declared row index of an OBJECT-TYPE, if it has one.
    #[must_use]
    pub fn object_index(&self, sym: Symbol) -> Option<&[Symbol]> {
        let ot = self.object_types.get(&sym)?;
        let index = self.names.find(attr::INDEX)?;
        match ot.attributes.get(index)? {
            AttributeValue::Index(symbols) => Some(symbols),
            _ => None,
        }
    }

    fn oid_path_of(&self, sym: Symbol) -> Option<&OidPath> {
        if let Some(ot) = self.object_types.get(&sym) {
            Some(&ot.oid)
        } else if let Some(m) = self.macros.get(&sym) {
            Some(&m.oid)
        } else if let Some(v) = self.values.get(&sym) {
            v.value.as_oid()
        } else {
            None
        }
    }

    /// Recursively resolve the defining OID path of a symbol to its purely
    /// numeric form. Returns `Ok(None)` when the symbol has no OID.
    ///
    /// Frozen stores answer from the memo built by [`MibStore::freeze`];
    /// before that the result is computed with a visited set.
    ///
    /// # Errors
    ///
    /// [`MibError::TypeCycle`] when the path references itself, and
    /// [`MibError::UnresolvedImport`] when it passes through a symbol whose
    /// module was never registered.
    pub fn numeric_oid(&self, sym: Symbol) -> Result<Option<Oid>, MibError> {
        if let Some(oid) = self.numeric.get(&sym) {
            return Ok(Some(oid.clone()));
        }
        let mut visited = BTreeSet::new();
        self.resolve_numeric(sym, &mut visited)
    }

    fn resolve_numeric(
        &self,
        sym: Symbol,
        visited: &mut BTreeSet<Symbol>,
    ) -> Result<Option<Oid>, MibError> {
        if let Some(oid) = self.numeric.get(&sym) {
            return Ok(Some(oid.clone()));
        }
        if !visited.insert(sym) {
            return Err(MibError::TypeCycle {
                symbol: sym.display(&self.names).to_string(),
            });
        }

        let result = self.resolve_numeric_inner(sym, visited);
        visited.remove(&sym);
        result
    }

    fn resolve_numeric_inner(
        &self,
        sym: Symbol,
        visited: &mut BTreeSet<Symbol>,
    ) -> Result<Option<Oid>, MibError> {
        let Some(path) = self.oid_path_of(sym) else {
            // Not declared anywhere: well-known root, or dangling.
            if let Some(&arc) = self.roots.get(&sym.name) {
                return Ok(Some(Oid::new(alloc::vec![arc])));
            }
            if !self.modules.contains_key(&sym.module) {
                return Err(MibError::UnresolvedImport {
                    symbol: sym.display(&self.names).to_string(),
                });
            }
            return Ok(None);
        };

        let mut out = Oid::default();
        for (i, component) in path.components().iter().enumerate() {
            match *component {
                OidComponent::Number(n) => out.push(n),
                OidComponent::Named(_, n) => out.push(n),
                OidComponent::Symbol(s) => {
                    let Some(resolved) = self.resolve_numeric(s, visited)? else {
                        return Ok(None);
                    };
                    if i == 0 {
                        out.extend(resolved.arcs());
                    } else if resolved.arcs().starts_with(out.arcs()) {
                        out.extend(&resolved.arcs()[out.len()..]);
                    } else if let Some(last) = resolved.last_arc() {
                        out.push(last);
                    } else {
                        return Ok(None);
                    }
                }
            }
        }
        Ok(Some(out))
    }

    /// Translate a numeric OID back to a symbol.
    ///
    /// Falls back to the longest registered prefix; the unconsumed arcs are
    /// returned alongside the symbol. Only meaningful once frozen.
    #[must_use]
    pub fn symbol_for_oid(&self, oid: &Oid) -> Option<(Symbol, Vec<u32>)> {
        for len in (1..=oid.len()).rev() {
            let prefix = Oid::from_slice(&oid.arcs()[..len]);
            if let Some(&sym) = self.oids.get(&prefix) {
                return Some((sym, oid.arcs()[len..].to_vec()));
            }
        }
        None
    }

    /// Flatten the syntax of a symbol through its REFERENCED chain down to
    /// an SMI base type, keeping the nearest constraint and named values.
    ///
    /// # Errors
    ///
    /// [`MibError::TypeCycle`] on a reference loop,
    /// [`MibError::UnresolvedImport`] when the chain leaves the registered
    /// modules, and [`MibError::UnknownSmiType`] when it bottoms out at a
    /// name with no SMI base type.
    pub fn resolve_syntax(&self, sym: Symbol) -> Result<ResolvedSyntax, MibError> {
        let mut td = self
            .syntax_of(sym)
            .ok_or_else(|| MibError::UnresolvedImport {
                symbol: sym.display(&self.names).to_string(),
            })?;

        let mut constraint = td.constraint.clone();
        let mut names = td.names.clone();
        let mut bits = td.bits.clone();
        let mut visited: BTreeSet<Symbol> = BTreeSet::new();
        visited.insert(sym);

        loop {
            if td.kind != TypeKind::Referenced {
                let smi_type = base_smi_type(td.kind)?;
                return Ok(ResolvedSyntax {
                    smi_type,
                    constraint,
                    names,
                    bits,
                });
            }

            let reference = td.reference.ok_or_else(|| MibError::UnknownSmiType {
                name: "REFERENCED".into(),
            })?;
            if !visited.insert(reference) {
                return Err(MibError::TypeCycle {
                    symbol: reference.display(&self.names).to_string(),
                });
            }

            let next = match self.resolve(reference) {
                Some(Resolved::Type(next)) => next,
                Some(Resolved::TextualConvention(bag)) => {
                    self.bag_syntax(bag).ok_or_else(|| MibError::UnknownSmiType {
                        name: self.names.get(reference.name).into(),
                    })?
                }
                Some(Resolved::ObjectType(ot)) => {
                    self.bag_syntax(&ot.attributes)
                        .ok_or_else(|| MibError::UnknownSmiType {
                            name: self.names.get(reference.name).into(),
                        })?
                }
                Some(_) => {
                    return Err(MibError::UnknownSmiType {
                        name: self.names.get(reference.name).into(),
                    })
                }
                None => {
                    // The chain dead-ends outside the store: a well-known
                    // base type, or a genuinely missing import.
                    let name = self.names.get(reference.name);
                    if let Some(smi_type) = SmiType::from_name(name) {
                        return Ok(ResolvedSyntax {
                            smi_type,
                            constraint,
                            names,
                            bits,
                        });
                    }
                    if self.modules.contains_key(&reference.module) {
                        return Err(MibError::UnknownSmiType { name: name.into() });
                    }
                    return Err(MibError::UnresolvedImport {
                        symbol: reference.display(&self.names).to_string(),
                    });
                }
            };

            if constraint.is_none() {
                constraint = next.constraint.clone();
            }
            if names.is_none() {
                names = next.names.clone();
            }
            if bits.is_none() {
                bits = next.bits.clone();
            }
            td = next;
        }
    }

    // === Finalisation ===

    /// Finalise the load phase.
    ///
    /// Verifies that every import names a registered module, resolves every
    /// declared OID path to its numeric form (memoised) and populates the
    /// numeric → symbol index.
    ///
    /// # Errors
    ///
    /// [`MibError::UnresolvedImport`] and [`MibError::TypeCycle`].
    pub fn freeze(&mut self) -> Result<(), MibError> {
        for module in self.modules.values() {
            for &(symbol_name, from) in &module.imports {
                if !self.modules.contains_key(&from) {
                    return Err(MibError::UnresolvedImport {
                        symbol: Symbol {
                            module: from,
                            name: symbol_name,
                        }
                        .display(&self.names)
                        .to_string(),
                    });
                }
            }
        }

        let mut with_paths: Vec<Symbol> = Vec::new();
        with_paths.extend(self.object_types.keys().copied());
        with_paths.extend(self.macros.keys().copied());
        with_paths.extend(
            self.values
                .iter()
                .filter(|(_, v)| v.value.as_oid().is_some())
                .map(|(s, _)| *s),
        );

        for sym in with_paths {
            let mut visited = BTreeSet::new();
            if let Some(oid) = self.resolve_numeric(sym, &mut visited)? {
                self.oids.entry(oid.clone()).or_insert(sym);
                self.numeric.insert(sym, oid);
            }
        }

        self.frozen = true;
        Ok(())
    }

    /// Merge another store into this one.
    ///
    /// Intended for hosts that compile disjoint module partitions in
    /// parallel. Both stores are unfrozen by the merge; call
    /// [`MibStore::freeze`] on the result.
    ///
    /// # Errors
    ///
    /// [`MibError::DuplicateModule`] or [`MibError::DuplicateSymbol`] on
    /// overlap; the receiver keeps the entries merged so far.
    pub fn merge(&mut self, other: &MibStore) -> Result<(), MibError> {
        let mut map: BTreeMap<NameId, NameId> = BTreeMap::new();

        for (&name, module) in &other.modules {
            let name = xlate_id(&mut self.names, &other.names, &mut map, name);
            if self.modules.contains_key(&name) {
                return Err(MibError::DuplicateModule {
                    module: self.names.get(name).into(),
                });
            }
            let imports = module
                .imports
                .iter()
                .map(|&(s, f)| {
                    (
                        xlate_id(&mut self.names, &other.names, &mut map, s),
                        xlate_id(&mut self.names, &other.names, &mut map, f),
                    )
                })
                .collect();
            let assignments = module
                .assignments
                .iter()
                .map(|&s| xlate_sym(&mut self.names, &other.names, &mut map, s))
                .collect();
            self.modules.insert(
                name,
                Module {
                    imports,
                    assignments,
                },
            );
        }

        for (&sym, td) in &other.types {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let td = xlate_td(&mut self.names, &other.names, &mut map, td);
            self.types.insert(sym, td);
        }
        for (&sym, bag) in &other.textual_conventions {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let bag = xlate_bag(&mut self.names, &other.names, &mut map, bag);
            self.textual_conventions.insert(sym, bag);
        }
        for (&sym, ot) in &other.object_types {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let entry = ObjectType {
                attributes: xlate_bag(&mut self.names, &other.names, &mut map, &ot.attributes),
                oid: xlate_path(&mut self.names, &other.names, &mut map, &ot.oid),
            };
            self.object_types.insert(sym, entry);
        }
        for (&sym, tt) in &other.trap_types {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let entry = TrapType {
                macro_name: xlate_id(&mut self.names, &other.names, &mut map, tt.macro_name),
                attributes: xlate_bag(&mut self.names, &other.names, &mut map, &tt.attributes),
                value: xlate_value(&mut self.names, &other.names, &mut map, &tt.value),
            };
            self.trap_types.insert(sym, entry);
        }
        for (&sym, v) in &other.values {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let entry = ValueEntry {
                syntax: xlate_td(&mut self.names, &other.names, &mut map, &v.syntax),
                value: xlate_value(&mut self.names, &other.names, &mut map, &v.value),
            };
            self.values.insert(sym, entry);
        }
        for (&sym, m) in &other.macros {
            let sym = xlate_sym(&mut self.names, &other.names, &mut map, sym);
            self.check_free(sym)?;
            let entry = MacroEntry {
                macro_name: xlate_id(&mut self.names, &other.names, &mut map, m.macro_name),
                attributes: xlate_bag(&mut self.names, &other.names, &mut map, &m.attributes),
                oid: xlate_path(&mut self.names, &other.names, &mut map, &m.oid),
            };
            self.macros.insert(sym, entry);
        }

        self.numeric.clear();
        self.oids.clear();
        self.frozen = false;
        Ok(())
    }
}

/// Map a builtin type kind to its SMI base type.
fn base_smi_type(kind: TypeKind) -> Result<SmiType, MibError> {
    let t = match kind {
        TypeKind::Integer => SmiType::Integer,
        TypeKind::OctetString => SmiType::OctetString,
        TypeKind::BitString => SmiType::BitString,
        // BITS values travel as octet strings; the named bits stay available
        // for labelling.
        TypeKind::Bits => SmiType::OctetString,
        TypeKind::ObjectIdentifier => SmiType::ObjectIdentifier,
        TypeKind::Null => SmiType::Null,
        TypeKind::Sequence | TypeKind::SequenceOf | TypeKind::Choice => {
            return Err(MibError::UnknownSmiType {
                name: String::from(match kind {
                    TypeKind::Sequence => "SEQUENCE",
                    TypeKind::SequenceOf => "SEQUENCE OF",
                    _ => "CHOICE",
                }),
            })
        }
        TypeKind::Referenced => {
            return Err(MibError::UnknownSmiType {
                name: String::from("REFERENCED"),
            })
        }
    };
    Ok(t)
}

// === Name-table translation for merge ===

fn xlate_id(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    id: NameId,
) -> NameId {
    if let Some(&mapped) = map.get(&id) {
        return mapped;
    }
    let mapped = dst.intern(src.get(id));
    map.insert(id, mapped);
    mapped
}

fn xlate_sym(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    sym: Symbol,
) -> Symbol {
    Symbol {
        module: xlate_id(dst, src, map, sym.module),
        name: xlate_id(dst, src, map, sym.name),
    }
}

fn xlate_path(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    path: &OidPath,
) -> OidPath {
    let components = path
        .components()
        .iter()
        .map(|c| match *c {
            OidComponent::Number(n) => OidComponent::Number(n),
            OidComponent::Symbol(s) => OidComponent::Symbol(xlate_sym(dst, src, map, s)),
            OidComponent::Named(s, n) => OidComponent::Named(xlate_sym(dst, src, map, s), n),
        })
        .collect();
    OidPath::new(components)
}

fn xlate_value(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    value: &Value,
) -> Value {
    match value {
        Value::Integer(v) => Value::Integer(*v),
        Value::String(s) => Value::String(s.clone()),
        Value::Boolean(b) => Value::Boolean(*b),
        Value::Oid(path) => Value::Oid(xlate_path(dst, src, map, path)),
        Value::Reference(s) => Value::Reference(xlate_sym(dst, src, map, *s)),
    }
}

fn xlate_td(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    td: &TypeDescriptor,
) -> TypeDescriptor {
    TypeDescriptor {
        kind: td.kind,
        names: td.names.as_ref().map(|nn| {
            NamedNumbers::new(
                nn.values
                    .iter()
                    .map(|&(v, l)| (v, xlate_id(dst, src, map, l)))
                    .collect(),
            )
        }),
        bits: td.bits.as_ref().map(|nb| {
            NamedBits::new(
                nb.bits
                    .iter()
                    .map(|&(l, p)| (xlate_id(dst, src, map, l), p))
                    .collect(),
            )
        }),
        constraint: td.constraint.clone(),
        content: td.content.as_ref().map(|content| match content {
            TypeContent::Element(inner) => {
                TypeContent::Element(alloc::boxed::Box::new(xlate_td(dst, src, map, inner)))
            }
            TypeContent::Fields(fields) => TypeContent::Fields(
                fields
                    .iter()
                    .map(|(s, t)| {
                        (
                            xlate_sym(dst, src, map, *s),
                            t.as_ref().map(|t| xlate_td(dst, src, map, t)),
                        )
                    })
                    .collect(),
            ),
        }),
        reference: td.reference.map(|s| xlate_sym(dst, src, map, s)),
    }
}

fn xlate_bag(
    dst: &mut NameTable,
    src: &NameTable,
    map: &mut BTreeMap<NameId, NameId>,
    bag: &AttributeBag,
) -> AttributeBag {
    let mut out = AttributeBag::new();
    for (name, value) in bag.iter() {
        let name = xlate_id(dst, src, map, name);
        let value = match value {
            AttributeValue::String(s) => AttributeValue::String(s.clone()),
            AttributeValue::Symbol(s) => AttributeValue::Symbol(xlate_sym(dst, src, map, *s)),
            AttributeValue::Names(ns) => AttributeValue::Names(ns.clone()),
            AttributeValue::Values(vs) => AttributeValue::Values(
                vs.iter().map(|v| xlate_value(dst, src, map, v)).collect(),
            ),
            AttributeValue::Index(syms) => AttributeValue::Index(
                syms.iter().map(|&s| xlate_sym(dst, src, map, s)).collect(),
            ),
            AttributeValue::Syntax(td) => AttributeValue::Syntax(xlate_td(dst, src, map, td)),
            AttributeValue::Value(v) => AttributeValue::Value(xlate_value(dst, src, map, v)),
        };
        out.set(name, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn store_with_module(module: &str) -> MibStore {
        let mut store = MibStore::new();
        store.new_module(module).unwrap();
        store
    }

    #[test]
    fn test_duplicate_module() {
        let mut store = store_with_module("M");
        assert!(matches!(
            store.new_module("M"),
            Err(MibError::DuplicateModule { .. })
        ));
    }

    #[test]
    fn test_duplicate_symbol_across_tables() {
        let mut store = store_with_module("M");
        let sym = store.symbol("M", "x");
        store
            .add_type(sym, TypeDescriptor::new(TypeKind::Integer))
            .unwrap();
        let err = store
            .add_value(
                sym,
                TypeDescriptor::new(TypeKind::Integer),
                Value::Integer(crate::smi::IntegerValue::I8(1)),
            )
            .unwrap_err();
        assert!(matches!(err, MibError::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_numeric_oid_from_roots() {
        let mut store = store_with_module("M");
        let sym = store.symbol("M", "foo");
        let iso = store.symbol("M", "iso");
        let path = OidPath::new(vec![
            OidComponent::Symbol(iso),
            OidComponent::Number(3),
            OidComponent::Number(6),
        ]);
        store
            .add_macro_value(sym, "OBJECT-IDENTITY", AttributeBag::new(), path)
            .unwrap();
        let oid = store.numeric_oid(sym).unwrap().unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6]);
    }

    #[test]
    fn test_numeric_oid_parent_child() {
        let mut store = store_with_module("M");
        let foo = store.symbol("M", "foo");
        let bar = store.symbol("M", "bar");
        store
            .add_macro_value(
                foo,
                "OBJECT-IDENTITY",
                AttributeBag::new(),
                OidPath::new(vec![
                    OidComponent::Number(1),
                    OidComponent::Number(3),
                    OidComponent::Number(6),
                ]),
            )
            .unwrap();
        store
            .add_macro_value(
                bar,
                "OBJECT-IDENTITY",
                AttributeBag::new(),
                OidPath::new(vec![OidComponent::Symbol(foo), OidComponent::Number(7)]),
            )
            .unwrap();
        let oid = store.numeric_oid(bar).unwrap().unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 7]);
        // Idempotent under repeated lookup
        assert_eq!(store.numeric_oid(bar).unwrap().unwrap().arcs(), &[1, 3, 6, 7]);
    }

    #[test]
    fn test_numeric_oid_cycle() {
        let mut store = store_with_module("M");
        let a = store.symbol("M", "a");
        let b = store.symbol("M", "b");
        store
            .add_macro_value(
                a,
                "OBJECT-IDENTITY",
                AttributeBag::new(),
                OidPath::new(vec![OidComponent::Symbol(b), OidComponent::Number(1)]),
            )
            .unwrap();
        store
            .add_macro_value(
                b,
                "OBJECT-IDENTITY",
                AttributeBag::new(),
                OidPath::new(vec![OidComponent::Symbol(a), OidComponent::Number(2)]),
            )
            .unwrap();
        assert!(matches!(
            store.numeric_oid(a),
            Err(MibError::TypeCycle { .. })
        ));
    }

    #[test]
    fn test_freeze_builds_reverse_index() {
        let mut store = store_with_module("M");
        let foo = store.symbol("M", "foo");
        store
            .add_macro_value(
                foo,
                "OBJECT-IDENTITY",
                AttributeBag::new(),
                OidPath::new(vec![
                    OidComponent::Number(1),
                    OidComponent::Number(3),
                    OidComponent::Number(6),
                ]),
            )
            .unwrap();
        store.freeze().unwrap();
        assert!(store.is_frozen());

        let (sym, residue) = store
            .symbol_for_oid(&Oid::new(vec![1, 3, 6, 1, 4]))
            .unwrap();
        assert_eq!(sym, foo);
        assert_eq!(residue, vec![1, 4]);
    }

    #[test]
    fn test_freeze_rejects_unresolved_import() {
        let mut store = store_with_module("M");
        let m = store.names.find("M").unwrap();
        let sym_name = store.intern("thing");
        let missing = store.intern("NO-SUCH-MIB");
        store.add_import(m, sym_name, missing);
        assert!(matches!(
            store.freeze(),
            Err(MibError::UnresolvedImport { .. })
        ));
    }

    #[test]
    fn test_merge_disjoint() {
        let mut a = store_with_module("A");
        let fa = a.symbol("A", "foo");
        a.add_macro_value(
            fa,
            "OBJECT-IDENTITY",
            AttributeBag::new(),
            OidPath::new(vec![OidComponent::Number(1), OidComponent::Number(3)]),
        )
        .unwrap();

        let mut b = store_with_module("B");
        let fb = b.symbol("B", "bar");
        b.add_macro_value(
            fb,
            "OBJECT-IDENTITY",
            AttributeBag::new(),
            OidPath::new(vec![OidComponent::Number(1), OidComponent::Number(4)]),
        )
        .unwrap();

        a.merge(&b).unwrap();
        a.freeze().unwrap();

        let bar = a.symbol("B", "bar");
        assert_eq!(a.numeric_oid(bar).unwrap().unwrap().arcs(), &[1, 4]);
    }

    #[test]
    fn test_merge_overlap_fails() {
        let mut a = store_with_module("M");
        let b = store_with_module("M");
        assert!(matches!(
            a.merge(&b),
            Err(MibError::DuplicateModule { .. })
        ));
    }

    #[test]
    fn test_resolve_reveals_table() {
        let mut store = store_with_module("M");
        let sym = store.symbol("M", "T");
        store
            .add_type(sym, TypeDescriptor::new(TypeKind::OctetString))
            .unwrap();
        assert!(matches!(store.resolve(sym), Some(Resolved::Type(_))));
        let missing = store.symbol("M", "U");
        assert!(store.resolve(missing).is_none());
    }
}
