//! Compile-time and query-time error model.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Source position of an offending token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Name of the source (usually the file name).
    pub source: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl Location {
    /// Create a new location.
    #[must_use]
    pub fn new(source: &str, line: u32, column: u32) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// Errors raised while compiling modules or resolving indices.
///
/// Compile-time kinds abort the current module and leave previously
/// compiled modules intact. Query-time kinds are returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MibError {
    /// Unterminated string, bad escape or malformed number literal.
    Lex {
        /// What the lexer rejected.
        message: String,
        /// Where it happened.
        location: Location,
    },
    /// Token mismatch at a rule boundary.
    Parse {
        /// Token class or literal the parser expected.
        expected: String,
        /// Text of the token actually found.
        found: String,
        /// Where it happened.
        location: Location,
    },
    /// Semantic error surfaced while assembling an assignment.
    InvalidAssignment {
        /// What went wrong.
        message: String,
        /// Where it happened.
        location: Location,
    },
    /// `new_module` on a name that is already registered.
    DuplicateModule {
        /// The module name.
        module: String,
    },
    /// An `add_*` operation on an already-defined symbol.
    DuplicateSymbol {
        /// The symbol, as `module::name`.
        symbol: String,
    },
    /// An imported name has no defining module at the end of the load phase.
    UnresolvedImport {
        /// The unresolved symbol, as `module::name`.
        symbol: String,
    },
    /// A chain of referenced types loops back on itself.
    TypeCycle {
        /// The symbol at which the cycle was detected.
        symbol: String,
    },
    /// A size or range constraint cannot be satisfied by the OID fragment.
    ConstraintViolation {
        /// The OID fragment that failed.
        oid: Vec<u32>,
    },
    /// Index resolution consumed fewer elements than the OID contains.
    TrailingIndex {
        /// The unconsumed tail.
        residue: Vec<u32>,
    },
    /// No primitive codec is registered for the resolved base type.
    UnknownSmiType {
        /// The base type name.
        name: String,
    },
}

impl MibError {
    /// The source location, for compile-time kinds.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Lex { location, .. }
            | Self::Parse { location, .. }
            | Self::InvalidAssignment { location, .. } => Some(location),
            _ => None,
        }
    }
}

impl fmt::Display for MibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { message, location } => write!(f, "{location}: {message}"),
            Self::Parse {
                expected,
                found,
                location,
            } => write!(f, "{location}: expected {expected}, found `{found}`"),
            Self::InvalidAssignment { message, location } => {
                write!(f, "{location}: invalid assignment: {message}")
            }
            Self::DuplicateModule { module } => write!(f, "duplicate module {module}"),
            Self::DuplicateSymbol { symbol } => write!(f, "duplicate symbol {symbol}"),
            Self::UnresolvedImport { symbol } => write!(f, "unresolved import {symbol}"),
            Self::TypeCycle { symbol } => write!(f, "type reference cycle through {symbol}"),
            Self::ConstraintViolation { oid } => {
                write!(f, "constraint cannot be satisfied by ")?;
                write_dotted(f, oid)
            }
            Self::TrailingIndex { residue } => {
                write!(f, "trailing elements in index: ")?;
                write_dotted(f, residue)
            }
            Self::UnknownSmiType { name } => write!(f, "no codec for SMI type {name}"),
        }
    }
}

fn write_dotted(f: &mut fmt::Formatter<'_>, arcs: &[u32]) -> fmt::Result {
    let mut first = true;
    for arc in arcs {
        if !first {
            write!(f, ".")?;
        }
        write!(f, "{arc}")?;
        first = false;
    }
    Ok(())
}

#[cfg(feature = "std")]
impl std::error::Error for MibError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn test_location_display() {
        let loc = Location::new("IF-MIB", 12, 3);
        assert_eq!(format!("{loc}"), "IF-MIB:12:3");
    }

    #[test]
    fn test_parse_error_display() {
        let err = MibError::Parse {
            expected: "::=".into(),
            found: "BEGIN".into(),
            location: Location::new("X-MIB", 4, 1),
        };
        assert_eq!(format!("{err}"), "X-MIB:4:1: expected ::=, found `BEGIN`");
    }

    #[test]
    fn test_trailing_index_display() {
        let err = MibError::TrailingIndex {
            residue: vec![5, 6],
        };
        assert_eq!(format!("{err}"), "trailing elements in index: 5.6");
    }
}
