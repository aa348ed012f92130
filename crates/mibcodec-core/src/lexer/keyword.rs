//! Reserved word lookup.

use super::token::TokenKind;

/// Look up a reserved word, returning its token kind.
///
/// Reserved words are case-sensitive. Attribute names such as `STATUS` or
/// `DESCRIPTION` are deliberately not reserved: the grammar treats them as
/// plain identifiers and the parser matches them by text.
#[must_use]
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "BEGIN" => TokenKind::KwBegin,
        "END" => TokenKind::KwEnd,
        "DEFINITIONS" => TokenKind::KwDefinitions,
        "IMPORTS" => TokenKind::KwImports,
        "EXPORTS" => TokenKind::KwExports,
        "FROM" => TokenKind::KwFrom,
        "SEQUENCE" => TokenKind::KwSequence,
        "SET" => TokenKind::KwSet,
        "OF" => TokenKind::KwOf,
        "CHOICE" => TokenKind::KwChoice,
        "INTEGER" => TokenKind::KwInteger,
        "OCTET" => TokenKind::KwOctet,
        "STRING" => TokenKind::KwString,
        "BIT" => TokenKind::KwBit,
        "BITS" => TokenKind::KwBits,
        "NULL" => TokenKind::KwNull,
        "OBJECT" => TokenKind::KwObject,
        "IDENTIFIER" => TokenKind::KwIdentifier,
        "TRUE" => TokenKind::KwTrue,
        "FALSE" => TokenKind::KwFalse,
        "OPTIONAL" => TokenKind::KwOptional,
        "DEFAULT" => TokenKind::KwDefault,
        "IMPLICIT" => TokenKind::KwImplicit,
        "EXPLICIT" => TokenKind::KwExplicit,
        "TAGS" => TokenKind::KwTags,
        "AUTOMATIC" => TokenKind::KwAutomatic,
        "EXTENSIBILITY" => TokenKind::KwExtensibility,
        "IMPLIED" => TokenKind::KwImplied,
        "APPLICATION" => TokenKind::KwApplication,
        "UNIVERSAL" => TokenKind::KwUniversal,
        "CLASS" => TokenKind::KwClass,
        "UNIQUE" => TokenKind::KwUnique,
        "WITH" => TokenKind::KwWith,
        "SYNTAX" => TokenKind::KwSyntax,
        "MACRO" => TokenKind::KwMacro,
        "TEXTUAL-CONVENTION" => TokenKind::KwTextualConvention,
        "OBJECT-TYPE" => TokenKind::KwObjectType,
        "OBJECT-IDENTITY" => TokenKind::KwObjectIdentity,
        "OBJECT-GROUP" => TokenKind::KwObjectGroup,
        "MODULE-IDENTITY" => TokenKind::KwModuleIdentity,
        "MODULE-COMPLIANCE" => TokenKind::KwModuleCompliance,
        "NOTIFICATION-TYPE" => TokenKind::KwNotificationType,
        "NOTIFICATION-GROUP" => TokenKind::KwNotificationGroup,
        "AGENT-CAPABILITIES" => TokenKind::KwAgentCapabilities,
        "TRAP-TYPE" => TokenKind::KwTrapType,
        _ => return None,
    };
    Some(kind)
}
