//! MIB parser module.
//!
//! A recursive-descent recogniser of the module grammar. The parser builds
//! no tree: each rule method narrates its progress to a [`ModuleListener`],
//! which carries all semantics. Errors abort the module immediately; there
//! is no recovery inside an assignment.

mod listener;

pub use listener::{
    AttributePayload, BuiltinKind, IntegerLiteral, ModuleListener, RawOidComponent, TypeHint,
};

use crate::error::{Location, MibError};
use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::smi::attr;
use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

/// String-valued macro attributes.
const STRING_ATTRS: &[&str] = &[
    attr::DESCRIPTION,
    attr::REFERENCE,
    attr::UNITS,
    attr::DISPLAY_HINT,
    attr::REVISION,
    attr::LAST_UPDATED,
    attr::ORGANIZATION,
    attr::CONTACT_INFO,
    attr::PRODUCT_RELEASE,
];

/// Identifier-list macro attributes.
const NAME_LIST_ATTRS: &[&str] = &[
    attr::AUGMENTS,
    attr::INCLUDES,
    attr::MANDATORY_GROUPS,
    attr::VARIABLES,
    attr::NOTIFICATIONS,
];

/// Single-identifier macro attributes.
const IDENTIFIER_ATTRS: &[&str] = &[
    attr::ENTERPRISE,
    attr::GROUP,
    attr::OBJECT,
    attr::SUPPORTS,
    attr::VARIATION,
];

/// MIB parser over a lexed token stream.
pub struct Parser<'src> {
    source: &'src [u8],
    source_name: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    /// Lex the source and set up a parser.
    ///
    /// # Errors
    ///
    /// [`MibError::Lex`] for malformed literals.
    pub fn new(source: &'src [u8], source_name: &'src str) -> Result<Self, MibError> {
        let tokens = Lexer::new(source, source_name).tokenize()?;
        Ok(Self {
            source,
            source_name,
            tokens,
            pos: 0,
        })
    }

    /// Parse every module definition in the source, driving the listener.
    ///
    /// # Errors
    ///
    /// [`MibError::Parse`] on a token mismatch, plus whatever the listener
    /// raises. The first error aborts parsing.
    pub fn parse<L: ModuleListener>(mut self, listener: &mut L) -> Result<(), MibError> {
        while !self.is_eof() {
            self.parse_module_definition(listener)?;
        }
        Ok(())
    }

    // === Token access ===

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn peek_nth(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    #[allow(clippy::cast_possible_truncation)] // Source bounded to u32::MAX bytes
    fn eof_token(&self) -> Token {
        Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len() as u32, self.source.len() as u32, 0, 0),
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, MibError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.err_expected(expected))
        }
    }

    /// Extract the text of a span, transcoding non-UTF-8 bytes lossily.
    fn text(&self, span: Span) -> Cow<'src, str> {
        String::from_utf8_lossy(&self.source[span.start as usize..span.end as usize])
    }

    /// The inner text of a quoted or `'…'X` literal.
    fn inner_text(&self, span: Span, suffix: usize) -> Cow<'src, str> {
        let start = span.start as usize + 1;
        let end = (span.end as usize).saturating_sub(1 + suffix);
        String::from_utf8_lossy(&self.source[start..end.max(start)])
    }

    fn location(&self, token: Token) -> Location {
        Location::new(self.source_name, token.span.line, token.span.column)
    }

    fn err_expected(&self, expected: &str) -> MibError {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            Cow::Borrowed("<eof>")
        } else {
            self.text(token.span)
        };
        MibError::Parse {
            expected: expected.into(),
            found: found.into_owned(),
            location: self.location(token),
        }
    }

    /// Parse a non-negative arc number.
    fn parse_arc(&mut self) -> Result<u32, MibError> {
        let token = self.expect(TokenKind::Number, "non-negative number")?;
        self.text(token.span)
            .parse::<u32>()
            .map_err(|_| MibError::Parse {
                expected: "non-negative number".into(),
                found: self.text(token.span).into_owned(),
                location: self.location(token),
            })
    }

    /// Parse a signed number to i64 (named-number values, bit positions).
    fn parse_signed(&mut self) -> Result<i64, MibError> {
        let token = self.expect(TokenKind::Number, "number")?;
        self.text(token.span)
            .parse::<i64>()
            .map_err(|_| MibError::Parse {
                expected: "number".into(),
                found: self.text(token.span).into_owned(),
                location: self.location(token),
            })
    }

    /// Skip a balanced `{ … }` group. The opening brace is current.
    fn skip_braced(&mut self) -> Result<(), MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => return Err(self.err_expected("}")),
                _ => {}
            }
        }
        Ok(())
    }

    // === Module structure ===

    /// `moduleDefinition := IDENTIFIER [modulePath] DEFINITIONS tagDefault
    /// extensionDefault ::= BEGIN moduleBody END`
    fn parse_module_definition<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        let name_token = self.expect(TokenKind::Ident, "module name")?;
        let name = self.text(name_token.span).into_owned();

        if self.check(TokenKind::LBrace) {
            self.skip_braced()?;
        }
        self.expect(TokenKind::KwDefinitions, "DEFINITIONS")?;

        // tagDefault
        if matches!(
            self.peek().kind,
            TokenKind::KwExplicit | TokenKind::KwImplicit | TokenKind::KwAutomatic
        ) {
            self.advance();
            self.expect(TokenKind::KwTags, "TAGS")?;
        }
        // extensionDefault
        if self.check(TokenKind::KwExtensibility) {
            self.advance();
            self.expect(TokenKind::KwImplied, "IMPLIED")?;
        }

        self.expect(TokenKind::ColonColonEqual, "::=")?;
        self.expect(TokenKind::KwBegin, "BEGIN")?;
        listener.enter_module(&name, &self.location(name_token))?;

        if self.check(TokenKind::KwExports) {
            self.skip_exports()?;
        }
        if self.check(TokenKind::KwImports) {
            self.parse_imports(listener)?;
        }

        while !self.check(TokenKind::KwEnd) {
            if self.is_eof() {
                return Err(self.err_expected("END"));
            }
            self.parse_assignment(listener)?;
        }
        self.advance(); // END
        listener.exit_module()
    }

    /// EXPORTS is recognised and skipped up to its semicolon.
    fn skip_exports(&mut self) -> Result<(), MibError> {
        self.advance(); // EXPORTS
        loop {
            match self.advance().kind {
                TokenKind::Semicolon => return Ok(()),
                TokenKind::Eof => return Err(self.err_expected(";")),
                _ => {}
            }
        }
    }

    /// `imports := IMPORTS symbolsFromModule+ ;`
    fn parse_imports<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        self.advance(); // IMPORTS
        loop {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                return Ok(());
            }

            let mut symbols: Vec<String> = Vec::new();
            loop {
                let token = self.peek();
                if token.kind == TokenKind::Ident || token.kind.is_keyword() {
                    if token.kind == TokenKind::KwFrom {
                        self.advance();
                        break;
                    }
                    symbols.push(self.text(token.span).into_owned());
                    self.advance();
                    if self.check(TokenKind::Comma) {
                        self.advance();
                    }
                } else {
                    return Err(self.err_expected("imported symbol or FROM"));
                }
            }

            let from_token = self.expect(TokenKind::Ident, "module name")?;
            let from = self.text(from_token.span).into_owned();
            listener.import_symbols(&from, &symbols)?;
        }
    }

    // === Assignments ===

    fn parse_assignment<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        // MACRO definition: the lexer has skipped the body and the next
        // tokens are `name MACRO END`. Recognised, never evaluated.
        if self.peek_nth(1).kind == TokenKind::KwMacro
            && (self.check(TokenKind::Ident) || self.peek().kind.is_macro_keyword())
        {
            self.advance();
            self.advance();
            self.expect(TokenKind::KwEnd, "END")?;
            return Ok(());
        }

        let name_token = self.expect(TokenKind::Ident, "assignment name")?;
        let name = self.text(name_token.span).into_owned();

        let selector = self.peek();
        if selector.kind.is_macro_keyword() {
            listener.enter_assignment(&name)?;
            let macro_name = self.text(selector.span).into_owned();
            return match selector.kind {
                TokenKind::KwObjectType => self.parse_object_type_assignment(listener),
                TokenKind::KwTrapType => self.parse_trap_type_assignment(listener),
                TokenKind::KwTextualConvention => {
                    self.parse_textual_convention_body(listener)
                }
                _ => self.parse_complex_assignment(listener, &macro_name),
            };
        }

        if self.check(TokenKind::ColonColonEqual) {
            self.advance();
            listener.enter_assignment(&name)?;
            if self.check(TokenKind::KwTextualConvention) {
                return self.parse_textual_convention_body(listener);
            }
            // typeAssignment
            self.parse_type(listener)?;
            let end = self.location(self.peek());
            return listener.exit_type_assignment(&end);
        }

        // valueAssignment: `name type ::= value`
        listener.enter_assignment(&name)?;
        self.parse_type(listener)?;
        self.expect(TokenKind::ColonColonEqual, "::=")?;
        self.parse_value(listener)?;
        let end = self.location(self.peek());
        listener.exit_value_assignment(&end)
    }

    fn parse_object_type_assignment<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        self.advance(); // OBJECT-TYPE
        listener.enter_object_type_assignment()?;
        self.parse_macro_attributes(listener)?;
        self.expect(TokenKind::ColonColonEqual, "::=")?;
        self.parse_oid_value(listener)?;
        let end = self.location(self.peek());
        listener.exit_object_type_assignment(&end)
    }

    fn parse_trap_type_assignment<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        self.advance(); // TRAP-TYPE
        listener.enter_trap_type_assignment()?;
        self.parse_macro_attributes(listener)?;
        self.expect(TokenKind::ColonColonEqual, "::=")?;
        self.parse_value(listener)?;
        let end = self.location(self.peek());
        listener.exit_trap_type_assignment(&end)
    }

    fn parse_complex_assignment<L: ModuleListener>(
        &mut self,
        listener: &mut L,
        macro_name: &str,
    ) -> Result<(), MibError> {
        self.advance(); // the macro keyword
        listener.enter_complex_assignment(macro_name)?;
        self.parse_macro_attributes(listener)?;
        self.expect(TokenKind::ColonColonEqual, "::=")?;
        self.parse_oid_value(listener)?;
        let end = self.location(self.peek());
        listener.exit_complex_assignment(&end)
    }

    /// Body of `Name ::= TEXTUAL-CONVENTION attr… SYNTAX type`.
    fn parse_textual_convention_body<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        self.advance(); // TEXTUAL-CONVENTION
        listener.enter_textual_convention_assignment()?;
        self.parse_macro_attributes(listener)?;
        let end = self.location(self.peek());
        listener.exit_textual_convention_assignment(&end)
    }

    // === Macro attributes ===

    /// Is the current token the start of a macro attribute?
    fn at_attribute_start(&self) -> bool {
        let token = self.peek();
        if token.kind == TokenKind::KwSyntax {
            return true;
        }
        if token.kind != TokenKind::Ident {
            return false;
        }
        let text = self.text(token.span);
        if attr::is_known(&text) {
            return true;
        }
        // Unknown attributes are tolerated when they cannot be the start of
        // the next assignment.
        let next = self.peek_nth(1).kind;
        attribute_shaped(&text)
            && next != TokenKind::ColonColonEqual
            && next != TokenKind::KwMacro
            && !next.is_macro_keyword()
    }

    fn parse_macro_attributes<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        while self.at_attribute_start() {
            if self.check(TokenKind::KwSyntax) {
                let token = self.advance();
                self.parse_type(listener)?;
                listener.exit_macro_attribute(
                    attr::SYNTAX,
                    AttributePayload::FromStack,
                    &self.location(token),
                )?;
                continue;
            }

            let token = self.advance();
            let name = self.text(token.span).into_owned();
            let location = self.location(token);

            match name.as_str() {
                attr::ACCESS | attr::MAX_ACCESS | attr::MIN_ACCESS => {
                    let value_token = self.expect(TokenKind::Ident, "access value")?;
                    let value = self.text(value_token.span).into_owned();
                    listener.access_attribute(&name, &value)?;
                }
                attr::STATUS => {
                    let value_token = self.expect(TokenKind::Ident, "status value")?;
                    let value = self.text(value_token.span).into_owned();
                    listener.status_attribute(&name, &value)?;
                }
                attr::WRITE_SYNTAX => {
                    self.parse_type(listener)?;
                    listener.exit_macro_attribute(
                        &name,
                        AttributePayload::FromStack,
                        &location,
                    )?;
                }
                attr::INDEX => {
                    self.parse_index_list(listener)?;
                    listener.exit_macro_attribute(&name, AttributePayload::Index, &location)?;
                }
                attr::OBJECTS => {
                    self.parse_value_list(listener)?;
                    listener.exit_macro_attribute(&name, AttributePayload::Objects, &location)?;
                }
                attr::DEFVAL => {
                    self.expect(TokenKind::LBrace, "{")?;
                    self.parse_value(listener)?;
                    self.expect(TokenKind::RBrace, "}")?;
                    listener.exit_macro_attribute(
                        &name,
                        AttributePayload::FromStack,
                        &location,
                    )?;
                }
                attr::CREATION_REQUIRES => {
                    // A braced run of column references, collected off the
                    // stack the same way OBJECTS is.
                    self.parse_value_list(listener)?;
                    listener.exit_macro_attribute(&name, AttributePayload::Objects, &location)?;
                }
                attr::MODULE => {
                    // The module name is optional: bare MODULE refers to the
                    // module being compiled.
                    if self.check(TokenKind::Ident)
                        && !attr::is_known(&self.text(self.peek().span))
                    {
                        let value_token = self.advance();
                        let value = self.text(value_token.span).into_owned();
                        listener.exit_macro_attribute(
                            &name,
                            AttributePayload::Identifier(&value),
                            &location,
                        )?;
                    } else {
                        listener.exit_macro_attribute(
                            &name,
                            AttributePayload::Empty,
                            &location,
                        )?;
                    }
                }
                _ if IDENTIFIER_ATTRS.contains(&name.as_str()) => {
                    let value_token = self.expect(TokenKind::Ident, "identifier")?;
                    let value = self.text(value_token.span).into_owned();
                    listener.exit_macro_attribute(
                        &name,
                        AttributePayload::Identifier(&value),
                        &location,
                    )?;
                }
                _ if NAME_LIST_ATTRS.contains(&name.as_str()) => {
                    let names = self.parse_name_list()?;
                    listener.exit_macro_attribute(
                        &name,
                        AttributePayload::NameList(names),
                        &location,
                    )?;
                }
                _ if STRING_ATTRS.contains(&name.as_str()) => {
                    let value_token = self.expect(TokenKind::CString, "quoted string")?;
                    let value = self.inner_text(value_token.span, 0).into_owned();
                    listener.string_value(&value)?;
                    listener.exit_macro_attribute(
                        &name,
                        AttributePayload::FromStack,
                        &location,
                    )?;
                }
                _ => {
                    // Unknown attribute: consume one value group and move on.
                    self.skip_attribute_value()?;
                }
            }
        }
        Ok(())
    }

    /// `INDEX { [IMPLIED] name, … }` — each entry is narrated as a
    /// referenced type so the builder can collect them off its stack.
    fn parse_index_list<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::KwImplied) {
                self.advance();
            }
            let token = self.expect(TokenKind::Ident, "index object")?;
            let name = self.text(token.span).into_owned();
            listener.enter_type(TypeHint::Referenced(&name))?;
            listener.exit_type()?;
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(())
    }

    /// `OBJECTS { value, … }` and similar braced value runs.
    fn parse_value_list<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        while !self.check(TokenKind::RBrace) {
            self.parse_value(listener)?;
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(())
    }

    /// `{ name, … }` with the tolerant comma policy.
    fn parse_name_list(&mut self) -> Result<Vec<String>, MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut names = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let token = self.expect(TokenKind::Ident, "identifier")?;
            names.push(self.text(token.span).into_owned());
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(names)
    }

    /// Consume the value of an unrecognised attribute.
    fn skip_attribute_value(&mut self) -> Result<(), MibError> {
        match self.peek().kind {
            TokenKind::LBrace => self.skip_braced(),
            TokenKind::CString
            | TokenKind::Number
            | TokenKind::HexNumber
            | TokenKind::BinNumber
            | TokenKind::Ident => {
                self.advance();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // === Values ===

    fn parse_value<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        let token = self.peek();
        match token.kind {
            TokenKind::LBrace => self.parse_oid_value(listener),
            TokenKind::Number => {
                self.advance();
                let text = self.text(token.span);
                listener.integer_value(IntegerLiteral::Decimal(&text), &self.location(token))
            }
            TokenKind::HexNumber => {
                self.advance();
                let payload = self.inner_text(token.span, 1);
                listener.integer_value(IntegerLiteral::Hex(&payload), &self.location(token))
            }
            TokenKind::BinNumber => {
                self.advance();
                let payload = self.inner_text(token.span, 1);
                listener.integer_value(IntegerLiteral::Binary(&payload), &self.location(token))
            }
            TokenKind::CString => {
                self.advance();
                let value = self.inner_text(token.span, 0);
                listener.string_value(&value)
            }
            TokenKind::KwTrue => {
                self.advance();
                listener.boolean_value(true)
            }
            TokenKind::KwFalse => {
                self.advance();
                listener.boolean_value(false)
            }
            TokenKind::Ident => {
                self.advance();
                let name = self.text(token.span);
                listener.reference_value(&name)
            }
            _ => Err(self.err_expected("value")),
        }
    }

    /// `objectIdentifierValue := { objIdComponents+ }`
    fn parse_oid_value<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut parts: Vec<(Option<String>, Option<u32>)> = Vec::new();
        while !self.check(TokenKind::RBrace) {
            match self.peek().kind {
                TokenKind::Number => {
                    let value = self.parse_arc()?;
                    parts.push((None, Some(value)));
                }
                TokenKind::Ident => {
                    let token = self.advance();
                    let name = self.text(token.span).into_owned();
                    if self.check(TokenKind::LParen) {
                        self.advance();
                        let value = self.parse_arc()?;
                        self.expect(TokenKind::RParen, ")")?;
                        parts.push((Some(name), Some(value)));
                    } else {
                        parts.push((Some(name), None));
                    }
                }
                TokenKind::Comma => {
                    self.advance();
                }
                _ => return Err(self.err_expected("OID component")),
            }
        }
        self.advance(); // }

        let components: Vec<RawOidComponent<'_>> = parts
            .iter()
            .map(|(name, value)| match (name, value) {
                (Some(n), Some(v)) => RawOidComponent::Named(n, *v),
                (Some(n), None) => RawOidComponent::Name(n),
                (None, Some(v)) => RawOidComponent::Number(*v),
                (None, None) => unreachable!("empty OID component"),
            })
            .collect();
        listener.oid_value(&components)
    }

    // === Types ===

    fn parse_type<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        // Optional `[APPLICATION n]` tag and tagging mode.
        if self.check(TokenKind::LBracket) {
            loop {
                match self.advance().kind {
                    TokenKind::RBracket => break,
                    TokenKind::Eof => return Err(self.err_expected("]")),
                    _ => {}
                }
            }
        }
        if matches!(
            self.peek().kind,
            TokenKind::KwImplicit | TokenKind::KwExplicit
        ) {
            self.advance();
        }

        let token = self.peek();
        match token.kind {
            TokenKind::KwInteger => {
                listener.enter_type(TypeHint::Builtin(BuiltinKind::Integer))?;
                self.advance();
                if self.check(TokenKind::LBrace) {
                    let names = self.parse_named_numbers()?;
                    listener.integer_names(&names)?;
                }
            }
            TokenKind::KwOctet => {
                self.advance();
                self.expect(TokenKind::KwString, "STRING")?;
                listener.enter_type(TypeHint::Builtin(BuiltinKind::OctetString))?;
            }
            TokenKind::KwBit => {
                self.advance();
                self.expect(TokenKind::KwString, "STRING")?;
                listener.enter_type(TypeHint::Builtin(BuiltinKind::BitString))?;
            }
            TokenKind::KwBits => {
                listener.enter_type(TypeHint::Builtin(BuiltinKind::Bits))?;
                self.advance();
                if self.check(TokenKind::LBrace) {
                    let bits = self.parse_named_bits()?;
                    listener.bits_names(&bits)?;
                }
            }
            TokenKind::KwObject => {
                self.advance();
                self.expect(TokenKind::KwIdentifier, "IDENTIFIER")?;
                listener.enter_type(TypeHint::Builtin(BuiltinKind::ObjectIdentifier))?;
            }
            TokenKind::KwNull => {
                listener.enter_type(TypeHint::Builtin(BuiltinKind::Null))?;
                self.advance();
            }
            TokenKind::KwSequence => {
                self.advance();
                if self.check(TokenKind::KwOf) {
                    listener.enter_type(TypeHint::Builtin(BuiltinKind::SequenceOf))?;
                    self.advance();
                    self.parse_type(listener)?;
                    listener.exit_sequence_of_type(&self.location(self.peek()))?;
                } else {
                    listener.enter_type(TypeHint::Builtin(BuiltinKind::Sequence))?;
                    listener.enter_sequence_type()?;
                    let names = self.parse_field_list(listener)?;
                    listener.exit_sequence_type(&names, &self.location(self.peek()))?;
                }
            }
            TokenKind::KwChoice => {
                listener.enter_type(TypeHint::Builtin(BuiltinKind::Choice))?;
                listener.enter_choice_type()?;
                self.advance();
                let names = self.parse_field_list(listener)?;
                listener.exit_choice_type(&names, &self.location(self.peek()))?;
            }
            TokenKind::Ident => {
                let name = self.text(token.span).into_owned();
                listener.enter_type(TypeHint::Referenced(&name))?;
                self.advance();
                if self.check(TokenKind::LBrace) {
                    let names = self.parse_named_numbers()?;
                    listener.integer_names(&names)?;
                }
            }
            _ => return Err(self.err_expected("type")),
        }

        if self.check(TokenKind::LParen) {
            self.parse_constraint(listener)?;
        }
        listener.exit_type()
    }

    /// `{ name type, … }` field list of SEQUENCE and CHOICE.
    fn parse_field_list<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<Vec<String>, MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut names = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let token = self.expect(TokenKind::Ident, "field name")?;
            names.push(self.text(token.span).into_owned());
            self.parse_type(listener)?;
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(names)
    }

    /// `{ name(value), … }`
    fn parse_named_numbers(&mut self) -> Result<Vec<(String, i64)>, MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut names = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let token = self.expect(TokenKind::Ident, "named number")?;
            let name = self.text(token.span).into_owned();
            self.expect(TokenKind::LParen, "(")?;
            let value = self.parse_signed()?;
            self.expect(TokenKind::RParen, ")")?;
            names.push((name, value));
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(names)
    }

    /// `{ name(position), … }` with non-negative positions.
    fn parse_named_bits(&mut self) -> Result<Vec<(String, u32)>, MibError> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut bits = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let token = self.expect(TokenKind::Ident, "named bit")?;
            let name = self.text(token.span).into_owned();
            self.expect(TokenKind::LParen, "(")?;
            let position = self.parse_arc()?;
            self.expect(TokenKind::RParen, ")")?;
            bits.push((name, position));
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // }
        Ok(bits)
    }

    // === Constraints ===

    /// `( SIZE ( elements ) )` or `( elements )`.
    fn parse_constraint<L: ModuleListener>(&mut self, listener: &mut L) -> Result<(), MibError> {
        self.advance(); // (
        let is_size =
            self.check(TokenKind::Ident) && self.text(self.peek().span).as_ref() == "SIZE";
        if is_size {
            self.advance();
            self.expect(TokenKind::LParen, "(")?;
        }

        listener.enter_constraint(is_size)?;
        loop {
            self.parse_constraint_integer(listener)?;
            if self.check(TokenKind::DotDot) {
                self.advance();
                self.parse_constraint_integer(listener)?;
            }
            listener.exit_constraint_elements(&self.location(self.peek()))?;
            if self.check(TokenKind::Pipe) {
                self.advance();
            } else {
                break;
            }
        }

        if is_size {
            self.expect(TokenKind::RParen, ")")?;
        }
        self.expect(TokenKind::RParen, ")")?;
        listener.exit_constraint()
    }

    fn parse_constraint_integer<L: ModuleListener>(
        &mut self,
        listener: &mut L,
    ) -> Result<(), MibError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let text = self.text(token.span);
                listener.integer_value(IntegerLiteral::Decimal(&text), &self.location(token))
            }
            TokenKind::HexNumber => {
                self.advance();
                let payload = self.inner_text(token.span, 1);
                listener.integer_value(IntegerLiteral::Hex(&payload), &self.location(token))
            }
            TokenKind::BinNumber => {
                self.advance();
                let payload = self.inner_text(token.span, 1);
                listener.integer_value(IntegerLiteral::Binary(&payload), &self.location(token))
            }
            _ => Err(self.err_expected("constraint bound")),
        }
    }
}

/// Attribute names look like `MAX-ACCESS`: uppercase letters, digits and
/// hyphens, starting with a letter.
fn attribute_shaped(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_uppercase()
        && text.len() >= 2
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    /// Records event names so rule narration can be asserted.
    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl ModuleListener for EventLog {
        fn enter_module(&mut self, name: &str, _location: &Location) -> Result<(), MibError> {
            self.events.push(format!("module {name}"));
            Ok(())
        }
        fn exit_module(&mut self) -> Result<(), MibError> {
            self.events.push("end module".into());
            Ok(())
        }
        fn import_symbols(
            &mut self,
            from_module: &str,
            symbols: &[String],
        ) -> Result<(), MibError> {
            self.events
                .push(format!("import {} from {from_module}", symbols.join("+")));
            Ok(())
        }
        fn enter_assignment(&mut self, name: &str) -> Result<(), MibError> {
            self.events.push(format!("assign {name}"));
            Ok(())
        }
        fn exit_object_type_assignment(&mut self, _location: &Location) -> Result<(), MibError> {
            self.events.push("object-type".into());
            Ok(())
        }
        fn exit_type_assignment(&mut self, _location: &Location) -> Result<(), MibError> {
            self.events.push("type-assignment".into());
            Ok(())
        }
        fn exit_value_assignment(&mut self, _location: &Location) -> Result<(), MibError> {
            self.events.push("value-assignment".into());
            Ok(())
        }
        fn oid_value(&mut self, components: &[RawOidComponent<'_>]) -> Result<(), MibError> {
            self.events.push(format!("oid({})", components.len()));
            Ok(())
        }
        fn enter_type(&mut self, hint: TypeHint<'_>) -> Result<(), MibError> {
            self.events.push(format!("type {hint:?}"));
            Ok(())
        }
        fn exit_macro_attribute(
            &mut self,
            name: &str,
            _payload: AttributePayload<'_>,
            _location: &Location,
        ) -> Result<(), MibError> {
            self.events.push(format!("attr {name}"));
            Ok(())
        }
        fn access_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
            self.events.push(format!("attr {name}={value}"));
            Ok(())
        }
        fn status_attribute(&mut self, name: &str, value: &str) -> Result<(), MibError> {
            self.events.push(format!("attr {name}={value}"));
            Ok(())
        }
        fn enter_constraint(&mut self, is_size: bool) -> Result<(), MibError> {
            self.events.push(format!("constraint size={is_size}"));
            Ok(())
        }
    }

    fn parse_events(source: &str) -> Vec<String> {
        let mut log = EventLog::default();
        let parser = Parser::new(source.as_bytes(), "test").unwrap();
        parser.parse(&mut log).unwrap();
        log.events
    }

    #[test]
    fn test_empty_module() {
        let events = parse_events("M DEFINITIONS ::= BEGIN END");
        assert_eq!(events, vec!["module M", "end module"]);
    }

    #[test]
    fn test_tag_and_extension_defaults() {
        let events = parse_events("M DEFINITIONS AUTOMATIC TAGS EXTENSIBILITY IMPLIED ::= BEGIN END");
        assert_eq!(events, vec!["module M", "end module"]);
    }

    #[test]
    fn test_imports() {
        let events = parse_events(
            "M DEFINITIONS ::= BEGIN IMPORTS OBJECT-TYPE, Integer32 FROM SNMPv2-SMI \
             DisplayString FROM SNMPv2-TC; END",
        );
        assert_eq!(
            events,
            vec![
                "module M",
                "import OBJECT-TYPE+Integer32 from SNMPv2-SMI",
                "import DisplayString from SNMPv2-TC",
                "end module",
            ]
        );
    }

    #[test]
    fn test_exports_skipped() {
        let events = parse_events("M DEFINITIONS ::= BEGIN EXPORTS foo, bar; END");
        assert_eq!(events, vec!["module M", "end module"]);
    }

    #[test]
    fn test_value_assignment() {
        let events = parse_events("M DEFINITIONS ::= BEGIN foo OBJECT IDENTIFIER ::= { 1 3 6 } END");
        assert_eq!(
            events,
            vec![
                "module M",
                "assign foo",
                "type Builtin(ObjectIdentifier)",
                "oid(3)",
                "value-assignment",
                "end module",
            ]
        );
    }

    #[test]
    fn test_type_assignment_with_constraint() {
        let events = parse_events("M DEFINITIONS ::= BEGIN T ::= INTEGER (0..255) END");
        assert_eq!(
            events,
            vec![
                "module M",
                "assign T",
                "type Builtin(Integer)",
                "constraint size=false",
                "type-assignment",
                "end module",
            ]
        );
    }

    #[test]
    fn test_object_type() {
        let source = r#"
            M DEFINITIONS ::= BEGIN
            ifIndex OBJECT-TYPE
                SYNTAX      Integer32
                MAX-ACCESS  read-only
                STATUS      current
                DESCRIPTION "The index."
                ::= { ifEntry 1 }
            END
        "#;
        let events = parse_events(source);
        assert_eq!(
            events,
            vec![
                "module M",
                "assign ifIndex",
                "type Referenced(\"Integer32\")",
                "attr SYNTAX",
                "attr MAX-ACCESS=read-only",
                "attr STATUS=current",
                "attr DESCRIPTION",
                "oid(2)",
                "object-type",
                "end module",
            ]
        );
    }

    #[test]
    fn test_macro_definition_skipped() {
        let source = "M DEFINITIONS ::= BEGIN \
                      OBJECT-TYPE MACRO ::= BEGIN TYPE NOTATION ::= x END \
                      foo OBJECT IDENTIFIER ::= { 1 } END";
        let events = parse_events(source);
        assert_eq!(
            events,
            vec![
                "module M",
                "assign foo",
                "type Builtin(ObjectIdentifier)",
                "oid(1)",
                "value-assignment",
                "end module",
            ]
        );
    }

    #[test]
    fn test_unknown_attribute_ignored() {
        let source = r#"
            M DEFINITIONS ::= BEGIN
            x OBJECT-TYPE
                SYNTAX INTEGER
                FANCY-EXTENSION "ignored"
                STATUS current
                ::= { 1 2 }
            END
        "#;
        let events = parse_events(source);
        assert!(events.contains(&"attr STATUS=current".into()));
        assert!(!events.iter().any(|e| e.contains("FANCY")));
    }

    #[test]
    fn test_parse_error_has_location() {
        let parser = Parser::new(b"M DEFINITIONS ::= BEGIN", "f.mib").unwrap();
        let err = parser.parse(&mut EventLog::default()).unwrap_err();
        match err {
            MibError::Parse { location, .. } => assert_eq!(location.source, "f.mib"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_commas_tolerated() {
        // SEQUENCE field list without separating commas
        let source = "M DEFINITIONS ::= BEGIN \
                      Entry ::= SEQUENCE { a INTEGER b OCTET STRING } END";
        let events = parse_events(source);
        assert!(events.contains(&"type Builtin(Sequence)".into()));
        assert!(events.contains(&"type Builtin(OctetString)".into()));
    }

    #[test]
    fn test_trailing_comma_tolerated() {
        let source = r#"
            M DEFINITIONS ::= BEGIN
            g OBJECT-TYPE
                SYNTAX INTEGER
                INDEX { a, b, }
                ::= { 1 }
            END
        "#;
        let events = parse_events(source);
        assert!(events.contains(&"attr INDEX".into()));
        assert!(events.contains(&"type Referenced(\"b\")".into()));
    }
}
