//! Token dump utility for grammar debugging.
//!
//! Usage: mibtok <file>
//!
//! Outputs one token per line: `LINE:COL<TAB>KIND<TAB>text`

use std::env;
use std::fs;
use std::process;

use mibcodec_core::lexer::{Lexer, TokenKind};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        process::exit(1);
    }

    let path = &args[1];
    let source = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{path}: {e}");
            process::exit(1);
        }
    };

    let tokens = match Lexer::new(&source, path).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    for token in &tokens {
        if token.kind == TokenKind::Eof {
            break;
        }
        let text = &source[token.span.start as usize..token.span.end as usize];
        let escaped = escape_text(text);
        println!(
            "{}:{}\t{:?}\t{}",
            token.span.line, token.span.column, token.kind, escaped
        );
    }
}

/// Escape control characters and non-ASCII bytes for one-line output.
fn escape_text(text: &[u8]) -> String {
    let mut out = String::with_capacity(text.len());
    for &b in text {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}
