//! Splitting migration files into individual statements
//!
//! Statements are separated by a `;` immediately followed by `\n`. Each piece
//! is trimmed of whitespace, semicolons and control characters, and empty
//! pieces are dropped.

use plinth_core::SplitMode;

/// Split `sql` into executable statements using `mode`.
///
/// ```
/// use plinth_core::SplitMode;
/// use plinth_migrate::split_statements;
///
/// let stmts = split_statements("UPDATE t SET x=1;\nDELETE FROM u;\n", SplitMode::Legacy);
/// assert_eq!(stmts, vec!["UPDATE t SET x=1", "DELETE FROM u"]);
/// ```
pub fn split_statements(sql: &str, mode: SplitMode) -> Vec<String> {
    let pieces = match mode {
        SplitMode::Legacy => sql.split(";\n").collect::<Vec<_>>(),
        SplitMode::QuoteAware => split_outside_literals(sql),
    };
    pieces
        .into_iter()
        .map(trim_statement)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim whitespace, NUL, vertical tab and `;` from both ends.
fn trim_statement(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ';' | ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

/// Split on `;\n` only where the `;` is in plain code.
///
/// Doubled quotes (`'it''s'`) need no special casing: the scanner leaves and
/// re-enters the literal.
fn split_outside_literals(sql: &str) -> Vec<&str> {
    let bytes = sql.as_bytes();
    let mut pieces = Vec::new();
    let mut state = ScanState::Code;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            ScanState::Code => match (b, next) {
                (b'\'', _) => state = ScanState::SingleQuote,
                (b'"', _) => state = ScanState::DoubleQuote,
                (b'-', Some(b'-')) => {
                    state = ScanState::LineComment;
                    i += 1;
                }
                (b'/', Some(b'*')) => {
                    state = ScanState::BlockComment;
                    i += 1;
                }
                (b';', Some(b'\n')) => {
                    pieces.push(&sql[start..i]);
                    i += 1;
                    start = i + 1;
                }
                _ => {}
            },
            ScanState::SingleQuote if b == b'\'' => state = ScanState::Code,
            ScanState::DoubleQuote if b == b'"' => state = ScanState::Code,
            ScanState::LineComment if b == b'\n' => state = ScanState::Code,
            ScanState::BlockComment if b == b'*' && next == Some(b'/') => {
                state = ScanState::Code;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        pieces.push(&sql[start..]);
    }
    pieces
}

#[cfg(test)]
#[path = "statements_test.rs"]
mod tests;
