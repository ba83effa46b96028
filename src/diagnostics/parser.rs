//! Parser for compiler diagnostic lines.
//!
//! Two position grammars are recognized:
//!
//! ```text
//! FILENAME(LINE,COLUMN): error CODE: message
//! FILENAME(LINE,COLUMN): fatal error CODE: message
//! FILENAME(LINE,COLUMN): warning CODE: message
//! FILENAME:LINE: message
//! FILENAME:LINE:COLUMN: message
//! FILENAME:LINE: warning: message
//! FILENAME:LINE:COLUMN: warning: message
//! ```

use super::{Diagnostic, DiagnosticLevel};

/// Parse one line of compiler output.
///
/// Returns `None` for empty lines and lines without a position delimiter.
/// A position that does not parse as a number yields a diagnostic at 0:0
/// carrying the rest of the line.
pub fn parse_line(line: &str) -> Option<Diagnostic> {
    if line.is_empty() {
        return None;
    }

    let name_start = if has_drive_prefix(line) { 3 } else { 0 };
    let delimiter = name_start + line[name_start..].find(&[':', '('][..])?;
    let file = &line[..delimiter];
    let rest = &line[delimiter + 1..];

    let position = if line[delimiter..].starts_with('(') {
        parenthesized_position(rest)
    } else {
        colon_position(rest)
    };
    let Some((line_number, column, rest)) = position else {
        return Some(Diagnostic::error(file, skip_spaces(rest)));
    };

    let (level, rest, needs_code) = severity(skip_spaces(rest));
    let (code, rest) = if needs_code {
        match rest.split_once(':') {
            Some((code, rest)) => (code, rest),
            None => (rest, ""),
        }
    } else {
        ("", rest)
    };

    Some(Diagnostic {
        file: file.to_string(),
        line: line_number,
        column,
        level,
        code: code.to_string(),
        message: skip_spaces(rest).to_string(),
    })
}

/// `C:\` or `C:/`
fn has_drive_prefix(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && matches!(bytes[2], b'/' | b'\\')
}

/// `LINE[,COLUMN])[:]` following the `(`
fn parenthesized_position(rest: &str) -> Option<(usize, usize, &str)> {
    let close = rest.find(')').unwrap_or(rest.len());
    let inside = &rest[..close];
    let (line, column) = match inside.split_once(',') {
        Some((line, column)) => {
            // anything after a second comma is ignored
            let column = column.split(',').next().unwrap_or_default();
            (line.parse().ok()?, column.parse().ok()?)
        }
        None => (inside.parse().ok()?, 0),
    };
    let after = rest.get(close + 1..).unwrap_or_default();
    Some((line, column, after.strip_prefix(':').unwrap_or(after)))
}

/// `LINE[:COLUMN]:` following the first `:`
fn colon_position(rest: &str) -> Option<(usize, usize, &str)> {
    let (line_text, after_line) = match rest.split_once(':') {
        Some((line, after)) => (line, Some(after)),
        None => (rest, None),
    };
    let line = line_text.parse().ok()?;
    let Some(after_line) = after_line else {
        return Some((line, 0, ""));
    };

    // A space right after the colon means the message has started
    if after_line.is_empty() || after_line.starts_with(' ') {
        return Some((line, 0, after_line));
    }
    match after_line.split_once(':') {
        Some((column, after)) => Some((line, column.parse().ok()?, after)),
        None => Some((line, after_line.parse().ok()?, "")),
    }
}

/// Severity keyword at the start of `rest`, and whether a code follows it.
fn severity(rest: &str) -> (DiagnosticLevel, &str, bool) {
    if let Some(rest) = rest.strip_prefix("error ") {
        (DiagnosticLevel::Error, rest, true)
    } else if let Some(rest) = rest.strip_prefix("fatal error ") {
        (DiagnosticLevel::Error, rest, true)
    } else if let Some(rest) = rest.strip_prefix("warning ") {
        (DiagnosticLevel::Warning, rest, true)
    } else if let Some(rest) = rest.strip_prefix("warning:") {
        (DiagnosticLevel::Warning, rest, false)
    } else {
        (DiagnosticLevel::Error, rest, false)
    }
}

fn skip_spaces(s: &str) -> &str {
    s.trim_start_matches(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parenthesized_error() {
        let diagnostic = parse_line("foo.cs(10,5): error CS0001: bad thing").unwrap();
        assert_eq!(
            diagnostic,
            Diagnostic::error("foo.cs", "bad thing").with_position(10, 5).with_code("CS0001")
        );
    }

    #[test]
    fn test_parenthesized_variants() {
        let diagnostic = parse_line("foo.cs(3): fatal error CS2001: source file not found").unwrap();
        assert_eq!(diagnostic.line, 3);
        assert_eq!(diagnostic.column, 0);
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code, "CS2001");
        assert_eq!(diagnostic.message, "source file not found");

        let diagnostic = parse_line("Widget.vb(7,12): warning BC42024: unused local").unwrap();
        assert!(diagnostic.is_warning());
        assert_eq!(diagnostic.code, "BC42024");
        assert_eq!(diagnostic.message, "unused local");
    }

    #[test]
    fn test_colon_warning() {
        let diagnostic = parse_line("foo.cs:10: warning: unused variable").unwrap();
        assert_eq!(
            diagnostic,
            Diagnostic::warning("foo.cs", "unused variable").with_position(10, 0)
        );
    }

    #[test]
    fn test_colon_with_column() {
        let diagnostic = parse_line("src/main.cs:4:17: syntax error").unwrap();
        assert_eq!(diagnostic.file, "src/main.cs");
        assert_eq!((diagnostic.line, diagnostic.column), (4, 17));
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code, "");
        assert_eq!(diagnostic.message, "syntax error");
    }

    #[test]
    fn test_unparseable_position_degrades() {
        let diagnostic = parse_line("libfoo.so: no such library").unwrap();
        assert_eq!(diagnostic, Diagnostic::error("libfoo.so", "no such library"));

        let diagnostic = parse_line("foo.cs(x,y): error CS1: broken").unwrap();
        assert_eq!((diagnostic.line, diagnostic.column), (0, 0));
        assert_eq!(diagnostic.message, "x,y): error CS1: broken");
    }

    #[test]
    fn test_drive_letter_is_part_of_file_name() {
        let diagnostic = parse_line("C:\\work\\foo.cs(2,1): error CS0103: name does not exist").unwrap();
        assert_eq!(diagnostic.file, "C:\\work\\foo.cs");
        assert_eq!((diagnostic.line, diagnostic.column), (2, 1));

        let diagnostic = parse_line("D:/src/a.cs:9: warning: shadowed").unwrap();
        assert_eq!(diagnostic.file, "D:/src/a.cs");
        assert_eq!(diagnostic.line, 9);
    }

    #[test]
    fn test_lines_without_position() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("compilation finished"), None);
    }
}
