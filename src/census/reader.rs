//! Minimal RFC 4180 record reader.
//!
//! Census cells routinely hold quoted, comma-separated wasp lists, so
//! fields are split with quote awareness. Quoted fields may contain
//! commas, doubled quotes and line breaks.

use crate::error::CensusError;

/// One CSV record and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Line number of the first character of the record (1-indexed).
    pub line: usize,
    /// Unescaped field values.
    pub fields: Vec<String>,
}

/// Split CSV text into records.
///
/// Records end at `\n`, `\r\n` or a bare `\r`. Blank lines are skipped.
/// A leading byte-order mark is ignored.
pub fn read_records(text: &str) -> Result<Vec<Record>, CensusError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                '\r' => {
                    if chars.peek() != Some(&'\n') {
                        line += 1;
                    }
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CensusError::UnterminatedQuote { line: quote_line });
    }

    // Final record without a trailing newline
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    if fields.len() == 1 && fields[0].trim().is_empty() {
        return;
    }
    records.push(Record { line, fields });
}

/// Quote a field for CSV output if it needs it.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_records() {
        let records = read_records("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b", "c"]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let records = read_records("N1,\"W1, W2\",W3").unwrap();
        assert_eq!(records[0].fields, vec!["N1", "W1, W2", "W3"]);
    }

    #[test]
    fn test_doubled_quotes_and_embedded_newline() {
        let records = read_records("\"say \"\"hi\"\"\",\"two\nlines\"\nnext,row\n").unwrap();
        assert_eq!(records[0].fields, vec!["say \"hi\"", "two\nlines"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let records = read_records("a,b\r\n\r\n1,2\r\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fields, vec!["1", "2"]);
    }

    #[test]
    fn test_bare_cr_line_endings() {
        let records = read_records("Nest,d1,d2\rN1,\"A, B\",A\rN2,B,\r").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fields, vec!["Nest", "d1", "d2"]);
        assert_eq!(records[1].fields, vec!["N1", "A, B", "A"]);
        assert_eq!(records[2].fields, vec!["N2", "B", ""]);
        assert_eq!(records[2].line, 3);
    }

    #[test]
    fn test_trailing_empty_fields() {
        let records = read_records("N4,,,\n").unwrap();
        assert_eq!(records[0].fields, vec!["N4", "", "", ""]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = read_records("a,b\n1,\"oops\n").unwrap_err();
        assert!(matches!(err, CensusError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn test_bom_is_ignored() {
        let records = read_records("\u{feff}Nest,d1\n").unwrap();
        assert_eq!(records[0].fields[0], "Nest");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("W1"), "W1");
        assert_eq!(escape_field("['A', 'B']"), "\"['A', 'B']\"");
        assert_eq!(escape_field("a\"b"), "\"a\"\"b\"");
    }
}
