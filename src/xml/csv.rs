//! Naive CSV sub-parser for `<csv>` data payloads
//!
//! Splitting is line/comma based with no quoted-field or embedded-comma
//! support, faithfully matching the on-wire format the portal accepts.
//! Documents needing commas inside values must use the json payload form.

use serde_json::{Map, Value};

use crate::xml::coerce;
use crate::xml::ParseError;

/// Parse CSV text into an array of row objects. The first line is the
/// header row; every data row must have exactly as many values.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(ParseError::CsvTooShort);
    }

    let headers: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (index, line) in lines.iter().enumerate().skip(1) {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        if values.len() != headers.len() {
            return Err(ParseError::CsvRowShape {
                row: index,
                got: values.len(),
                expected: headers.len(),
            });
        }

        let mut row = Map::new();
        for (header, value) in headers.iter().zip(&values) {
            row.insert(header.clone(), coerce::csv_cell(value));
        }
        rows.push(Value::Object(row));
    }

    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_cells() {
        let data = parse("a,b\n1,2\n3,4").unwrap();
        assert_eq!(data, json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
    }

    #[test]
    fn test_parse_mixed_cells() {
        let data = parse("distrito, habitantes\nCentro, 12000\nOeste, 9500").unwrap();
        assert_eq!(
            data,
            json!([
                {"distrito": "Centro", "habitantes": 12000},
                {"distrito": "Oeste", "habitantes": 9500}
            ])
        );
    }

    #[test]
    fn test_header_only_fails() {
        let err = parse("a,b").unwrap_err();
        assert!(matches!(err, ParseError::CsvTooShort));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, ParseError::CsvTooShort));
    }

    #[test]
    fn test_row_shape_mismatch() {
        let err = parse("a,b\n1,2,3").unwrap_err();
        match err {
            ParseError::CsvRowShape { row, got, expected } => {
                assert_eq!(row, 1);
                assert_eq!(got, 3);
                assert_eq!(expected, 2);
            }
            other => panic!("expected CsvRowShape, got {:?}", other),
        }
    }

    #[test]
    fn test_no_quoted_field_support() {
        // quoted commas still split - the naive format has no quoting
        let err = parse("a,b\n\"x,y\",2").unwrap_err();
        assert!(matches!(err, ParseError::CsvRowShape { .. }));
    }
}
