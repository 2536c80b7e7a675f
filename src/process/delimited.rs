// src/process/delimited.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Cursor;

/// Parse delimited text into rows of string fields, in file order.
///
/// When `has_header` is set the first row is consumed as a header and not
/// returned; otherwise every row is data. Rows are not deduplicated, and a
/// row with the wrong field count is a hard error (the caller aborts the
/// load).
pub fn parse_rows(text: &str, delimiter: u8, has_header: bool) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("parsing delimited record {}", idx))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_stripped_when_flagged() {
        let text = "STATE|STUSAB|STATE_NAME|STATENS\n48|TX|Texas|01779801\n";
        let rows = parse_rows(text, b'|', true).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["48", "TX", "Texas", "01779801"]);
    }

    #[test]
    fn headerless_files_keep_the_first_row() {
        let text = "AL,01,001,Autauga County,H1\nAL,01,003,Baldwin County,H1\n";
        let rows = parse_rows(text, b',', false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][3], "Autauga County");
    }

    #[test]
    fn tab_delimited_rows_parse() {
        let text = "USPS\tGEOID\tNAME\nTX\t4805000\tAustin city\n";
        let rows = parse_rows(text, b'\t', true).unwrap();
        assert_eq!(rows[0], vec!["TX", "4805000", "Austin city"]);
    }

    #[test]
    fn duplicate_rows_are_preserved() {
        let text = "25,city (suffix)\n25,city (suffix)\n";
        let rows = parse_rows(text, b',', false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
    }

    #[test]
    fn ragged_rows_error() {
        let text = "a,b,c\n1,2,3\n4,5\n";
        assert!(parse_rows(text, b',', true).is_err());
    }
}
