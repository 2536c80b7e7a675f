// src/process/fixed_width.rs

use crate::layout::{FieldSpec, GHR_FIELDS};

/// Slice `len` characters starting at 0-based character position `start`.
///
/// Offsets are character positions, not byte positions: the source file is
/// decoded from its legacy single-byte encoding first, so one character in
/// the decoded line corresponds to one byte column in the raw file. Slices
/// that run past the end of the line are truncated; slices that start past
/// the end yield the empty string.
fn slice_chars(line: &str, start: usize, len: usize) -> &str {
    let mut indices = line.char_indices().map(|(i, _)| i);
    let begin = match indices.nth(start) {
        Some(i) => i,
        None => return "",
    };
    // `nth` above consumed `start + 1` items, so `len - 1` more gets the end.
    let end = if len == 0 {
        begin
    } else {
        match line[begin..].char_indices().map(|(i, _)| i).nth(len) {
            Some(off) => begin + off,
            None => line.len(),
        }
    };
    &line[begin..end]
}

/// Value of a single field, trimmed of surrounding whitespace.
pub fn field_value<'a>(line: &'a str, spec: &FieldSpec) -> &'a str {
    slice_chars(line, spec.start - 1, spec.len).trim()
}

/// Decode one geographic header line into trimmed values, one per entry of
/// the column map, in map order.
///
/// Malformed lines never error: fields beyond the end of a short line come
/// back empty, and an overlong line's tail is ignored.
pub fn decode_fields(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    GHR_FIELDS
        .iter()
        .map(|spec| field_value(line, spec).to_string())
        .collect()
}

/// Re-encode values (in column-map order) into a fixed-width line, each
/// value left-justified and space-padded to its field width. Overlong
/// values are truncated to the field width.
pub fn encode_line(values: &[String]) -> String {
    let mut out = String::with_capacity(crate::layout::GHR_RECORD_WIDTH);
    for (spec, value) in GHR_FIELDS.iter().zip(values) {
        let mut count = 0;
        for c in value.chars() {
            if count == spec.len {
                break;
            }
            out.push(c);
            count += 1;
        }
        for _ in count..spec.len {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{field_index, GHR_RECORD_WIDTH};

    fn sample_values() -> Vec<String> {
        let mut values: Vec<String> = GHR_FIELDS.iter().map(|_| String::new()).collect();
        let mut set = |name: &str, v: &str| values[field_index(name).unwrap()] = v.to_string();
        set("fileid", "uSF1");
        set("stusab", "TX");
        set("sumlev", "070");
        set("geocomp", "00");
        set("logrecno", "0000011");
        set("state", "48");
        set("county", "453");
        set("place", "05000");
        set("name", "Austin city");
        set("pop100", "790390");
        set("hu100", "354241");
        set("intptlat", "+30.3071820");
        set("intptlon", "-097.7559960");
        set("arealand", "771546901");
        set("areawatr", "18560605");
        values
    }

    #[test]
    fn decode_reads_positional_fields() {
        let line = encode_line(&sample_values());
        assert_eq!(line.chars().count(), GHR_RECORD_WIDTH);

        let fields = decode_fields(&line);
        assert_eq!(fields[field_index("stusab").unwrap()], "TX");
        assert_eq!(fields[field_index("sumlev").unwrap()], "070");
        assert_eq!(fields[field_index("logrecno").unwrap()], "0000011");
        assert_eq!(fields[field_index("name").unwrap()], "Austin city");
        assert_eq!(fields[field_index("pop100").unwrap()], "790390");
    }

    #[test]
    fn decode_then_repad_reproduces_the_line() {
        let line = encode_line(&sample_values());
        let roundtrip = encode_line(&decode_fields(&line));
        assert_eq!(roundtrip, line);
    }

    #[test]
    fn short_lines_yield_empty_tail_fields() {
        // Only the first two fields are present.
        let fields = decode_fields("uSF1  AZ");
        assert_eq!(fields[field_index("fileid").unwrap()], "uSF1");
        assert_eq!(fields[field_index("stusab").unwrap()], "AZ");
        assert_eq!(fields[field_index("sumlev").unwrap()], "");
        assert_eq!(fields[field_index("reserved").unwrap()], "");
    }

    #[test]
    fn multibyte_names_keep_column_alignment() {
        let mut values = sample_values();
        values[field_index("stusab").unwrap()] = "NM".to_string();
        values[field_index("name").unwrap()] = "Do\u{f1}a Ana County".to_string();
        let line = encode_line(&values);

        let fields = decode_fields(&line);
        assert_eq!(fields[field_index("name").unwrap()], "Do\u{f1}a Ana County");
        // Fields after the multibyte name still line up.
        assert_eq!(fields[field_index("pop100").unwrap()], "790390");
        assert_eq!(fields[field_index("intptlon").unwrap()], "-097.7559960");
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let line = format!("{}\r\n", encode_line(&sample_values()));
        let fields = decode_fields(&line);
        assert_eq!(fields[field_index("puma").unwrap()], "");
        assert_eq!(fields[field_index("stusab").unwrap()], "TX");
    }
}
