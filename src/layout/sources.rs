// src/layout/sources.rs

/// Declared encoding of a source file, applied before any parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// Descriptor for one input file.
///
/// Every file carries its own delimiter, `has_header` flag, and encoding so
/// the loader never has to guess whether a header row was already stripped
/// by an earlier step. `url` is `None` for seed files that ship with the
/// repository instead of being downloaded.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    pub table: &'static str,
    pub file_name: &'static str,
    pub url: Option<&'static str>,
    pub delimiter: u8,
    pub has_header: bool,
    pub encoding: SourceEncoding,
}

/// Delimited reference sources, loaded verbatim into their tables.
pub static DELIMITED_SOURCES: &[SourceSpec] = &[
    SourceSpec {
        table: "state",
        file_name: "state.txt",
        url: Some("https://www2.census.gov/geo/docs/reference/state.txt"),
        delimiter: b'|',
        has_header: true,
        encoding: SourceEncoding::Utf8,
    },
    SourceSpec {
        table: "county",
        file_name: "national_county.txt",
        url: Some("https://www2.census.gov/geo/docs/reference/codes/files/national_county.txt"),
        delimiter: b',',
        has_header: false,
        encoding: SourceEncoding::Latin1,
    },
    SourceSpec {
        table: "place",
        file_name: "Gaz_places_national.txt",
        url: Some(
            "https://www2.census.gov/geo/docs/maps-data/data/gazetteer/Gaz_places_national.zip",
        ),
        delimiter: b'\t',
        has_header: true,
        encoding: SourceEncoding::Latin1,
    },
    SourceSpec {
        table: "cbsa",
        file_name: "list1.csv",
        url: Some(
            "https://www2.census.gov/programs-surveys/metro-micro/geographies/reference-files/2013/delineation-files/list1.csv",
        ),
        delimiter: b',',
        has_header: true,
        encoding: SourceEncoding::Latin1,
    },
    SourceSpec {
        table: "lsad",
        file_name: "lsad.csv",
        url: None,
        delimiter: b',',
        has_header: true,
        encoding: SourceEncoding::Utf8,
    },
    SourceSpec {
        table: "geoclass",
        file_name: "geoclass.csv",
        url: None,
        delimiter: b',',
        has_header: true,
        encoding: SourceEncoding::Utf8,
    },
];

/// The fixed-width geographic header file extracted from the national ZIP.
pub static GHR_SOURCE: SourceSpec = SourceSpec {
    table: "ghr",
    file_name: "usgeo2010.ur1",
    url: None,
    // fixed-width; no delimiter applies
    delimiter: 0,
    has_header: false,
    encoding: SourceEncoding::Latin1,
};

/// File 02 of the national summary file: comma-delimited, headerless, keyed
/// by log record number, six population counts.
pub static F02_SOURCE: SourceSpec = SourceSpec {
    table: "f02",
    file_name: "us000022010.ur1",
    url: None,
    delimiter: b',',
    has_header: false,
    encoding: SourceEncoding::Utf8,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_targets_a_distinct_table() {
        let mut seen = std::collections::HashSet::new();
        for spec in DELIMITED_SOURCES {
            assert!(seen.insert(spec.table), "duplicate table {}", spec.table);
        }
    }

    #[test]
    fn headerless_sources_are_flagged() {
        let county = DELIMITED_SOURCES
            .iter()
            .find(|s| s.table == "county")
            .unwrap();
        assert!(!county.has_header);
        assert!(!F02_SOURCE.has_header);
    }
}
