// src/layout/ghr.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One field of the fixed-width Geographic Header Record: name, 1-based
/// start offset, and width in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
}

const fn f(name: &'static str, start: usize, len: usize) -> FieldSpec {
    FieldSpec { name, start, len }
}

/// Total width of one GHR line.
pub const GHR_RECORD_WIDTH: usize = 500;

/// Column map for the 2010 national Geographic Header Record.
///
/// This is the latest revision of the map; downstream code must not assume
/// compatibility with earlier layouts. Offsets are 1-based as documented by
/// the Census Bureau's technical file layout.
pub static GHR_FIELDS: &[FieldSpec] = &[
    // Record codes
    f("fileid", 1, 6),
    f("stusab", 7, 2),
    f("sumlev", 9, 3),
    f("geocomp", 12, 2),
    f("chariter", 14, 3),
    f("cifsn", 17, 2),
    f("logrecno", 19, 7),
    // Geographic area codes
    f("region", 26, 1),
    f("division", 27, 1),
    f("state", 28, 2),
    f("county", 30, 3),
    f("countycc", 33, 2),
    f("countysc", 35, 2),
    f("cousub", 37, 5),
    f("cousubcc", 42, 2),
    f("cousubsc", 44, 2),
    f("place", 46, 5),
    f("placecc", 51, 2),
    f("placesc", 53, 2),
    f("tract", 55, 6),
    f("blkgrp", 61, 1),
    f("block", 62, 4),
    f("iuc", 66, 2),
    f("concit", 68, 5),
    f("concitcc", 73, 2),
    f("concitsc", 75, 2),
    f("aianhh", 77, 4),
    f("aianhhfp", 81, 5),
    f("aianhhcc", 86, 2),
    f("aihhtli", 88, 1),
    f("aitsce", 89, 3),
    f("aits", 92, 5),
    f("aitscc", 97, 2),
    f("ttract", 99, 6),
    f("tblkgrp", 105, 1),
    f("anrc", 106, 5),
    f("anrccc", 111, 2),
    f("cbsa", 113, 5),
    f("cbsasc", 118, 2),
    f("metdiv", 120, 5),
    f("csa", 125, 3),
    f("necta", 128, 5),
    f("nectasc", 133, 2),
    f("nectadiv", 135, 5),
    f("cnecta", 140, 3),
    f("cbsapci", 143, 1),
    f("nectapci", 144, 1),
    f("ua", 145, 5),
    f("uasc", 150, 2),
    f("uatype", 152, 1),
    f("ur", 153, 1),
    f("cd", 154, 2),
    f("sldu", 156, 3),
    f("sldl", 159, 3),
    f("vtd", 162, 6),
    f("vtdi", 168, 1),
    f("reserve2", 169, 3),
    f("zcta5", 172, 5),
    f("submcd", 177, 5),
    f("submcdcc", 182, 2),
    f("sdelm", 184, 5),
    f("sdsec", 189, 5),
    f("sduni", 194, 5),
    // Area characteristics
    f("arealand", 199, 14),
    f("areawatr", 213, 14),
    f("name", 227, 90),
    f("funcstat", 317, 1),
    f("gcuni", 318, 1),
    f("pop100", 319, 9),
    f("hu100", 328, 9),
    f("intptlat", 337, 11),
    f("intptlon", 348, 12),
    f("lsadc", 360, 2),
    f("partflag", 362, 1),
    // Special area codes
    f("reserve3", 363, 6),
    f("uga", 369, 5),
    f("statens", 374, 8),
    f("countyns", 382, 8),
    f("cousubns", 390, 8),
    f("placens", 398, 8),
    f("concitns", 406, 8),
    f("aianhhns", 414, 8),
    f("aitsns", 422, 8),
    f("anrcns", 430, 8),
    f("submcdns", 438, 8),
    f("cd113", 446, 2),
    f("cd114", 448, 2),
    f("cd115", 450, 2),
    f("sldu2", 452, 3),
    f("sldu3", 455, 3),
    f("sldu4", 458, 3),
    f("sldl2", 461, 3),
    f("sldl3", 464, 3),
    f("sldl4", 467, 3),
    f("aianhhsc", 470, 2),
    f("csasc", 472, 2),
    f("cnectasc", 474, 2),
    f("memi", 476, 1),
    f("nmemi", 477, 1),
    f("puma", 478, 5),
    f("reserved", 483, 18),
];

static FIELD_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    GHR_FIELDS
        .iter()
        .enumerate()
        .map(|(i, spec)| (spec.name, i))
        .collect()
});

/// Position of `name` within `GHR_FIELDS`, if it is a mapped column.
pub fn field_index(name: &str) -> Option<usize> {
    FIELD_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_contiguous_and_cover_the_record() {
        let mut next = 1;
        for spec in GHR_FIELDS {
            assert_eq!(
                spec.start, next,
                "field {} starts at {} but previous field ends at {}",
                spec.name, spec.start, next
            );
            assert!(spec.len > 0, "field {} has zero width", spec.name);
            next = spec.start + spec.len;
        }
        assert_eq!(next - 1, GHR_RECORD_WIDTH);
    }

    #[test]
    fn field_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for spec in GHR_FIELDS {
            assert!(seen.insert(spec.name), "duplicate field {}", spec.name);
        }
        assert_eq!(seen.len(), 101);
    }

    #[test]
    fn index_resolves_known_fields() {
        assert_eq!(field_index("fileid"), Some(0));
        assert_eq!(field_index("logrecno"), Some(6));
        assert_eq!(field_index("reserved"), Some(GHR_FIELDS.len() - 1));
        assert_eq!(field_index("nope"), None);
    }
}
