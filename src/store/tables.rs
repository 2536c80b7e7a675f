// src/store/tables.rs

use crate::layout::GHR_FIELDS;

/// Storage type of a column. `Integer` and `Real` columns are parsed in
/// Rust before insert so a bad value aborts the load instead of landing in
/// the database as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Text,
    }
}

const fn integer(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Integer,
    }
}

const fn real(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Real,
    }
}

/// Explicit schema for one table: ordered columns matching the source file's
/// field order, plus an optional primary key.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
}

impl TableSchema {
    pub fn create_sql(&self) -> String {
        let mut cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.ty.sql()))
            .collect();
        if !self.primary_key.is_empty() {
            cols.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        format!("CREATE TABLE {} ({})", self.name, cols.join(", "))
    }

    pub fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        let params: Vec<String> = (1..=self.columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            names.join(", "),
            params.join(", ")
        )
    }
}

pub static STATE: TableSchema = TableSchema {
    name: "state",
    columns: &[
        text("statefp"),
        text("stusps"),
        text("name"),
        text("statens"),
    ],
    primary_key: &["statefp"],
};

pub static COUNTY: TableSchema = TableSchema {
    name: "county",
    columns: &[
        text("stusps"),
        text("statefp"),
        text("countyfp"),
        text("name"),
        text("classfp"),
    ],
    primary_key: &["statefp", "countyfp"],
};

pub static PLACE: TableSchema = TableSchema {
    name: "place",
    columns: &[
        text("stusps"),
        text("geoid"),
        text("ansicode"),
        text("name"),
        text("lsad_code"),
        text("funcstat"),
        integer("pop10"),
        integer("hu10"),
        integer("aland"),
        integer("awater"),
        real("aland_sqmi"),
        real("awater_sqmi"),
        real("intptlat"),
        real("intptlong"),
    ],
    primary_key: &["geoid"],
};

pub static CBSA: TableSchema = TableSchema {
    name: "cbsa",
    columns: &[
        text("cbsa_code"),
        text("metro_division_code"),
        text("csa_code"),
        text("cbsa_name"),
        text("cbsa_type"),
        text("metro_division_name"),
        text("csa_name"),
        text("county_name"),
        text("state_name"),
        text("statefp"),
        text("countyfp"),
        text("county_type"),
    ],
    primary_key: &["statefp", "countyfp"],
};

pub static LSAD: TableSchema = TableSchema {
    name: "lsad",
    columns: &[
        text("lsad_code"),
        text("lsad_description"),
        text("geo_entity_type"),
    ],
    primary_key: &["lsad_code"],
};

pub static GEOCLASS: TableSchema = TableSchema {
    name: "geoclass",
    columns: &[text("classfp"), text("description")],
    primary_key: &["classfp"],
};

pub static F02: TableSchema = TableSchema {
    name: "f02",
    columns: &[
        text("fileid"),
        text("stusab"),
        text("chariter"),
        text("cifsn"),
        integer("logrecno"),
        integer("p0020001"),
        integer("p0020002"),
        integer("p0020003"),
        integer("p0020004"),
        integer("p0020005"),
        integer("p0020006"),
    ],
    primary_key: &["logrecno"],
};

/// Lookup by table name for the delimited reference sources.
pub fn schema_for(table: &str) -> Option<&'static TableSchema> {
    match table {
        "state" => Some(&STATE),
        "county" => Some(&COUNTY),
        "place" => Some(&PLACE),
        "cbsa" => Some(&CBSA),
        "lsad" => Some(&LSAD),
        "geoclass" => Some(&GEOCLASS),
        "f02" => Some(&F02),
        _ => None,
    }
}

// The ghr table is generated from the fixed-width column map rather than a
// static column array. A few census mnemonics are renamed to the FIPS-code
// column names the rest of the schema joins against.
pub fn ghr_column_name(field: &str) -> &str {
    match field {
        "state" => "statefp",
        "county" => "countyfp",
        "place" => "placefp",
        other => other,
    }
}

pub fn ghr_column_type(field: &str) -> ColumnType {
    match field {
        "logrecno" | "arealand" | "areawatr" | "pop100" | "hu100" => ColumnType::Integer,
        "intptlat" | "intptlon" => ColumnType::Real,
        _ => ColumnType::Text,
    }
}

/// Identifiers derived at load time from the mapped columns; part of the
/// authoritative (latest) layout revision.
pub static GHR_DERIVED: &[&str] = &["countyid", "cousubid", "placeid", "geoid"];

pub fn ghr_create_sql() -> String {
    let mut cols: Vec<String> = GHR_FIELDS
        .iter()
        .map(|spec| {
            format!(
                "{} {}",
                ghr_column_name(spec.name),
                ghr_column_type(spec.name).sql()
            )
        })
        .collect();
    for derived in GHR_DERIVED {
        cols.push(format!("{} TEXT", derived));
    }
    cols.push("PRIMARY KEY (logrecno)".to_string());
    format!("CREATE TABLE ghr ({})", cols.join(", "))
}

pub fn ghr_insert_sql() -> String {
    let names: Vec<&str> = GHR_FIELDS
        .iter()
        .map(|spec| ghr_column_name(spec.name))
        .chain(GHR_DERIVED.iter().copied())
        .collect();
    let params: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO ghr ({}) VALUES ({})",
        names.join(", "),
        params.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sql_lists_columns_and_key() {
        let sql = STATE.create_sql();
        assert_eq!(
            sql,
            "CREATE TABLE state (statefp TEXT, stusps TEXT, name TEXT, \
             statens TEXT, PRIMARY KEY (statefp))"
        );
    }

    #[test]
    fn insert_sql_parameterizes_every_column() {
        let sql = F02.insert_sql();
        assert!(sql.starts_with("INSERT INTO f02 (fileid, stusab"));
        assert!(sql.ends_with("?10, ?11)"));
    }

    #[test]
    fn ghr_sql_covers_mapped_and_derived_columns() {
        let create = ghr_create_sql();
        assert!(create.contains("logrecno INTEGER"));
        assert!(create.contains("statefp TEXT"));
        assert!(create.contains("intptlat REAL"));
        assert!(create.contains("geoid TEXT"));
        assert!(!create.contains(" state TEXT"));

        let insert = ghr_insert_sql();
        let expected = crate::layout::GHR_FIELDS.len() + GHR_DERIVED.len();
        assert_eq!(insert.matches('?').count(), expected);
    }

    #[test]
    fn schema_lookup_covers_reference_sources() {
        for spec in crate::layout::DELIMITED_SOURCES {
            assert!(schema_for(spec.table).is_some(), "{} missing", spec.table);
        }
    }
}
