// src/store/query.rs

use anyhow::{Context, Result};
use rusqlite::Connection;

/// One geo-search hit from the place reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub geoid: String,
    pub name: String,
    pub stusps: String,
    pub pop10: Option<i64>,
    pub hu10: Option<i64>,
    pub intptlat: Option<f64>,
    pub intptlong: Option<f64>,
}

/// Search places within a state by name prefix, most populous first. This
/// is the query shape the community platform issues for geo-search.
pub fn search_places(
    conn: &Connection,
    stusps: &str,
    name_prefix: &str,
    limit: usize,
) -> Result<Vec<PlaceHit>> {
    let mut stmt = conn.prepare(
        "SELECT geoid, name, stusps, pop10, hu10, intptlat, intptlong
         FROM place
         WHERE stusps = ?1 AND name LIKE ?2 || '%'
         ORDER BY pop10 DESC, geoid
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(
            rusqlite::params![stusps, name_prefix, limit as i64],
            |row| {
                Ok(PlaceHit {
                    geoid: row.get(0)?,
                    name: row.get(1)?,
                    stusps: row.get(2)?,
                    pop10: row.get(3)?,
                    hu10: row.get(4)?,
                    intptlat: row.get(5)?,
                    intptlong: row.get(6)?,
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("searching places")?;
    Ok(rows)
}

/// Urban/rural population split for one denormalized record, by derived
/// geographic identifier.
pub fn urban_rural_split(conn: &Connection, geoid: &str) -> Result<Option<(i64, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT p0020002, p0020005 FROM ghrp WHERE geoid = ?1 AND sumlev = '070' LIMIT 1",
    )?;
    let mut rows = stmt.query(rusqlite::params![geoid])?;
    match rows.next()? {
        Some(row) => {
            let urban: Option<i64> = row.get(0)?;
            let rural: Option<i64> = row.get(1)?;
            Ok(Some((urban.unwrap_or(0), rural.unwrap_or(0))))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::open_db;
    use crate::store::load::load_delimited;
    use crate::store::tables::PLACE;
    use tempfile::TempDir;

    #[test]
    fn search_matches_prefix_within_state() {
        let dir = TempDir::new().unwrap();
        let mut conn = open_db(&dir.path().join("geo.db")).unwrap();
        let text = "USPS\tGEOID\tANSICODE\tNAME\tLSAD\tFUNCSTAT\tPOP10\tHU10\tALAND\tAWATER\tALAND_SQMI\tAWATER_SQMI\tINTPTLAT\tINTPTLONG\n\
                    TX\t4805000\t02409761\tAustin city\t25\tA\t790390\t354241\t771546901\t18560605\t297.896\t7.166\t30.307182\t-97.755996\n\
                    TX\t4803216\t02409731\tAustwell city\t25\t A\t147\t101\t1\t1\t1.0\t1.0\t28.3\t-96.8\n\
                    MN\t2703222\t02393541\tAustin city\t25\tA\t24718\t11345\t1\t1\t1.0\t1.0\t43.6\t-92.9\n";
        load_delimited(&mut conn, &PLACE, text, b'\t', true).unwrap();

        let hits = search_places(&conn, "TX", "Aust", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Austin city");
        assert_eq!(hits[0].geoid, "4805000");
        assert_eq!(hits[1].name, "Austwell city");

        let capped = search_places(&conn, "TX", "Aust", 1).unwrap();
        assert_eq!(capped.len(), 1);
    }
}
