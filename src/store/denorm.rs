// src/store/denorm.rs

use anyhow::{Context, Result};
use rusqlite::{Connection, Row};

/// Materialize `ghrp`: every geographic header row joined against its
/// population-detail row by log record number. Header rows without a match
/// keep NULL population columns; rows are never dropped and no record
/// number outside `ghr` can appear.
pub fn build_ghrp(conn: &mut Connection) -> Result<u64> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "
        DROP TABLE IF EXISTS ghrp;
        CREATE TABLE ghrp AS
        SELECT g.*,
               f.p0020001, f.p0020002, f.p0020003,
               f.p0020004, f.p0020005, f.p0020006
        FROM ghr g
        LEFT OUTER JOIN f02 f ON f.logrecno = g.logrecno
        ORDER BY g.logrecno;
        CREATE UNIQUE INDEX idx_ghrp_logrecno ON ghrp(logrecno);
        CREATE INDEX idx_ghrp_sumlev ON ghrp(sumlev);
        CREATE INDEX idx_ghrp_stusab ON ghrp(stusab);
        CREATE INDEX idx_ghrp_place ON ghrp(statefp, placefp);
        ",
    )
    .context("materializing ghrp")?;
    tx.commit()?;

    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM ghrp", [], |r| r.get(0))?;
    Ok(rows as u64)
}

/// Optional predicates over the denormalized table. Both are equality
/// filters, so applying them in either order selects the same rows.
#[derive(Debug, Default, Clone)]
pub struct GhrpFilter {
    pub sumlev: Option<String>,
    pub stusab: Option<String>,
}

impl GhrpFilter {
    pub fn sumlev(mut self, code: &str) -> Self {
        self.sumlev = Some(code.to_string());
        self
    }

    pub fn stusab(mut self, abbrev: &str) -> Self {
        self.stusab = Some(abbrev.to_string());
        self
    }

    fn clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();
        if let Some(code) = &self.sumlev {
            conditions.push(format!("sumlev = ?{}", params.len() + 1));
            params.push(code.clone());
        }
        if let Some(abbrev) = &self.stusab {
            conditions.push(format!("stusab = ?{}", params.len() + 1));
            params.push(abbrev.clone());
        }
        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// One flattened header-plus-population row.
#[derive(Debug, Clone, PartialEq)]
pub struct GhrpRow {
    pub logrecno: i64,
    pub sumlev: String,
    pub geocomp: String,
    pub stusab: String,
    pub statefp: String,
    pub countyfp: String,
    pub cousub: String,
    pub placefp: String,
    pub name: String,
    pub pop100: i64,
    pub hu100: i64,
    pub arealand: i64,
    pub areawatr: i64,
    pub intptlat: Option<f64>,
    pub intptlon: Option<f64>,
    pub countyid: Option<String>,
    pub cousubid: Option<String>,
    pub placeid: Option<String>,
    pub geoid: Option<String>,
    pub p0020001: Option<i64>,
    pub p0020002: Option<i64>,
    pub p0020003: Option<i64>,
    pub p0020004: Option<i64>,
    pub p0020005: Option<i64>,
    pub p0020006: Option<i64>,
}

const GHRP_COLUMNS: &str = "logrecno, sumlev, geocomp, stusab, statefp, countyfp, cousub, \
     placefp, name, pop100, hu100, arealand, areawatr, intptlat, intptlon, \
     countyid, cousubid, placeid, geoid, \
     p0020001, p0020002, p0020003, p0020004, p0020005, p0020006";

fn row_to_ghrp(row: &Row) -> rusqlite::Result<GhrpRow> {
    Ok(GhrpRow {
        logrecno: row.get(0)?,
        sumlev: row.get(1)?,
        geocomp: row.get(2)?,
        stusab: row.get(3)?,
        statefp: row.get(4)?,
        countyfp: row.get(5)?,
        cousub: row.get(6)?,
        placefp: row.get(7)?,
        name: row.get(8)?,
        pop100: row.get(9)?,
        hu100: row.get(10)?,
        arealand: row.get(11)?,
        areawatr: row.get(12)?,
        intptlat: row.get(13)?,
        intptlon: row.get(14)?,
        countyid: row.get(15)?,
        cousubid: row.get(16)?,
        placeid: row.get(17)?,
        geoid: row.get(18)?,
        p0020001: row.get(19)?,
        p0020002: row.get(20)?,
        p0020003: row.get(21)?,
        p0020004: row.get(22)?,
        p0020005: row.get(23)?,
        p0020006: row.get(24)?,
    })
}

/// Query the denormalized table, in log-record order.
pub fn query_ghrp(conn: &Connection, filter: &GhrpFilter) -> Result<Vec<GhrpRow>> {
    let (clause, params) = filter.clause();
    let sql = format!(
        "SELECT {} FROM ghrp{} ORDER BY logrecno",
        GHRP_COLUMNS, clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), row_to_ghrp)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("reading ghrp rows")?;
    Ok(rows)
}

/// Row count under `filter`.
pub fn count_ghrp(conn: &Connection, filter: &GhrpFilter) -> Result<i64> {
    let (clause, params) = filter.clause();
    let sql = format!("SELECT COUNT(*) FROM ghrp{}", clause);
    conn.query_row(&sql, rusqlite::params_from_iter(params), |r| r.get(0))
        .context("counting ghrp rows")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::open_db;
    use crate::store::load::tests::ghr_line;
    use crate::store::load::{load_f02, load_ghr};
    use tempfile::TempDir;

    fn loaded_conn() -> (TempDir, Connection) {
        let dir = TempDir::new().unwrap();
        let mut conn = open_db(&dir.path().join("geo.db")).unwrap();

        let ghr_text = format!(
            "{}\n{}\n{}\n{}\n",
            ghr_line("TX", "040", 1, "48", "", "", "Texas", 25145561),
            ghr_line("TX", "070", 11, "48", "453", "05000", "Austin city", 790390),
            ghr_line("TX", "070", 12, "48", "491", "63500", "Round Rock city", 99887),
            ghr_line("NM", "070", 21, "35", "013", "25170", "Espanola city", 10224),
        );
        load_ghr(&mut conn, &ghr_text).unwrap();

        // No detail row for logrecno 12: left side must survive.
        let f02_text = "uSF1,TX,000,02,0000001,25145561,21298039,18679431,2618608,3847522,0\n\
                        uSF1,TX,000,02,0000011,790390,775769,767433,8336,14621,0\n\
                        uSF1,NM,000,02,0000021,10224,9412,9412,0,812,0\n";
        load_f02(&mut conn, f02_text).unwrap();

        build_ghrp(&mut conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn join_never_drops_or_fabricates_header_rows() {
        let (_dir, conn) = loaded_conn();
        let ghr: i64 = conn
            .query_row("SELECT COUNT(*) FROM ghr", [], |r| r.get(0))
            .unwrap();
        let ghrp = count_ghrp(&conn, &GhrpFilter::default()).unwrap();
        assert_eq!(ghr, ghrp);

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM ghrp WHERE logrecno NOT IN (SELECT logrecno FROM ghr)",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn unmatched_header_rows_have_null_population_detail() {
        let (_dir, conn) = loaded_conn();
        let rows = query_ghrp(&conn, &GhrpFilter::default()).unwrap();
        let unmatched = rows.iter().find(|r| r.logrecno == 12).unwrap();
        assert_eq!(unmatched.p0020001, None);
        assert_eq!(unmatched.pop100, 99887);

        let matched = rows.iter().find(|r| r.logrecno == 11).unwrap();
        assert_eq!(matched.p0020001, Some(790390));
        assert_eq!(matched.p0020002, Some(775769));
    }

    #[test]
    fn filters_commute() {
        let (_dir, conn) = loaded_conn();

        // sumlev first, then state applied in memory
        let sumlev_rows = query_ghrp(&conn, &GhrpFilter::default().sumlev("070")).unwrap();
        let sumlev_then_state: Vec<i64> = sumlev_rows
            .iter()
            .filter(|r| r.stusab == "TX")
            .map(|r| r.logrecno)
            .collect();

        // state first, then sumlev applied in memory
        let state_rows = query_ghrp(&conn, &GhrpFilter::default().stusab("TX")).unwrap();
        let state_then_sumlev: Vec<i64> = state_rows
            .iter()
            .filter(|r| r.sumlev == "070")
            .map(|r| r.logrecno)
            .collect();

        assert_eq!(sumlev_then_state, state_then_sumlev);
        assert_eq!(sumlev_then_state, vec![11, 12]);

        // Both predicates in one query select the same set.
        let both = query_ghrp(&conn, &GhrpFilter::default().sumlev("070").stusab("TX")).unwrap();
        let both_ids: Vec<i64> = both.iter().map(|r| r.logrecno).collect();
        assert_eq!(both_ids, sumlev_then_state);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (_dir, mut conn) = loaded_conn();
        let before = query_ghrp(&conn, &GhrpFilter::default()).unwrap();
        build_ghrp(&mut conn).unwrap();
        let after = query_ghrp(&conn, &GhrpFilter::default()).unwrap();
        assert_eq!(before, after);
    }
}
