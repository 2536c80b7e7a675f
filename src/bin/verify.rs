// src/bin/verify.rs

use anyhow::{bail, Context, Result};
use censusloader::store::{count_ghrp, db, query_ghrp, GhrpFilter};
use std::env;
use std::path::PathBuf;

/// Post-load sanity checks against the geo database: the denormalized join
/// must cover the header table exactly, equality filters must commute, and
/// the reference tables must not be empty.
fn main() -> Result<()> {
    let db_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/geo.db"));
    println!("verifying {}\n", db_path.display());

    let conn = db::open_db(&db_path).context("opening geo database")?;

    // 1) Join totality: one ghrp row per ghr row.
    let ghr = db::table_count(&conn, "ghr")?;
    let ghrp = count_ghrp(&conn, &GhrpFilter::default())?;
    if ghr != ghrp {
        bail!("ghrp has {} rows but ghr has {}", ghrp, ghr);
    }

    // 2) No fabricated record numbers.
    let orphans: i64 = conn.query_row(
        "SELECT COUNT(*) FROM ghrp WHERE logrecno NOT IN (SELECT logrecno FROM ghr)",
        [],
        |r| r.get(0),
    )?;
    if orphans != 0 {
        bail!("{} ghrp rows have a logrecno not present in ghr", orphans);
    }

    // 3) Filter commutativity on the place-by-county summary level.
    let state: Option<String> = conn
        .query_row(
            "SELECT stusab FROM ghrp WHERE sumlev = '070' LIMIT 1",
            [],
            |r| r.get(0),
        )
        .ok();
    if let Some(stusab) = state {
        let sumlev_first: Vec<i64> = query_ghrp(&conn, &GhrpFilter::default().sumlev("070"))?
            .into_iter()
            .filter(|r| r.stusab == stusab)
            .map(|r| r.logrecno)
            .collect();
        let state_first: Vec<i64> = query_ghrp(&conn, &GhrpFilter::default().stusab(&stusab))?
            .into_iter()
            .filter(|r| r.sumlev == "070")
            .map(|r| r.logrecno)
            .collect();
        if sumlev_first != state_first {
            bail!("filter order changed the result set for {}", stusab);
        }
        println!(
            "filter commutativity: {} rows at sumlev 070 in {}",
            sumlev_first.len(),
            stusab
        );
    }

    // 4) Reference tables populated.
    println!("\n{: <12} {:>12}", "Table", "Rows");
    println!("{:-<25}", "");
    for table in ["state", "county", "place", "cbsa", "lsad", "geoclass", "ghr", "f02", "ghrp"] {
        let count = db::table_count(&conn, table)
            .with_context(|| format!("table {} missing", table))?;
        println!("{: <12} {:>12}", table, count);
        if count == 0 {
            bail!("table {} is empty", table);
        }
    }

    println!("\nok");
    Ok(())
}
