use anyhow::{anyhow, Context, Result};
use censusloader::{
    fetch,
    history::{Event, History},
    layout::{DELIMITED_SOURCES, F02_SOURCE, GHR_SOURCE},
    process,
    store::{self, db},
};
use reqwest::Client;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let client = Client::new();
    let raw_dir = PathBuf::from("data/raw");
    let seed_dir = PathBuf::from("data/seed");
    let history_dir = PathBuf::from("data/history");
    let db_path = PathBuf::from("data/geo.db");

    for d in &[&raw_dir, &seed_dir, &history_dir] {
        fs::create_dir_all(d)?;
    }

    let mut history = History::new(&history_dir)?;

    // ─── 3) fetch reference files ────────────────────────────────────
    for spec in DELIMITED_SOURCES {
        let Some(url) = spec.url else {
            // Seed files ship with the repository.
            continue;
        };
        if history.get(spec.file_name, Event::Downloaded) {
            info!(file = spec.file_name, "already downloaded; skip");
            continue;
        }
        let saved = fetch::download_file(&client, url, &raw_dir).await?;
        if saved.extension().and_then(|e| e.to_str()) == Some("zip") {
            fetch::unzip_into(&saved, &raw_dir)?;
        }
        history.add(spec.file_name, Event::Downloaded)?;
    }

    // ─── 4) fetch + extract the national summary file ────────────────
    let zip_name = "us2010.ur1.zip";
    if history.get(zip_name, Event::Downloaded) {
        info!(file = zip_name, "already downloaded; skip");
    } else {
        let url = fetch::discover_national_zip_url(&client).await?;
        info!(url = %url, "downloading national summary file");
        let zip_path = fetch::download_file(&client, &url, &raw_dir).await?;
        fetch::unzip_into(&zip_path, &raw_dir)?;
        history.add(zip_name, Event::Downloaded)?;
    }

    // ─── 5) load reference tables ────────────────────────────────────
    let mut conn = db::open_db(&db_path)?;
    for spec in DELIMITED_SOURCES {
        let dir = if spec.url.is_some() {
            &raw_dir
        } else {
            &seed_dir
        };
        let path = resolve_source(dir, spec.file_name)?;
        let schema = store::schema_for(spec.table)
            .ok_or_else(|| anyhow!("no schema for table {}", spec.table))?;

        let text = process::decode_file(&path, spec.encoding)?;
        let rows = store::load_delimited(&mut conn, schema, &text, spec.delimiter, spec.has_header)
            .with_context(|| format!("loading {}", spec.table))?;
        info!(table = spec.table, rows, "reference table loaded");
        history.add(spec.file_name, Event::Loaded)?;
    }

    // ─── 6) load the geographic header + population detail ───────────
    let ghr_path = resolve_source(&raw_dir, GHR_SOURCE.file_name)?;
    let ghr_text = process::decode_file(&ghr_path, GHR_SOURCE.encoding)?;
    let ghr_rows = store::load_ghr(&mut conn, &ghr_text).context("loading ghr")?;
    history.add(GHR_SOURCE.file_name, Event::Loaded)?;

    let f02_path = resolve_source(&raw_dir, F02_SOURCE.file_name)?;
    let f02_text = process::decode_file(&f02_path, F02_SOURCE.encoding)?;
    let f02_rows = store::load_f02(&mut conn, &f02_text).context("loading f02")?;
    history.add(F02_SOURCE.file_name, Event::Loaded)?;

    // ─── 7) denormalize ──────────────────────────────────────────────
    let ghrp_rows = store::build_ghrp(&mut conn).context("building ghrp")?;
    info!(ghr_rows, f02_rows, ghrp_rows, "denormalized join built");

    info!(db = %db_path.display(), "all done");
    Ok(())
}

fn resolve_source(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Err(anyhow!(
            "source file {} not found; fetch it first or place it in {}",
            file_name,
            dir.display()
        ));
    }
    Ok(path)
}
