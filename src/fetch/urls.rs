// src/fetch/urls.rs
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Directory listing for the 2010 national Urban/Rural-update summary file.
pub static NATIONAL_UR1_LISTING: &str =
    "https://www2.census.gov/census_2010/04-Summary_File_1/Urban_Rural_Update/National/";

static NATIONAL_ZIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)us2010\.ur1\.zip$").expect("national ZIP pattern is valid"));

/// Extract absolute `.zip` link targets from a census directory listing.
pub fn extract_zip_links(html: &str, base: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(r#"a[href$=".zip"]"#)
        .map_err(|e| anyhow!("CSS selector for ZIP links: {:?}", e))?;
    let base = Url::parse(base)?;
    let doc = Html::parse_document(html);
    Ok(doc
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|u| u.to_string())
        .collect())
}

/// Scrape the national listing and return the URL of the national ZIP.
pub async fn discover_national_zip_url(client: &Client) -> Result<String> {
    let html = client
        .get(NATIONAL_UR1_LISTING)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let links = extract_zip_links(&html, NATIONAL_UR1_LISTING)?;
    links
        .into_iter()
        .find(|link| NATIONAL_ZIP.is_match(link))
        .ok_or_else(|| {
            anyhow!(
                "national UR1 ZIP not present in listing {}",
                NATIONAL_UR1_LISTING
            )
        })
}
