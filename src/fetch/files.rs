// src/fetch/files.rs

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;
use zip::ZipArchive;

/// Download `url_str` and save it under `dest_dir` using the original
/// filename. Returns the full path of the saved file.
pub async fn download_file(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let url = Url::parse(url_str)?;
    let filename = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("download.bin");
    let dest_path = dest_dir.join(filename);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let resp = client.get(url.as_str()).send().await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    fs::write(&dest_path, &bytes).await?;
    info!(file = filename, bytes = bytes.len(), "downloaded");

    Ok(dest_path)
}

/// Extract every file member of `zip_path` into `dest_dir`, flattening any
/// archive-internal directories. Returns the extracted paths in archive
/// order.
pub fn unzip_into(zip_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating extraction directory {}", dest_dir.display()))?;

    let file = File::open(zip_path)
        .with_context(|| format!("opening archive {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("reading archive {}", zip_path.display()))?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("accessing entry {} in {}", i, zip_path.display()))?;
        if !entry.is_file() {
            continue;
        }
        let member = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .ok_or_else(|| anyhow!("unsafe member name in {}", zip_path.display()))?;

        let dest = dest_dir.join(member);
        let mut out = File::create(&dest)
            .with_context(|| format!("creating {}", dest.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("extracting {}", dest.display()))?;
        extracted.push(dest);
    }

    info!(
        archive = %zip_path.display(),
        members = extracted.len(),
        "extracted archive"
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    #[test]
    fn unzip_extracts_file_members() -> Result<()> {
        let dir = TempDir::new()?;
        let zip_path = dir.path().join("us2010.ur1.zip");

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file("usgeo2010.ur1", options.clone())?;
            zip.write_all(b"uSF1  US04000000  0000001\n")?;
            zip.start_file("us000022010.ur1", options)?;
            zip.write_all(b"uSF1,US,000,02,0000001,1,1,1,0,0,0\n")?;
            zip.finish()?;
        }
        std::fs::write(&zip_path, &buf)?;

        let out_dir = dir.path().join("raw");
        let extracted = unzip_into(&zip_path, &out_dir)?;
        assert_eq!(extracted.len(), 2);
        assert!(out_dir.join("usgeo2010.ur1").exists());
        assert!(out_dir.join("us000022010.ur1").exists());
        Ok(())
    }
}
