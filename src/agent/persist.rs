use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

const INDEXED_FILE_PREFIX: &str = "slide";
const INDEXED_FILE_EXTENSION: &str = "html";

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write `value` as JSON indented with four spaces.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    info!(path = %path.display(), "saving json");
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    write_atomic(path, &buf)
}

/// Write each blob to `root/result_name/slide_<n>.html`, numbering from 1.
pub fn save_indexed_files<S: AsRef<str>>(
    root: &Path,
    result_name: &str,
    blobs: &[S],
) -> Result<Vec<PathBuf>> {
    let dir = root.join(result_name);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(blobs.len());
    for (idx, blob) in blobs.iter().enumerate() {
        let path = dir.join(format!(
            "{INDEXED_FILE_PREFIX}_{}.{INDEXED_FILE_EXTENSION}",
            idx + 1
        ));
        fs::write(&path, blob.as_ref())
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    info!(dir = %dir.display(), count = written.len(), "saved indexed files");
    Ok(written)
}
