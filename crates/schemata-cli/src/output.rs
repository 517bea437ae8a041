use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::CliError;

/// Write pretty JSON to `path` through a sibling temp file and a rename,
/// so readers never observe a partial file.
pub fn write_json_file(path: &Path, json: &JsonValue) -> Result<(), CliError> {
    let mut data = serde_json::to_vec_pretty(json)?;
    data.push(b'\n');

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&staging)?;
    file.write_all(&data)?;
    file.sync_all()?;
    fs::rename(&staging, path)?;

    tracing::info!(event = "output_written", path = %path.display(), bytes = data.len());
    Ok(())
}

fn staging_path(path: &Path) -> Result<PathBuf, CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidInput(format!("not a file path: {}", path.display())))?;
    Ok(path.with_file_name(format!("{}.partial", file_name.to_string_lossy())))
}
