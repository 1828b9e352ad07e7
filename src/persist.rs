/// Whole-file persistence helpers
///
/// Both stores rewrite their backing file in full on every mutation. Writes go to a
/// sibling `.tmp` file first and are renamed over the target. A file that could not
/// be loaded in full is copied to a sibling `.bak` before anything rewrites it.
///
/// Store files are small and only change on user edits, so the stores call these
/// synchronously while holding their write lock.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Replace `path` with `bytes`, creating parent directories as needed
pub fn write_whole_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, bytes)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;

    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // Some platforms refuse to rename over an existing file
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("failed to replace {}", path.display()))?;
                fs::rename(&tmp_path, path)
                    .with_context(|| format!("failed to move {} into place", tmp_path.display()))?;
                Ok(())
            } else {
                Err(rename_err).with_context(|| format!("failed to move {} into place", tmp_path.display()))
            }
        }
    }
}

/// Copy `path` to `<path>.bak`, replacing an older backup
pub fn back_up(path: &Path) -> Result<PathBuf> {
    let backup = sibling_path(path, ".bak");
    fs::copy(path, &backup)
        .with_context(|| format!("failed to back up {} to {}", path.display(), backup.display()))?;
    tracing::warn!("🛟 Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Timestamp field that also accepts offset-less ISO 8601 and blank values
///
/// RFC 3339 is read as-is. A naive `YYYY-mm-ddTHH:MM:SS[.ffffff]` is taken as
/// local time. Null, blank or unreadable values become the current time.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map_or_else(Utc::now, parse_timestamp))
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Utc::now();
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
    {
        Ok(naive) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc)),
        Err(_) => {
            tracing::warn!("⚠️ Unreadable timestamp '{}', using current time", raw);
            Utc::now()
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
