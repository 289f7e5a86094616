use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

/// `<prefix>_YYYYMMDD_HHMMSS.<ext>` for the given instant.
pub fn stamped_filename<Tz: TimeZone>(prefix: &str, ext: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!("{prefix}_{}.{ext}", at.format("%Y%m%d_%H%M%S")))
}

/// Use `explicit` when given, else a name stamped with the local wall clock.
pub fn resolve_filename(explicit: Option<&Path>, prefix: &str, ext: &str) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => stamped_filename(prefix, ext, &Local::now()),
    }
}
