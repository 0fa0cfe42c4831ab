//! Regenerates the telemetry identifiers stored in a JSON document (e.g. Kiro's `storage.json`)
//!
//! The original file is copied to `<file>.bak.<YYYYMMDD_HHMMSS>` before it is modified. Only
//! identifier keys that already exist in the document are replaced.

use crate::identifiers::{generate_identifier_set, IdentifierSet};
use crate::merge::apply_where_present;
use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Unable to create backup {}: {source}", .path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unable to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The listed keys were replaced and the document rewritten
    Updated {
        keys: Vec<String>,
        backup: Option<PathBuf>,
    },
    /// None of the identifier keys were present, the document was left untouched
    NoTargetKeysFound { backup: Option<PathBuf> },
}

impl ResetOutcome {
    pub fn backup(&self) -> Option<&Path> {
        match self {
            ResetOutcome::Updated { backup, .. } => backup.as_deref(),
            ResetOutcome::NoTargetKeysFound { backup } => backup.as_deref(),
        }
    }

    pub fn updated_keys(&self) -> &[String] {
        match self {
            ResetOutcome::Updated { keys, .. } => keys,
            ResetOutcome::NoTargetKeysFound { .. } => &[],
        }
    }
}

/// Path of the backup taken of `path` at time `at`
pub fn backup_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".bak.{}", at.format(BACKUP_TIMESTAMP_FORMAT)));
    PathBuf::from(name)
}

/// Copies `path` to its timestamped backup location, returning the backup path
pub fn create_backup(path: &Path, at: DateTime<Local>) -> Result<PathBuf, ResetError> {
    let backup = backup_path(path, at);
    fs::copy(path, &backup).map_err(|source| ResetError::BackupFailed {
        path: backup.clone(),
        source,
    })?;
    if let Err(e) = copy_modified_time(path, &backup) {
        log::debug!(
            "Unable to preserve modification time on {}: {}",
            backup.display(),
            e
        );
    }
    log::info!("Created backup {}", backup.display());
    Ok(backup)
}

fn copy_modified_time(from: &Path, to: &Path) -> io::Result<()> {
    let modified = fs::metadata(from)?.modified()?;
    OpenOptions::new().write(true).open(to)?.set_modified(modified)
}

/// Regenerates identifiers in the document at `path`
pub fn apply_reset(path: &Path) -> Result<ResetOutcome, ResetError> {
    apply_reset_with(path, &mut rand::rng(), Local::now())
}

/// As [apply_reset], with an explicit random source and backup timestamp
pub fn apply_reset_with<R: Rng>(
    path: &Path,
    rng: &mut R,
    now: DateTime<Local>,
) -> Result<ResetOutcome, ResetError> {
    if !path.is_file() {
        return Err(ResetError::FileNotFound(path.to_path_buf()));
    }

    // A failed backup does not stop the reset
    let backup = match create_backup(path, now) {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };

    let mut document = read_document(path)?;
    let ids = generate_identifier_set(rng);
    let keys = apply_identifiers(&mut document, &ids);
    if keys.is_empty() {
        log::info!("No identifier keys found in {}", path.display());
        return Ok(ResetOutcome::NoTargetKeysFound { backup });
    }

    write_document(path, &document)?;
    log::info!("Updated {} in {}", keys.join(", "), path.display());
    Ok(ResetOutcome::Updated { keys, backup })
}

/// Replaces the identifier keys already present in `document`
pub fn apply_identifiers(document: &mut Map<String, Value>, ids: &IdentifierSet) -> Vec<String> {
    apply_where_present(
        document,
        ids.entries()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v.to_owned()))),
    )
}

fn read_document(path: &Path) -> Result<Map<String, Value>, ResetError> {
    let bytes = fs::read(path).map_err(|source| ResetError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| ResetError::ParseError {
        path: path.to_path_buf(),
        source,
    };
    match serde_json::from_slice::<Value>(&bytes).map_err(parse_error)? {
        Value::Object(map) => Ok(map),
        _ => Err(parse_error(serde::de::Error::custom(
            "expected a JSON object at the top level",
        ))),
    }
}

/// Serializes with four space indentation, non-ASCII characters are written as-is
pub fn to_pretty_json(document: &Map<String, Value>) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    Ok(buf)
}

fn write_document(path: &Path, document: &Map<String, Value>) -> Result<(), ResetError> {
    let write_error = |source| ResetError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    let bytes = to_pretty_json(document).map_err(|e| write_error(io::Error::from(e)))?;
    fs::write(path, bytes).map_err(write_error)
}
