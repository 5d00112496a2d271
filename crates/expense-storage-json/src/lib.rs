//! expense-storage-json
//!
//! Filesystem-backed JSON persistence for the expense list, with atomic
//! writes and rolling backups.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use expense_core::{storage::ExpenseStore, CoreError};
use expense_domain::Expense;
use tracing::{debug, info};

const DATA_FILE_STEM: &str = "expenses";
const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Where the data file and its backups live.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<base>` for data and `<base>/backups` for snapshots.
    pub fn under(base: &Path) -> Self {
        Self {
            data_root: base.to_path_buf(),
            backup_root: base.join("backups"),
        }
    }
}

/// Describes a persisted backup artifact.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Stores the full expense list as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonExpenseStore {
    data_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonExpenseStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            data_path: paths
                .data_root
                .join(format!("{DATA_FILE_STEM}.{FILE_EXTENSION}")),
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Snapshots the current list into the backup directory.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let expenses = self.load()?;
        let path = self.next_backup_path(note);
        write_atomic(&path, &serialize_expenses(&expenses)?)?;
        self.prune_backups()?;
        info!(path = %path.display(), "expense backup created");
        describe_backup(path)
    }

    /// Lists backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION)
            {
                continue;
            }
            entries.push(describe_backup(path)?);
        }
        entries.sort_by_key(|info| {
            Reverse((info.created_at, backup_sequence(&info.id), info.id.clone()))
        });
        Ok(entries)
    }

    /// Replaces the current list with the contents of backup `id`.
    ///
    /// The list being replaced is itself backed up first.
    pub fn restore_backup(&self, id: &str) -> Result<Vec<Expense>, CoreError> {
        let path = self.backup_path(id)?;
        let expenses = load_expenses_from_path(&path)?;
        self.save(&expenses)?;
        info!(backup = id, count = expenses.len(), "expenses restored from backup");
        Ok(expenses)
    }

    pub fn delete_backup(&self, id: &str) -> Result<(), CoreError> {
        let path = self.backup_path(id)?;
        fs::remove_file(path)?;
        info!(backup = id, "expense backup deleted");
        Ok(())
    }

    /// Only bare file names of existing backups resolve.
    fn backup_path(&self, id: &str) -> Result<PathBuf, CoreError> {
        let bare = Path::new(id).file_name().and_then(|name| name.to_str()) == Some(id);
        let path = self.backups_dir.join(id);
        if bare && path.is_file() {
            Ok(path)
        } else {
            Err(CoreError::Storage(format!("backup `{id}` not found")))
        }
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.data_path.exists() {
            return Ok(());
        }
        let backup_path = self.next_backup_path(None);
        fs::copy(&self.data_path, &backup_path)?;
        self.prune_backups()
    }

    fn next_backup_path(&self, note: Option<&str>) -> PathBuf {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let prefix = format!("{DATA_FILE_STEM}_{timestamp}");
        // Same-second snapshots share the timestamp and get a strictly larger sequence.
        let highest = fs::read_dir(&self.backups_dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix))
            .map(|name| backup_sequence(&name))
            .max();
        let mut stem = match highest {
            None => prefix,
            Some(sequence) => format!("{prefix}-{}", sequence + 1),
        };
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        self.backups_dir.join(format!("{stem}.{FILE_EXTENSION}"))
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            debug!(backup = %entry.id, "pruning expense backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl ExpenseStore for JsonExpenseStore {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        if !self.data_path.exists() {
            debug!(path = %self.data_path.display(), "no expense file yet");
            return Ok(Vec::new());
        }
        load_expenses_from_path(&self.data_path)
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        self.backup_existing_file()?;
        save_expenses_to_path(expenses, &self.data_path)?;
        info!(count = expenses.len(), path = %self.data_path.display(), "expenses saved");
        Ok(())
    }
}

/// Saves an expense list to an arbitrary path on disk.
pub fn save_expenses_to_path(expenses: &[Expense], path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_expenses(expenses)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads an expense list from the provided filesystem path.
pub fn load_expenses_from_path(path: &Path) -> Result<Vec<Expense>, CoreError> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn describe_backup(path: PathBuf) -> Result<BackupInfo, CoreError> {
    let id = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Storage(format!("invalid backup path {}", path.display())))?;
    let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
    Ok(BackupInfo {
        created_at: parse_backup_timestamp(&id),
        id,
        size_bytes,
        path,
    })
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads `expenses_<YYYYMMDD>_<HHMMSS>[-<seq>][_<note>].json` into its
/// timestamp and sequence; the first backup of a second has sequence 1.
fn parse_backup_stamp(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = name.strip_suffix(&format!(".{FILE_EXTENSION}"))?;
    let rest = stem.strip_prefix(&format!("{DATA_FILE_STEM}_"))?;
    let mut segments = rest.split('_');
    let date = segments.next()?;
    let time_segment = segments.next()?;
    let (time, sequence) = match time_segment.split_once('-') {
        Some((time, sequence)) => (time, sequence.parse().ok()?),
        None => (time_segment, 1),
    };
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()?;
    Some((DateTime::from_naive_utc_and_offset(naive, Utc), sequence))
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    parse_backup_stamp(name).map(|(at, _)| at)
}

fn backup_sequence(name: &str) -> u32 {
    parse_backup_stamp(name).map(|(_, sequence)| sequence).unwrap_or(1)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_expenses(expenses: &[Expense]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(expenses).map_err(|err| CoreError::Serde(err.to_string()))
}
